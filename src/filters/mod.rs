//! Filter-map primitives shared by every derivation stage.
//!
//! A filter map is a `serde_json::Map`, so keys are ordered and two maps built through
//! different paths compare and serialize identically. None of the helpers here mutate
//! their inputs: they return a fresh map with the change applied.

pub mod calendar;
pub mod custom_field;
pub mod value;

pub use calendar::{Interval, end_of_day, period_bounds};
pub use custom_field::is_custom_field_key;
pub use value::{FilterShape, classify, epoch_of};

use serde_json::{Map, Value};

/// Backend filter entries keyed by filter name.
pub type FilterMap = Map<String, Value>;

pub const CUSTOM_FIELDS: &str = "custom_fields";
pub const EXCLUDE: &str = "exclude";
pub const MISSING_FIELDS: &str = "missing_fields";
pub const PARTIAL_MATCH: &str = "partial_match";
pub const WORKITEM_ATTRIBUTES: &str = "workitem_attributes";

/// Keys whose value is a one-level nested map rather than a filter value.
pub const CONTAINER_KEYS: &[&str] = &[
    CUSTOM_FIELDS,
    EXCLUDE,
    MISSING_FIELDS,
    PARTIAL_MATCH,
    WORKITEM_ATTRIBUTES,
    "workitem_custom_fields",
    "or",
    "jira_or",
];

pub fn is_container_key(key: &str) -> bool {
    CONTAINER_KEYS.contains(&key)
}

/// Overlays `overlay` on `base`; overlay entries win on key collision.
pub fn merge_over(base: &FilterMap, overlay: &FilterMap) -> FilterMap {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Returns a copy of `map` with `key` set to `value`.
pub fn with_entry(map: &FilterMap, key: &str, value: Value) -> FilterMap {
    let mut next = map.clone();
    next.insert(key.to_string(), value);
    next
}

/// Returns a copy of `map` where `container[key] = value`.
///
/// A non-object value already stored under `container` is replaced by a fresh map.
pub fn with_nested_entry(map: &FilterMap, container: &str, key: &str, value: Value) -> FilterMap {
    let mut nested = nested_map(map, container);
    nested.insert(key.to_string(), value);
    with_entry(map, container, Value::Object(nested))
}

/// Copy of the nested map stored under `container`, or an empty one.
pub fn nested_map(map: &FilterMap, container: &str) -> FilterMap {
    map.get(container)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Merges two nested maps key by key; `overlay` wins per sub-key.
pub fn merge_nested(base: Option<&Value>, overlay: Option<&Value>) -> Option<Value> {
    match (
        base.and_then(Value::as_object),
        overlay.and_then(Value::as_object),
    ) {
        (None, None) => None,
        (Some(b), None) => Some(Value::Object(b.clone())),
        (None, Some(o)) => Some(Value::Object(o.clone())),
        (Some(b), Some(o)) => Some(Value::Object(merge_over(b, o))),
    }
}

/// Value of `key` as a string, accepting numbers too.
pub fn string_of(map: &FilterMap, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether `value` carries anything a backend filter could act on.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// A range filter `{lower_op: lower, upper_op: upper}` with both bounds rendered as strings.
pub fn string_range(lower_op: &str, lower: i64, upper_op: &str, upper: i64) -> Value {
    let mut range = Map::new();
    range.insert(lower_op.to_string(), Value::String(lower.to_string()));
    range.insert(upper_op.to_string(), Value::String(upper.to_string()));
    Value::Object(range)
}

/// The default half-open window `{$gt, $lt}` used for time filters.
pub fn time_window(start: i64, end: i64) -> Value {
    string_range("$gt", start, "$lt", end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_nested_entry_leaves_source_untouched() {
        let source = json!({"custom_fields": {"customfield_1": ["a"]}})
            .as_object()
            .cloned()
            .unwrap();
        let next = with_nested_entry(&source, CUSTOM_FIELDS, "customfield_2", json!(["b"]));

        assert_eq!(source["custom_fields"], json!({"customfield_1": ["a"]}));
        assert_eq!(
            next["custom_fields"],
            json!({"customfield_1": ["a"], "customfield_2": ["b"]})
        );
    }

    #[test]
    fn test_merge_nested_overlay_wins_per_key() {
        let merged = merge_nested(
            Some(&json!({"a": 1, "b": 2})),
            Some(&json!({"b": 3})),
        );
        assert_eq!(merged, Some(json!({"a": 1, "b": 3})));
    }
}
