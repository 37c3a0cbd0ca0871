use crate::filters::{FilterMap, is_container_key};
use serde_json::Value;

/// Strips entries the backend would reject or misread.
///
/// Removes the `unset` keys, nulls, arrays that are empty or hold only falsy items, and
/// container maps left empty once their own entries are cleaned. Sanitizing twice yields
/// the same map as sanitizing once.
pub fn sanitize(filters: &FilterMap, unset: &[String]) -> FilterMap {
    filters
        .iter()
        .filter(|(key, _)| !unset.iter().any(|u| u == *key))
        .filter_map(|(key, value)| clean(key, value).map(|v| (key.clone(), v)))
        .collect()
}

fn clean(key: &str, value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) if items.iter().all(is_falsy) => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) if is_container_key(key) => {
            let cleaned: FilterMap = map
                .iter()
                .filter_map(|(k, v)| clean(k, v).map(|v| (k.clone(), v)))
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Object(cleaned))
            }
        }
        other => Some(other.clone()),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> FilterMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_strips_empty_and_falsy_arrays() {
        let filters = map(json!({
            "projects": [],
            "labels": ["", null],
            "status_categories": ["Done"],
            "missing_fields": {"story_points": false}
        }));
        let cleaned = sanitize(&filters, &[]);
        assert_eq!(
            Value::Object(cleaned),
            json!({"status_categories": ["Done"], "missing_fields": {"story_points": false}})
        );
    }

    #[test]
    fn test_nested_containers_collapse_when_empty() {
        let filters = map(json!({
            "exclude": {"custom_fields": {}, "statuses": []},
            "custom_fields": {"customfield_1": ["a"], "customfield_2": []}
        }));
        let cleaned = sanitize(&filters, &[]);
        assert!(!cleaned.contains_key("exclude"));
        assert_eq!(cleaned["custom_fields"], json!({"customfield_1": ["a"]}));
    }

    #[test]
    fn test_unset_keys_removed() {
        let filters = map(json!({"across": "x", "interval": "week", "projects": ["A"]}));
        let cleaned = sanitize(&filters, &["across".to_string(), "interval".to_string()]);
        assert_eq!(Value::Object(cleaned), json!({"projects": ["A"]}));
    }
}
