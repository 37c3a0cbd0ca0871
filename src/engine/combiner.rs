use crate::filters::{
    CUSTOM_FIELDS, EXCLUDE, FilterMap, is_custom_field_key, merge_nested, merge_over,
};
use crate::registry::ReportDescriptor;
use tracing::trace;

/// Merges the filter sources of a drilldown, lowest precedence first:
/// widget query, static overrides, hidden filters, dashboard context, implicit filters.
///
/// Dashboard context only participates when the descriptor includes it. Each source has its
/// top-level custom-field keys relocated under `custom_fields` before it is merged, and
/// `exclude` and `custom_fields` maps are merged per sub-key. `across` never reaches the
/// filter map.
pub fn combine(
    widget_filters: &FilterMap,
    descriptor: &ReportDescriptor,
    context_filters: &FilterMap,
) -> FilterMap {
    let empty = FilterMap::new();
    let context = if descriptor.flags.include_context_filter {
        context_filters
    } else {
        &empty
    };
    let sources = [
        widget_filters,
        &descriptor.static_overrides,
        &descriptor.hidden_filters,
        context,
        &descriptor.implicit_filters,
    ];

    let mut combined = FilterMap::new();
    for source in sources {
        let source = hoist_custom_fields(source.clone());
        let nested: Vec<_> = [EXCLUDE, CUSTOM_FIELDS]
            .into_iter()
            .filter_map(|key| merge_nested(combined.get(key), source.get(key)).map(|v| (key, v)))
            .collect();
        combined = merge_over(&combined, &source);
        for (key, value) in nested {
            combined.insert(key.to_string(), value);
        }
    }
    combined.remove("across");
    combined
}

/// Moves top-level custom-field keys under `custom_fields`; an already nested value wins.
pub fn hoist_custom_fields(filters: FilterMap) -> FilterMap {
    let (custom, mut rest): (FilterMap, FilterMap) = filters
        .into_iter()
        .partition(|(key, _)| is_custom_field_key(key));
    if custom.is_empty() {
        return rest;
    }

    let mut nested = rest
        .get(CUSTOM_FIELDS)
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();
    for (key, value) in custom {
        trace!(key = %key, "relocating custom field under custom_fields");
        nested.entry(key).or_insert(value);
    }
    rest.insert(CUSTOM_FIELDS.to_string(), nested.into());
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ReportType;
    use serde_json::json;

    fn map(value: serde_json::Value) -> FilterMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_precedence_later_sources_win() {
        let descriptor = ReportDescriptor::new(ReportType::TicketsReport)
            .static_override("projects", json!(["STATIC"]))
            .hidden("statuses", json!(["HIDDEN"]))
            .implicit("projects", json!(["IMPLICIT"]));
        let widget = map(json!({"projects": ["W"], "statuses": ["W"], "labels": ["W"]}));
        let context = map(json!({"statuses": ["CTX"]}));

        let combined = combine(&widget, &descriptor, &context);
        assert_eq!(combined["projects"], json!(["IMPLICIT"]));
        assert_eq!(combined["statuses"], json!(["CTX"]));
        assert_eq!(combined["labels"], json!(["W"]));
    }

    #[test]
    fn test_context_skipped_when_flag_off() {
        let descriptor = ReportDescriptor::new(ReportType::LeadTimeByStageReport)
            .with_flags(|f| f.include_context_filter = false);
        let combined = combine(&FilterMap::new(), &descriptor, &map(json!({"product_id": "1"})));
        assert!(!combined.contains_key("product_id"));
    }

    #[test]
    fn test_exclude_merged_per_key_and_custom_fields_hoisted() {
        let descriptor = ReportDescriptor::new(ReportType::TicketsReport)
            .hidden("exclude", json!({"statuses": ["DONE"]}));
        let widget = map(json!({
            "exclude": {"projects": ["X"]},
            "customfield_1": ["a"],
            "across": "assignee"
        }));

        let combined = combine(&widget, &descriptor, &FilterMap::new());
        assert_eq!(combined["exclude"], json!({"projects": ["X"], "statuses": ["DONE"]}));
        assert_eq!(combined["custom_fields"], json!({"customfield_1": ["a"]}));
        assert!(!combined.contains_key("customfield_1"));
        assert!(!combined.contains_key("across"));
    }

    #[test]
    fn test_context_custom_field_beats_widget_nested_value() {
        let descriptor = ReportDescriptor::new(ReportType::TicketsReport);
        let widget = map(json!({"custom_fields": {"customfield_1": ["W"], "customfield_2": ["W"]}}));
        let context = map(json!({"customfield_1": ["CTX"]}));

        let combined = combine(&widget, &descriptor, &context);
        assert_eq!(
            combined["custom_fields"],
            json!({"customfield_1": ["CTX"], "customfield_2": ["W"]})
        );
        assert!(!combined.contains_key("customfield_1"));
    }
}
