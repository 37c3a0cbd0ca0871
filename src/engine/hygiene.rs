use crate::filters::{CUSTOM_FIELDS, EXCLUDE, FilterMap, MISSING_FIELDS, merge_over, nested_map};
use serde_json::Value;

/// Merges the three filter sources of a hygiene drilldown.
///
/// `first` and `second` are overlaid whole, `second` winning. The containers are merged per
/// sub-key instead: `missing_fields` from the first two sources, `custom_fields` and
/// `exclude.custom_fields` from all three. `hygiene_types` is always reset to `[]`.
pub fn merge_hygiene_filters(
    first: &FilterMap,
    second: &FilterMap,
    third: Option<&FilterMap>,
) -> FilterMap {
    let empty = FilterMap::new();
    let third = third.unwrap_or(&empty);
    let mut merged = merge_over(first, second);

    let missing = merge_over(&nested_map(first, MISSING_FIELDS), &nested_map(second, MISSING_FIELDS));
    merged.insert(MISSING_FIELDS.to_string(), Value::Object(missing));

    let first_exclude = nested_map(first, EXCLUDE);
    let second_exclude = nested_map(second, EXCLUDE);
    let third_exclude = nested_map(third, EXCLUDE);
    let mut exclude = merge_over(&first_exclude, &second_exclude);
    let excluded_custom = [&first_exclude, &second_exclude, &third_exclude]
        .into_iter()
        .fold(FilterMap::new(), |acc, source| {
            merge_over(&acc, &nested_map(source, CUSTOM_FIELDS))
        });
    exclude.insert(CUSTOM_FIELDS.to_string(), Value::Object(excluded_custom));
    merged.insert(EXCLUDE.to_string(), Value::Object(exclude));

    let custom = [first, second, third]
        .into_iter()
        .fold(FilterMap::new(), |acc, source| {
            merge_over(&acc, &nested_map(source, CUSTOM_FIELDS))
        });
    merged.insert(CUSTOM_FIELDS.to_string(), Value::Object(custom));

    merged.insert("hygiene_types".to_string(), Value::Array(Vec::new()));
    merged
}
