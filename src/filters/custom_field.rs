use crate::filters::is_container_key;

/// `custom_*` keys that configure a widget instead of filtering on a field.
const WIDGET_SETTING_KEYS: &[&str] = &[
    "custom_stacks",
    "custom_hygienes",
    "custom_field_list",
    "custom_fields_mappings",
    "custom_case_fields",
];

/// Whether `key` names a custom field: Jira `customfield_*`, Azure `Custom.*`
/// or a TestRails `custom_*` column.
pub fn is_custom_field_key(key: &str) -> bool {
    if key.starts_with("customfield_") || key.starts_with("Custom.") {
        return true;
    }
    key.starts_with("custom_")
        && key.len() > "custom_".len()
        && !is_container_key(key)
        && !WIDGET_SETTING_KEYS.contains(&key)
}
