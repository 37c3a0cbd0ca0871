use crate::filters::FilterMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A custom field configured on the dashboard's integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldSpec {
    #[serde(alias = "key")]
    pub field_key: String,
    #[serde(default, alias = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Dashboard-level state that scopes every widget on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardContext {
    #[serde(default, alias = "queryFilters")]
    pub query_filters: FilterMap,
    #[serde(default)]
    pub metadata: FilterMap,
    #[serde(default, alias = "ouIds", skip_serializing_if = "Option::is_none")]
    pub ou_ids: Option<Vec<String>>,
    #[serde(default, alias = "customFields", skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldSpec>,
}

impl DashboardContext {
    pub fn new(query_filters: FilterMap) -> Self {
        Self {
            query_filters,
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: FilterMap) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_ou_ids(mut self, ou_ids: Vec<String>) -> Self {
        self.ou_ids = Some(ou_ids);
        self
    }

    pub fn with_custom_field(mut self, field_key: &str, field_type: &str) -> Self {
        self.custom_fields.push(CustomFieldSpec {
            field_key: field_key.to_string(),
            field_type: Some(field_type.to_string()),
            name: None,
        });
        self
    }

    pub fn field_type(&self, field_key: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.field_key == field_key)
            .and_then(|f| f.field_type.as_deref())
    }

    pub fn is_checkbox(&self, field_key: &str) -> bool {
        self.field_type(field_key)
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
    }

    /// A boolean metadata flag; absent or non-boolean reads as `false`.
    pub fn metadata_flag(&self, key: &str) -> bool {
        self.metadata.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}
