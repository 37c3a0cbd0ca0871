use crate::error::DerivationError;
use crate::filters::FilterMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The stored query of a dashboard widget.
///
/// Its JSON form is flat: `across`, `interval` and `sort` sit next to the filter keys.
/// They are lifted out here so every remaining entry is a filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub across: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
    #[serde(flatten)]
    pub filters: FilterMap,
}

impl WidgetQuery {
    pub fn new(filters: FilterMap) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DerivationError> {
        serde_json::from_str(json).map_err(|e| DerivationError::InputParseError {
            input: "widget query".to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_across(mut self, across: &str) -> Self {
        self.across = Some(across.to_string());
        self
    }

    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = Some(interval.to_string());
        self
    }

    pub fn with_sort(mut self, sort: Vec<Value>) -> Self {
        self.sort = Some(sort);
        self
    }
}
