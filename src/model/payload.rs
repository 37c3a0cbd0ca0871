use crate::error::DerivationError;
use crate::filters::{FilterMap, classify};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The derived request handed to the record fetcher and the CSV exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPayload {
    pub filter: FilterMap,
    pub across: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou_exclusions: Option<Vec<String>>,
}

impl FilterPayload {
    /// Checks every filter entry against the shapes the backend accepts.
    pub fn validate(&self) -> Result<(), DerivationError> {
        for (key, value) in &self.filter {
            classify(value).map_err(|detail| DerivationError::InvalidShape {
                key: key.clone(),
                detail,
            })?;
        }
        Ok(())
    }
}
