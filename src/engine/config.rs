use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Return post-processor failures instead of skipping the processor.
    pub strict_post_processors: bool,
    pub week_starts_on_monday: bool,
    pub unassigned_sentinel: String,
    /// Keys stripped from every drilldown filter.
    pub default_always_unset: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_post_processors: false,
            week_starts_on_monday: false,
            unassigned_sentinel: "_UNASSIGNED_".to_string(),
            default_always_unset: vec![
                "across".to_string(),
                "interval".to_string(),
                "sort".to_string(),
                "stacks".to_string(),
                "custom_stacks".to_string(),
            ],
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}
