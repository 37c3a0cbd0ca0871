use crate::error::RegistryError;
use crate::filters::{FilterMap, merge_over};
use crate::registry::descriptor::{DescriptorFlags, ReportDescriptor};
use ahash::AHashMap;
use serde::Deserialize;
use serde_json::Value;

/// A partial descriptor read from an overrides document.
///
/// Map fields merge onto the built-in descriptor, `post_processors` and `default_sort`
/// replace it, and `always_unset` extends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptorOverride {
    pub hidden_filters: Option<FilterMap>,
    pub static_overrides: Option<FilterMap>,
    pub values_to_filter_key: Option<AHashMap<String, String>>,
    pub implicit_filters: Option<FilterMap>,
    pub post_processors: Option<Vec<String>>,
    pub flags: Option<FilterMap>,
    pub always_unset: Option<Vec<String>>,
    pub default_sort: Option<Vec<Value>>,
    pub time_axes: Option<Vec<String>>,
}

/// Parses a `{ "<report type>": { ...partial descriptor... } }` document.
pub fn parse_overrides(json: &str) -> Result<Vec<(String, DescriptorOverride)>, RegistryError> {
    let document: serde_json::Map<String, Value> =
        serde_json::from_str(json).map_err(|e| RegistryError::JsonParseError(e.to_string()))?;
    document
        .into_iter()
        .map(|(report, raw)| {
            serde_json::from_value::<DescriptorOverride>(raw)
                .map(|parsed| (report.clone(), parsed))
                .map_err(|e| RegistryError::JsonParseError(format!("{}: {}", report, e)))
        })
        .collect()
}

impl DescriptorOverride {
    pub fn apply(self, mut descriptor: ReportDescriptor) -> Result<ReportDescriptor, RegistryError> {
        if let Some(hidden) = self.hidden_filters {
            descriptor.hidden_filters = merge_over(&descriptor.hidden_filters, &hidden);
        }
        if let Some(overrides) = self.static_overrides {
            descriptor.static_overrides = merge_over(&descriptor.static_overrides, &overrides);
        }
        if let Some(keys) = self.values_to_filter_key {
            descriptor.values_to_filter_key.extend(keys);
        }
        if let Some(implicit) = self.implicit_filters {
            descriptor.implicit_filters = merge_over(&descriptor.implicit_filters, &implicit);
        }
        if let Some(processors) = self.post_processors {
            descriptor.post_processors = processors;
        }
        if let Some(flags) = self.flags {
            descriptor.flags = merge_flags(&descriptor.flags, &flags)?;
        }
        if let Some(unset) = self.always_unset {
            for key in unset {
                if !descriptor.always_unset.contains(&key) {
                    descriptor.always_unset.push(key);
                }
            }
        }
        if let Some(sort) = self.default_sort {
            descriptor.default_sort = Some(sort);
        }
        if let Some(axes) = self.time_axes {
            descriptor.time_axes.extend(axes);
        }
        Ok(descriptor)
    }
}

fn merge_flags(current: &DescriptorFlags, partial: &FilterMap) -> Result<DescriptorFlags, RegistryError> {
    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        _ => FilterMap::new(),
    };
    for (key, value) in partial {
        if !merged.contains_key(key) {
            return Err(RegistryError::JsonParseError(format!("unknown flag '{}'", key)));
        }
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| RegistryError::JsonParseError(e.to_string()))
}
