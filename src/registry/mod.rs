//! Immutable lookup from report type to its drilldown descriptor.

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod keys;
pub mod report_type;

pub use config::DescriptorOverride;
pub use descriptor::{DescriptorFlags, ReportDescriptor};
pub use report_type::{ReportFamily, ReportType};

use crate::error::RegistryError;
use ahash::AHashMap;
use tracing::debug;

pub struct ReportTypeRegistry {
    descriptors: AHashMap<ReportType, ReportDescriptor>,
    fallback: ReportDescriptor,
    global_keys: AHashMap<String, String>,
}

pub struct RegistryBuilder {
    descriptors: AHashMap<ReportType, ReportDescriptor>,
    global_keys: AHashMap<String, String>,
}

impl RegistryBuilder {
    /// Starts from the built-in catalog and global key table.
    pub fn new() -> Self {
        let mut descriptors: AHashMap<ReportType, ReportDescriptor> = ReportType::ALL
            .iter()
            .map(|rt| (*rt, ReportDescriptor::new(*rt)))
            .collect();
        for descriptor in catalog::builtin_descriptors() {
            if let Some(rt) = descriptor.report_type {
                descriptors.insert(rt, descriptor);
            }
        }
        Self {
            descriptors,
            global_keys: keys::global_values_to_filter_keys(),
        }
    }

    /// Starts with no report-specific configuration at all.
    pub fn empty() -> Self {
        Self {
            descriptors: AHashMap::new(),
            global_keys: keys::global_values_to_filter_keys(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: ReportDescriptor) -> Self {
        if let Some(rt) = descriptor.report_type {
            self.descriptors.insert(rt, descriptor);
        }
        self
    }

    pub fn with_global_key(mut self, across: &str, filter_key: &str) -> Self {
        self.global_keys
            .insert(across.to_string(), filter_key.to_string());
        self
    }

    /// Merges a JSON overrides document onto the descriptors collected so far.
    pub fn with_overrides_json(mut self, json: &str) -> Result<Self, RegistryError> {
        for (name, partial) in config::parse_overrides(json)? {
            let rt: ReportType = name.parse()?;
            let current = self
                .descriptors
                .remove(&rt)
                .unwrap_or_else(|| ReportDescriptor::new(rt));
            self.descriptors.insert(rt, partial.apply(current)?);
            debug!(report_type = %rt, "applied registry override");
        }
        Ok(self)
    }

    pub fn build(self) -> ReportTypeRegistry {
        ReportTypeRegistry {
            descriptors: self.descriptors,
            fallback: ReportDescriptor::default(),
            global_keys: self.global_keys,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportTypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The built-in registry with no overrides.
    pub fn builtin() -> Self {
        RegistryBuilder::new().build()
    }

    /// Descriptor for `report_type`; unregistered names get the empty generic descriptor.
    pub fn lookup(&self, report_type: &str) -> &ReportDescriptor {
        ReportType::parse(report_type)
            .and_then(|rt| self.descriptors.get(&rt))
            .unwrap_or(&self.fallback)
    }

    pub fn get(&self, report_type: ReportType) -> Option<&ReportDescriptor> {
        self.descriptors.get(&report_type)
    }

    /// Report-specific key for `across`, without the global fallback.
    pub fn report_filter_key(&self, report_type: &str, across: &str) -> Option<&str> {
        self.lookup(report_type).filter_key_for(across)
    }

    /// Filter key for `across`: report-specific map, then the global map, then `across` itself.
    pub fn values_to_filter_key(&self, report_type: &str, across: &str) -> String {
        self.report_filter_key(report_type, across)
            .or_else(|| self.global_keys.get(across).map(String::as_str))
            .unwrap_or(across)
            .to_string()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ReportDescriptor> {
        self.descriptors.values()
    }
}
