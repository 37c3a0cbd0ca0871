use crate::filters::FilterMap;
use crate::registry::report_type::{ReportFamily, ReportType};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Behaviour switches a report may flip on top of the generic pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorFlags {
    /// Merge dashboard-level filters into the drilldown.
    pub include_context_filter: bool,
    /// Snapshot reports: the clicked label is itself the snapshot timestamp.
    pub label_to_timestamp: bool,
    /// Clip derived time windows so they never end after "now".
    pub compare_against_now: bool,
    /// Keep a literal "UNASSIGNED" label rather than the sentinel.
    pub keep_unassigned_label: bool,
    /// Scalar clicks are numeric bins matched with an inclusive point range.
    pub numeric_bin: bool,
    /// Composite reports carry their grouping dimension inside the click.
    pub across_from_click: bool,
    /// Forward the widget interval in the payload.
    pub include_interval_in_payload: bool,
    /// Forward organisation-unit scope from the dashboard.
    pub supports_ou: bool,
    pub include_across_ou_exclusions: bool,
    pub week_starts_on_monday: bool,
}

impl Default for DescriptorFlags {
    fn default() -> Self {
        Self {
            include_context_filter: true,
            label_to_timestamp: true,
            compare_against_now: false,
            keep_unassigned_label: false,
            numeric_bin: false,
            across_from_click: false,
            include_interval_in_payload: false,
            supports_ou: false,
            include_across_ou_exclusions: true,
            week_starts_on_monday: false,
        }
    }
}

/// Per-report drilldown configuration. Built once; never mutated after registry construction.
#[derive(Debug, Clone, Default)]
pub struct ReportDescriptor {
    /// `None` for the fallback descriptor served to unregistered report types.
    pub report_type: Option<ReportType>,
    pub family: ReportFamily,
    pub hidden_filters: FilterMap,
    /// Filter overrides; an `across` entry here forces the drilldown dimension.
    pub static_overrides: FilterMap,
    pub values_to_filter_key: AHashMap<String, String>,
    /// Always merged last, after dashboard context.
    pub implicit_filters: FilterMap,
    /// Ordered post-processor ids.
    pub post_processors: Vec<String>,
    pub flags: DescriptorFlags,
    /// Extra keys stripped from every drilldown of this report.
    pub always_unset: Vec<String>,
    pub default_sort: Option<Vec<Value>>,
    /// `(from, to)`: with a week/month/quarter interval the returned across becomes `to`.
    pub interval_across_switch: Option<(String, String)>,
    /// Report-specific continuous axes on which scalar equality is skipped.
    pub time_axes: Vec<String>,
}

impl ReportDescriptor {
    pub fn new(report_type: ReportType) -> Self {
        let mut flags = DescriptorFlags::default();
        flags.keep_unassigned_label = report_type.family().keeps_unassigned_label();
        Self {
            report_type: Some(report_type),
            family: report_type.family(),
            flags,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.report_type.map(|rt| rt.as_str()).unwrap_or("generic")
    }

    pub fn across_override(&self) -> Option<&str> {
        self.static_overrides.get("across").and_then(Value::as_str)
    }

    pub fn filter_key_for(&self, across: &str) -> Option<&str> {
        self.values_to_filter_key.get(across).map(String::as_str)
    }

    pub fn is_time_axis(&self, across: &str) -> bool {
        self.time_axes.iter().any(|axis| axis == across)
    }

    pub fn hidden(mut self, key: &str, value: Value) -> Self {
        self.hidden_filters.insert(key.to_string(), value);
        self
    }

    pub fn static_override(mut self, key: &str, value: Value) -> Self {
        self.static_overrides.insert(key.to_string(), value);
        self
    }

    pub fn forced_across(self, across: &str) -> Self {
        self.static_override("across", Value::String(across.to_string()))
    }

    pub fn value_key(mut self, across: &str, filter_key: &str) -> Self {
        self.values_to_filter_key
            .insert(across.to_string(), filter_key.to_string());
        self
    }

    pub fn implicit(mut self, key: &str, value: Value) -> Self {
        self.implicit_filters.insert(key.to_string(), value);
        self
    }

    pub fn post_processor(mut self, id: &str) -> Self {
        self.post_processors.push(id.to_string());
        self
    }

    pub fn unset(mut self, key: &str) -> Self {
        self.always_unset.push(key.to_string());
        self
    }

    pub fn sort_by(mut self, sort: Vec<Value>) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn switch_across(mut self, from: &str, to: &str) -> Self {
        self.interval_across_switch = Some((from.to_string(), to.to_string()));
        self
    }

    pub fn time_axis(mut self, axis: &str) -> Self {
        self.time_axes.push(axis.to_string());
        self
    }

    pub fn with_flags(mut self, update: impl FnOnce(&mut DescriptorFlags)) -> Self {
        update(&mut self.flags);
        self
    }
}
