//! Per-stage record of how a drilldown payload was derived.

pub mod formatter;

pub use formatter::TraceFormatter;

use crate::filters::FilterMap;
use serde::Serialize;

/// What one stage or post-processor did to the filter map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceStep {
    pub stage: String,
    pub across: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
    /// Set when a post-processor was skipped; holds the reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivationTrace {
    pub report_type: String,
    pub steps: Vec<TraceStep>,
    #[serde(skip)]
    enabled: bool,
}

impl DerivationTrace {
    pub fn new(report_type: &str) -> Self {
        Self {
            report_type: report_type.to_string(),
            steps: Vec::new(),
            enabled: true,
        }
    }

    /// A trace that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: &str, across: &str, before: &FilterMap, after: &FilterMap) {
        if !self.enabled {
            return;
        }
        let (added, removed, changed) = diff_keys(before, after);
        self.steps.push(TraceStep {
            stage: stage.to_string(),
            across: across.to_string(),
            added,
            removed,
            changed,
            skipped: None,
        });
    }

    pub fn record_skipped(&mut self, stage: &str, across: &str, reason: String) {
        if !self.enabled {
            return;
        }
        self.steps.push(TraceStep {
            stage: stage.to_string(),
            across: across.to_string(),
            skipped: Some(reason),
            ..TraceStep::default()
        });
    }

    pub fn skipped_steps(&self) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter().filter(|step| step.skipped.is_some())
    }
}

/// Keys added, removed, and changed between two filter maps, in key order.
pub fn diff_keys(before: &FilterMap, after: &FilterMap) -> (Vec<String>, Vec<String>, Vec<String>) {
    let added = after
        .keys()
        .filter(|key| !before.contains_key(*key))
        .cloned()
        .collect();
    let removed = before
        .keys()
        .filter(|key| !after.contains_key(*key))
        .cloned()
        .collect();
    let changed = after
        .iter()
        .filter(|(key, value)| before.get(*key).is_some_and(|old| old != *value))
        .map(|(key, _)| key.clone())
        .collect();
    (added, removed, changed)
}
