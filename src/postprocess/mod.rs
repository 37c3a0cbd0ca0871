//! Per-report adjustments applied after the generic mapping stage.
//!
//! Each post-processor is a strategy registered under a `family.name` id. Descriptors list
//! the ids they need, in order; reports listing none run the generic pipeline only.

pub mod azure;
pub mod common;
pub mod effort;
pub mod integration;
pub mod jira;
pub mod pipeline;
pub mod sprint;

pub use pipeline::PostProcessorPipeline;

use crate::error::DerivationError;
use crate::filters::{FilterMap, Interval};
use crate::model::{ClickEvent, DashboardContext, WidgetQuery};
use crate::registry::{ReportDescriptor, ReportTypeRegistry};
use ahash::AHashMap;
use chrono::Weekday;
use azure::{AzureCodeArea, AzureIteration, AzureParentWorkitem};
use common::{IngestedAt, LegacyRename, TimeAxisWindow, UnitConversion};
use effort::{StatusCategories, TrendWindow};
use integration::{IntegrationScope, TestRailsTrendMetric};
use jira::{OrQuery, Unresolved};
use sprint::MetricTrend;

/// The value a post-processor consumes and returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub across: String,
    pub filters: FilterMap,
}

/// Read-only inputs available to every post-processor.
pub struct ProcessContext<'a> {
    pub report_type: &'a str,
    pub descriptor: &'a ReportDescriptor,
    pub registry: &'a ReportTypeRegistry,
    pub click: Option<&'a ClickEvent>,
    pub query: &'a WidgetQuery,
    pub dashboard: &'a DashboardContext,
    pub interval: Option<Interval>,
    pub now: i64,
    pub week_start: Weekday,
}

impl ProcessContext<'_> {
    /// Report-specific filter key for trend buckets.
    pub fn trend_key(&self) -> Option<&str> {
        self.registry.report_filter_key(self.report_type, "trend")
    }

    pub fn is_azure(&self) -> bool {
        self.descriptor.report_type.is_some_and(|rt| rt.is_azure())
    }

    pub fn click_epoch(&self) -> Option<i64> {
        self.click.and_then(ClickEvent::epoch)
    }
}

/// Defines the contract for a report-specific adjustment.
///
/// Implementations must tolerate already-processed input and may only remove the keys
/// returned by `unset_keys`.
pub trait PostProcessor: Send + Sync {
    fn id(&self) -> &str;
    fn unset_keys(&self) -> Vec<String> {
        Vec::new()
    }
    fn process(&self, stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError>;
}

pub(crate) fn processor_failed(processor: &str, reason: impl Into<String>) -> DerivationError {
    DerivationError::ProcessorFailed {
        processor: processor.to_string(),
        reason: reason.into(),
    }
}

const ISSUE_TIME_AXES: &[(&str, &str)] = &[
    ("issue_created", "issue_created_at"),
    ("issue_updated", "issue_updated_at"),
    ("issue_resolved", "issue_resolved_at"),
    ("issue_due", "issue_due_at"),
    ("issue_closed", "issue_closed_at"),
    ("workitem_created_at", "workitem_created_at"),
    ("workitem_updated_at", "workitem_updated_at"),
    ("workitem_resolved_at", "workitem_resolved_at"),
];

const SCM_TIME_AXES: &[(&str, &str)] = &[
    ("pr_created", "pr_created_at"),
    ("pr_merged", "pr_merged_at"),
    ("pr_closed", "pr_closed_at"),
    ("pr_updated", "pr_updated_at"),
    ("committed", "committed_at"),
    ("issue_created", "issue_created_at"),
    ("issue_closed", "issue_closed_at"),
];

const PAGERDUTY_TIME_AXES: &[(&str, &str)] = &[
    ("incident_created_at", "incident_created_at"),
    ("incident_resolved_at", "incident_resolved_at"),
    ("alert_created_at", "alert_created_at"),
    ("alert_resolved_at", "alert_resolved_at"),
];

const COVERITY_TIME_AXES: &[(&str, &str)] = &[
    ("first_detected", "cov_defect_first_detected_at"),
    ("last_detected", "cov_defect_last_detected_at"),
];

/// Defines the built-in post-processors, their registration, and their creation by id.
macro_rules! define_post_processors {
    ( $( $id:literal => $ctor:expr ),* $(,)? ) => {
        pub const DEFAULT_POST_PROCESSOR_IDS: &[&str] = &[ $( $id, )* ];

        pub(crate) fn register_default_post_processors(
            registry: &mut AHashMap<String, Box<dyn PostProcessor>>,
        ) {
            $( registry.insert($id.to_string(), Box::new($ctor)); )*
        }

        pub fn create_post_processor_by_id(id: &str) -> Option<Box<dyn PostProcessor>> {
            match id {
                $( $id => Some(Box::new($ctor)), )*
                _ => None,
            }
        }
    };
}

define_post_processors! {
    // Shared strategies
    "common.time_axis_window" => TimeAxisWindow::new("common.time_axis_window", ISSUE_TIME_AXES),
    "common.ingested_at" => IngestedAt,
    // Jira
    "jira.unresolved" => Unresolved,
    "jira.or_query" => OrQuery,
    "jira.idle_days" => UnitConversion::new("jira.idle_days", "idle_seconds", "idle", 86_400.0),
    // Azure DevOps
    "azure.code_area" => AzureCodeArea,
    "azure.parent_workitem" => AzureParentWorkitem,
    "azure.iteration" => AzureIteration,
    "azure.sprint" => LegacyRename::new("azure.sprint", "sprint", "workitem_sprint_full_names"),
    // SCM
    "scm.pr_time_window" => TimeAxisWindow::new("scm.pr_time_window", SCM_TIME_AXES),
    // CI/CD
    "cicd.duration_seconds" => UnitConversion::new("cicd.duration_seconds", "duration_ms", "duration", 1_000.0),
    "cicd.integration_scope" => IntegrationScope,
    "cicd.job_end_window" => TimeAxisWindow::new("cicd.job_end_window", &[("job_end", "end_time")]),
    // Jira x Zendesk / Salesforce
    "support.created_window" => TimeAxisWindow::new("support.created_window", &[("ticket_created", "created_at")]),
    // Effort investment
    "effort.trend_window" => TrendWindow,
    "effort.status_categories" => StatusCategories,
    "effort.engineer" => LegacyRename::new("effort.engineer", "assignees", "assignee_display_names"),
    // Sprints
    "sprint.metric_trend" => MetricTrend,
    // Coverity, PagerDuty, TestRails
    "coverity.detected_window" => TimeAxisWindow::new("coverity.detected_window", COVERITY_TIME_AXES),
    "pagerduty.time_axis" => TimeAxisWindow::new("pagerduty.time_axis", PAGERDUTY_TIME_AXES),
    "testrails.trend_metric" => TestRailsTrendMetric,
}
