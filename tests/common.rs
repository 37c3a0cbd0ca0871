//! Common test utilities for building drilldown inputs.
use drilldown::prelude::*;
use serde_json::Value;

/// 2021-02-10T00:00:00Z
#[allow(dead_code)]
pub const FEB_10: i64 = 1_612_915_200;

/// "Now" for every engine built here: 2021-06-01T00:00:00Z.
#[allow(dead_code)]
pub const NOW: i64 = 1_622_505_600;

/// Builds an engine over the built-in registry with a frozen clock.
#[allow(dead_code)]
pub fn create_engine() -> DrilldownEngine {
    DrilldownEngine::builder()
        .with_clock(FixedClock(NOW))
        .build()
        .expect("built-in registry should only name built-in post-processors")
}

/// Builds a strict engine with a frozen clock.
#[allow(dead_code)]
pub fn create_strict_engine() -> DrilldownEngine {
    DrilldownEngine::builder()
        .with_clock(FixedClock(NOW))
        .strict_post_processors(true)
        .build()
        .expect("Failed to build strict engine")
}

/// Converts a `json!` object literal into a filter map.
#[allow(dead_code)]
pub fn filters(value: Value) -> FilterMap {
    value
        .as_object()
        .cloned()
        .expect("filter fixtures must be JSON objects")
}

#[allow(dead_code)]
pub fn query(across: &str, filter_values: Value) -> WidgetQuery {
    WidgetQuery::new(filters(filter_values)).with_across(across)
}

#[allow(dead_code)]
pub fn context(query_filters: Value) -> DashboardContext {
    DashboardContext::new(filters(query_filters))
}

/// Derives with the default engine, panicking on error.
#[allow(dead_code)]
pub fn derive(report_type: &str, query: &WidgetQuery, click: Option<ClickEvent>, context: &DashboardContext) -> FilterPayload {
    create_engine()
        .derive(report_type, query, click.as_ref(), context)
        .expect("Failed to derive drilldown")
}

/// A widget query as stored by the dashboard, `across` inline with the filters.
#[allow(dead_code)]
pub const TICKETS_WIDGET_JSON: &str = r#"{
    "across": "assignee",
    "interval": "week",
    "projects": ["PROP"],
    "statuses": [],
    "exclude": {"priorities": ["LOW"]},
    "customfield_10020": ["Team A"]
}"#;

#[allow(dead_code)]
pub const DASHBOARD_CONTEXT_JSON: &str = r#"{
    "queryFilters": {"product_id": "186", "integration_ids": ["7"]},
    "metadata": {"jira_or_query": {"labels": ["urgent"]}},
    "ouIds": ["ou-1"]
}"#;
