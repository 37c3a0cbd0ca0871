//! # Drilldown - Filter Derivation Engine
//!
//! **Drilldown** turns a click on a dashboard chart into the exact backend filter payload
//! that fetches (or exports) the records behind that data point.
//!
//! ## Core Workflow
//!
//! A derivation is a pure function of four inputs:
//!
//! 1.  **Widget query**: the chart's stored query (`WidgetQuery`).
//! 2.  **Click**: the point the user clicked (`ClickEvent`): a label, a trend bucket, or a
//!     composite set of filter entries.
//! 3.  **Dashboard context**: dashboard-wide filters and metadata (`DashboardContext`).
//! 4.  **Report type**: selects a `ReportDescriptor` from the immutable `ReportTypeRegistry`.
//!
//! The engine combines the filter sources, resolves the drilldown dimension, maps the click
//! onto filter entries, runs the report's post-processors and sanitizes the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drilldown::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let engine = DrilldownEngine::new()?;
//!
//!     let query = WidgetQuery::default().with_across("cicd_user_id");
//!     let context: DashboardContext = serde_json::from_value(json!({
//!         "query_filters": { "product_id": "186" }
//!     }))?;
//!     let click = ClickEvent::scalar("viraj");
//!
//!     let payload = engine.derive("jenkins_job_config_change_counts", &query, Some(&click), &context)?;
//!     println!("{}", serde_json::to_string_pretty(&payload)?);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod filters;
pub mod model;
pub mod postprocess;
pub mod prelude;
pub mod registry;
pub mod trace;
