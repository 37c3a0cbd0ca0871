//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the drilldown crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use drilldown::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let query = WidgetQuery::from_json(&std::fs::read_to_string("path/to/widget.json")?)?;
//! let engine = DrilldownEngine::builder().with_clock(SystemClock).build()?;
//!
//! let (payload, trace) = engine.derive_traced(
//!     "tickets_report",
//!     &query,
//!     Some(&ClickEvent::scalar("Open")),
//!     &DashboardContext::default(),
//! )?;
//! println!("{:?}", payload);
//! println!("{}", TraceFormatter::format_trace(&trace));
//! # Ok(())
//! # }
//! ```

// Engine
pub use crate::engine::{Clock, DrilldownEngine, EngineConfig, FixedClock, SystemClock, merge_hygiene_filters};

// Inputs and output
pub use crate::filters::{FilterMap, Interval};
pub use crate::model::{ClickEvent, DashboardContext, FilterPayload, WidgetQuery};

// Registry
pub use crate::registry::{ReportDescriptor, ReportFamily, ReportType, ReportTypeRegistry};

// Post-processing
pub use crate::postprocess::{PostProcessor, ProcessContext, Stage};

// Error types
pub use crate::error::{ConfigError, DerivationError, RegistryError};

// Trace formatting
pub use crate::trace::{DerivationTrace, TraceFormatter};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
