//! Inputs and output of a drilldown derivation.

pub mod click;
pub mod context;
pub mod payload;
pub mod query;

pub use click::ClickEvent;
pub use context::{CustomFieldSpec, DashboardContext};
pub use payload::FilterPayload;
pub use query::WidgetQuery;
