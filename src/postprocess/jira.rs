use crate::error::DerivationError;
use crate::filters::{MISSING_FIELDS, is_present, with_nested_entry};
use crate::postprocess::{PostProcessor, ProcessContext, Stage};
use crate::registry::ReportFamily;
use serde_json::Value;

const UNRESOLVED: &str = "UNRESOLVED";

/// An "UNRESOLVED" resolution bucket means the resolution field is unset.
pub struct Unresolved;

impl PostProcessor for Unresolved {
    fn id(&self) -> &str {
        "jira.unresolved"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["resolutions".to_string()]
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let Some(resolutions) = stage.filters.get("resolutions").and_then(Value::as_array) else {
            return Ok(stage);
        };
        if !resolutions.iter().any(|r| r.as_str() == Some(UNRESOLVED)) {
            return Ok(stage);
        }
        let remaining: Vec<Value> = resolutions
            .iter()
            .filter(|r| r.as_str() != Some(UNRESOLVED))
            .cloned()
            .collect();

        let mut filters = with_nested_entry(&stage.filters, MISSING_FIELDS, "resolution", Value::Bool(true));
        if remaining.is_empty() {
            filters.remove("resolutions");
        } else {
            filters.insert("resolutions".to_string(), Value::Array(remaining));
        }
        stage.filters = filters;
        Ok(stage)
    }
}

/// Carries the dashboard's Jira OR-query into the drilldown unless the dashboard disables it.
pub struct OrQuery;

impl PostProcessor for OrQuery {
    fn id(&self) -> &str {
        "jira.or_query"
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        if ctx.dashboard.metadata_flag("disable_or_filters") {
            return Ok(stage);
        }
        let Some(or_query) = ctx
            .dashboard
            .metadata
            .get("jira_or_query")
            .filter(|q| q.is_object() && is_present(q))
        else {
            return Ok(stage);
        };
        let key = if ctx.descriptor.family == ReportFamily::Jira {
            "or"
        } else {
            "jira_or"
        };
        if !stage.filters.contains_key(key) {
            stage.filters.insert(key.to_string(), or_query.clone());
        }
        Ok(stage)
    }
}
