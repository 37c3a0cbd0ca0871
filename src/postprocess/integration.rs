//! CI/CD and TestRails adjustments.

use crate::error::DerivationError;
use crate::filters::{Interval, is_present, period_bounds, time_window};
use crate::postprocess::{PostProcessor, ProcessContext, Stage, processor_failed};
use serde_json::Value;

/// Scopes CI/CD drilldowns to the integrations the dashboard is filtered on.
pub struct IntegrationScope;

impl PostProcessor for IntegrationScope {
    fn id(&self) -> &str {
        "cicd.integration_scope"
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let scoped = stage.filters.get("cicd_integration_ids").is_some_and(is_present);
        if scoped {
            return Ok(stage);
        }
        if let Some(ids) = stage
            .filters
            .get("integration_ids")
            .filter(|ids| ids.is_array() && is_present(ids))
            .cloned()
        {
            stage.filters.insert("cicd_integration_ids".to_string(), ids);
        }
        Ok(stage)
    }
}

/// TestRails trends filter on the creation field matching the charted metric.
pub struct TestRailsTrendMetric;

impl PostProcessor for TestRailsTrendMetric {
    fn id(&self) -> &str {
        "testrails.trend_metric"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["start_time".to_string(), "metric".to_string()]
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        if stage.across != "trend" {
            return Ok(stage);
        }
        let Some(epoch) = ctx.click_epoch() else {
            return Ok(stage);
        };
        let key = match ctx.query.filters.get("metric").and_then(Value::as_str) {
            Some("test_case_count") => "created_on",
            _ => "created_at",
        };
        let interval = ctx.interval.unwrap_or(Interval::Day);
        let (start, end) = period_bounds(epoch, interval, ctx.week_start)
            .ok_or_else(|| processor_failed(self.id(), format!("epoch {} out of range", epoch)))?;

        stage.filters.insert(key.to_string(), time_window(start, end));
        stage.filters.remove("start_time");
        stage.filters.remove("metric");
        Ok(stage)
    }
}
