use crate::error::DerivationError;
use crate::filters::{Interval, period_bounds, time_window};
use crate::model::ClickEvent;
use crate::postprocess::{PostProcessor, ProcessContext, Stage, processor_failed};
use serde_json::{Value, json};

const PERIOD_AXES: &[(&str, Interval)] = &[
    ("week", Interval::Week),
    ("bi_week", Interval::BiWeek),
    ("month", Interval::Month),
];

/// Sprint metric trends drill either into one sprint or into sprints completed in a period.
pub struct MetricTrend;

impl MetricTrend {
    fn sprint_name(click: Option<&ClickEvent>) -> Option<String> {
        match click? {
            ClickEvent::Scalar(name) => Some(name.clone()),
            ClickEvent::TimeBucket { name, .. } => Some(name.clone()),
            ClickEvent::Structured(_) => None,
        }
    }
}

impl PostProcessor for MetricTrend {
    fn id(&self) -> &str {
        "sprint.metric_trend"
    }

    fn unset_keys(&self) -> Vec<String> {
        [
            "metric",
            "week",
            "bi_week",
            "month",
            "sprint",
            "sprint_names",
            "workitem_sprint_full_names",
            "start_time",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect()
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let period = PERIOD_AXES
            .iter()
            .find(|(axis, _)| *axis == stage.across)
            .map(|(_, interval)| *interval);

        if let Some(interval) = period {
            let Some(epoch) = ctx.click_epoch() else {
                return Ok(stage);
            };
            let (start, end) = period_bounds(epoch, interval, ctx.week_start)
                .ok_or_else(|| processor_failed(self.id(), format!("epoch {} out of range", epoch)))?;
            stage
                .filters
                .insert("completed_at".to_string(), time_window(start, end));
        } else if stage.across == "sprint" {
            let Some(name) = Self::sprint_name(ctx.click) else {
                return Ok(stage);
            };
            stage.filters.insert("sprint_report".to_string(), json!([name]));
            let include_key = if ctx.is_azure() {
                "include_workitem_ids"
            } else {
                "include_issue_keys"
            };
            stage.filters.insert(include_key.to_string(), Value::Bool(true));
        } else {
            return Ok(stage);
        }

        for key in self.unset_keys() {
            stage.filters.remove(&key);
        }
        Ok(stage)
    }
}
