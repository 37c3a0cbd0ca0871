//! Strategies shared across report families.

use crate::error::DerivationError;
use crate::filters::{Interval, is_present, period_bounds, string_range};
use crate::model::ClickEvent;
use crate::postprocess::{PostProcessor, ProcessContext, Stage, processor_failed};
use serde_json::{Number, Value};

/// Keys whose windows use inclusive bounds.
const INCLUSIVE_WINDOW_KEYS: &[&str] = &["issue_due_at"];

/// Turns a click on a time axis into an absolute window over the widget interval.
///
/// The window is clipped to a range already present on the target key, and a day-bucket
/// `start_time` left by the mapper is dropped in favour of the axis key.
pub struct TimeAxisWindow {
    id: &'static str,
    axes: &'static [(&'static str, &'static str)],
}

impl TimeAxisWindow {
    pub fn new(id: &'static str, axes: &'static [(&'static str, &'static str)]) -> Self {
        Self { id, axes }
    }

    fn key_for(&self, across: &str) -> Option<&'static str> {
        self.axes
            .iter()
            .find(|(axis, _)| *axis == across)
            .map(|(_, key)| *key)
    }
}

fn bound(range: &Value, ops: [&str; 2]) -> Option<i64> {
    ops.iter()
        .find_map(|op| range.get(*op))
        .and_then(crate::filters::epoch_of)
}

impl PostProcessor for TimeAxisWindow {
    fn id(&self) -> &str {
        self.id
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["start_time".to_string()]
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let (Some(key), Some(epoch)) = (self.key_for(&stage.across), ctx.click_epoch()) else {
            return Ok(stage);
        };
        let interval = ctx.interval.unwrap_or(Interval::Day);
        let (mut start, mut end) = period_bounds(epoch, interval, ctx.week_start)
            .ok_or_else(|| processor_failed(self.id, format!("epoch {} out of range", epoch)))?;

        if let Some(existing) = stage.filters.get(key) {
            if let Some(lower) = bound(existing, ["$gt", "$gte"]) {
                start = start.max(lower);
            }
            if let Some(upper) = bound(existing, ["$lt", "$lte"]) {
                end = end.min(upper);
            }
        }

        let window = if INCLUSIVE_WINDOW_KEYS.contains(&key) {
            string_range("$gte", start, "$lte", end)
        } else {
            string_range("$gt", start, "$lt", end)
        };
        stage.filters.insert(key.to_string(), window);
        if key != "start_time" && matches!(ctx.click, Some(ClickEvent::TimeBucket { .. })) {
            stage.filters.remove("start_time");
        }
        Ok(stage)
    }
}

/// Snapshot reports: the clicked trend point is the ingestion timestamp itself.
pub struct IngestedAt;

impl PostProcessor for IngestedAt {
    fn id(&self) -> &str {
        "common.ingested_at"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["start_time".to_string()]
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        if stage.across != "trend" || !ctx.descriptor.flags.label_to_timestamp {
            return Ok(stage);
        }
        let Some(epoch) = ctx.click_epoch() else {
            return Ok(stage);
        };
        let snapshot = if ctx.descriptor.flags.compare_against_now {
            epoch.min(ctx.now)
        } else {
            epoch
        };
        stage.filters.insert("ingested_at".to_string(), Value::from(snapshot));
        stage.filters.remove("start_time");
        Ok(stage)
    }
}

/// Moves `source` to `target`, dividing every numeric value by `divisor`.
pub struct UnitConversion {
    id: &'static str,
    source: &'static str,
    target: &'static str,
    divisor: f64,
}

impl UnitConversion {
    pub fn new(id: &'static str, source: &'static str, target: &'static str, divisor: f64) -> Self {
        Self {
            id,
            source,
            target,
            divisor,
        }
    }

    fn convert(&self, value: &Value) -> Result<Value, DerivationError> {
        match value {
            Value::Number(n) => {
                let raw = n
                    .as_f64()
                    .ok_or_else(|| processor_failed(self.id, format!("'{}' is not numeric", n)))?;
                Ok(number_value(raw / self.divisor))
            }
            Value::String(s) => {
                let raw: f64 = s
                    .trim()
                    .parse()
                    .map_err(|_| processor_failed(self.id, format!("'{}' is not numeric", s)))?;
                Ok(Value::String(number_value(raw / self.divisor).to_string()))
            }
            Value::Array(items) => items.iter().map(|item| self.convert(item)).collect(),
            Value::Object(map) => map
                .iter()
                .map(|(op, bound)| Ok((op.clone(), self.convert(bound)?)))
                .collect::<Result<serde_json::Map<String, Value>, DerivationError>>()
                .map(Value::Object),
            other => Ok(other.clone()),
        }
    }
}

fn number_value(raw: f64) -> Value {
    if raw.fract() == 0.0 && raw.abs() < i64::MAX as f64 {
        Value::from(raw as i64)
    } else {
        Number::from_f64(raw).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl PostProcessor for UnitConversion {
    fn id(&self) -> &str {
        self.id
    }

    fn unset_keys(&self) -> Vec<String> {
        vec![self.source.to_string()]
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let Some(value) = stage.filters.remove(self.source) else {
            return Ok(stage);
        };
        let converted = self.convert(&value)?;
        stage.filters.insert(self.target.to_string(), converted);
        Ok(stage)
    }
}

/// Renames a legacy key, only when it is present and non-empty; an existing target wins.
pub struct LegacyRename {
    id: &'static str,
    legacy: &'static str,
    target: &'static str,
}

impl LegacyRename {
    pub fn new(id: &'static str, legacy: &'static str, target: &'static str) -> Self {
        Self { id, legacy, target }
    }
}

impl PostProcessor for LegacyRename {
    fn id(&self) -> &str {
        self.id
    }

    fn unset_keys(&self) -> Vec<String> {
        vec![self.legacy.to_string()]
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let legacy_present = stage.filters.get(self.legacy).is_some_and(is_present);
        if !legacy_present {
            return Ok(stage);
        }
        if let Some(value) = stage.filters.remove(self.legacy) {
            let target_present = stage.filters.get(self.target).is_some_and(is_present);
            if !target_present {
                stage.filters.insert(self.target.to_string(), value);
            }
        }
        Ok(stage)
    }
}
