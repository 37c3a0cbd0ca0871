//! Effort-investment (business alignment) adjustments.

use crate::error::DerivationError;
use crate::filters::{Interval, end_of_day, epoch_of, is_present, period_bounds, string_of, time_window};
use crate::model::ClickEvent;
use crate::postprocess::{PostProcessor, ProcessContext, Stage, processor_failed};
use chrono::{NaiveDate, Weekday};
use serde_json::{Value, json};

const TREND_AXES: &[&str] = &["trend", "committed_at", "issue_resolved_at", "workitem_resolved_at"];

const BI_WEEK_SPAN: i64 = 14 * 86_400;

/// Investment trends drill into an absolute window starting at the clicked bucket.
///
/// The bucket start comes from a time-bucket click or from the `start_date` of a
/// structured click. Month, week and quarter windows end with their calendar period; a
/// bi-weekly window ends exactly two weeks after its start. With `compare_against_now`
/// the window never ends after today.
pub struct TrendWindow;

impl TrendWindow {
    fn window_end(epoch: i64, interval: Interval) -> Option<i64> {
        match interval {
            Interval::BiWeek => epoch.checked_add(BI_WEEK_SPAN),
            _ => period_bounds(epoch, interval, Weekday::Mon).map(|(_, end)| end),
        }
    }

    fn clicked_start(ctx: &ProcessContext<'_>) -> Option<i64> {
        ctx.click_epoch().or_else(|| {
            ctx.click
                .and_then(ClickEvent::as_structured)
                .and_then(|fields| fields.get("start_date"))
                .and_then(start_date_epoch)
        })
    }
}

/// Epoch seconds of a bucket start given as epoch seconds or a `01 Feb 2021`,
/// `Feb 2021` or `2021-02-01` label.
fn start_date_epoch(raw: &Value) -> Option<i64> {
    if let Some(epoch) = epoch_of(raw) {
        return Some(epoch);
    }
    let label = raw.as_str()?.trim();
    let date = NaiveDate::parse_from_str(label, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("01 {}", label), "%d %b %Y"))
        .or_else(|_| NaiveDate::parse_from_str(label, "%Y-%m-%d"))
        .ok()?;
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp())
}

impl PostProcessor for TrendWindow {
    fn id(&self) -> &str {
        "effort.trend_window"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["start_time".to_string(), "start_date".to_string()]
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        stage.filters.remove("start_date");
        if !TREND_AXES.contains(&stage.across.as_str()) {
            return Ok(stage);
        }
        let Some(epoch) = Self::clicked_start(ctx) else {
            return Ok(stage);
        };
        let key = ctx.trend_key().unwrap_or("issue_resolved_at").to_string();
        let interval = ctx.interval.unwrap_or(Interval::Month);
        let mut end = Self::window_end(epoch, interval)
            .ok_or_else(|| processor_failed(self.id(), format!("epoch {} out of range", epoch)))?;
        if ctx.descriptor.flags.compare_against_now {
            if let Some(today_end) = end_of_day(ctx.now) {
                end = end.min(today_end);
            }
        }

        stage.filters.insert(key.clone(), time_window(epoch, end));
        if key != "start_time" {
            stage.filters.remove("start_time");
        }
        Ok(stage)
    }
}

/// Scopes categorization reports to completed work and the clicked category.
///
/// Completed statuses from the profile win; otherwise the done status category is used.
/// Nothing is injected when the filter already scopes statuses.
pub struct StatusCategories;

struct EffortKeys {
    statuses: &'static str,
    status_categories: &'static str,
    scheme: &'static str,
    categories: &'static str,
    done: Value,
}

impl StatusCategories {
    fn keys(azure: bool) -> EffortKeys {
        if azure {
            EffortKeys {
                statuses: "workitem_statuses",
                status_categories: "workitem_status_categories",
                scheme: "workitem_ticket_categorization_scheme",
                categories: "workitem_ticket_categories",
                done: json!(["Completed", "Resolved"]),
            }
        } else {
            EffortKeys {
                statuses: "statuses",
                status_categories: "status_categories",
                scheme: "ticket_categorization_scheme",
                categories: "ticket_categories",
                done: json!(["Done"]),
            }
        }
    }
}

impl PostProcessor for StatusCategories {
    fn id(&self) -> &str {
        "effort.status_categories"
    }

    fn unset_keys(&self) -> Vec<String> {
        ["completed_statuses", "effort_investment_profile", "dataKeyClicked"]
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    fn process(&self, mut stage: Stage, ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let keys = Self::keys(ctx.is_azure());
        let filters = &mut stage.filters;

        if let Some(profile) = filters.remove("effort_investment_profile") {
            if is_present(&profile) && !filters.contains_key(keys.scheme) {
                filters.insert(keys.scheme.to_string(), profile);
            }
        }
        if let Some(category) = string_of(filters, "dataKeyClicked") {
            filters.insert(keys.categories.to_string(), json!([category]));
        }
        filters.remove("dataKeyClicked");

        let completed = filters
            .remove("completed_statuses")
            .filter(|v| v.is_array() && is_present(v));
        let scoped = [keys.statuses, keys.status_categories]
            .iter()
            .any(|k| filters.get(*k).is_some_and(is_present));
        if !scoped {
            match completed {
                Some(statuses) => {
                    filters.insert(keys.statuses.to_string(), statuses);
                }
                None => {
                    filters.insert(keys.status_categories.to_string(), keys.done);
                }
            }
        }
        Ok(stage)
    }
}
