//! Maps the resolved dimension and the clicked value onto filter entries.

use crate::engine::combiner::hoist_custom_fields;
use crate::engine::hygiene::merge_hygiene_filters;
use crate::filters::calendar::DAY_SPAN;
use crate::filters::{
    CUSTOM_FIELDS, FilterMap, Interval, MISSING_FIELDS, epoch_of, is_custom_field_key,
    period_bounds, time_window, with_entry, with_nested_entry,
};
use crate::model::{ClickEvent, DashboardContext, WidgetQuery};
use crate::registry::{ReportDescriptor, ReportTypeRegistry};
use chrono::Weekday;
use serde_json::{Value, json};
use tracing::{debug, trace};

/// Axes on which an equality filter for a scalar click is meaningless.
pub const TIME_CONTINUOUS_AXES: &[&str] = &[
    "trend",
    "issue_updated",
    "issue_created",
    "ticket_created",
    "first_comment",
    "column",
    "links",
];

/// Integration-specific time axes, handled by time-window post-processors.
pub const DOMAIN_TIME_AXES: &[&str] = &[
    "issue_resolved",
    "issue_due",
    "issue_closed",
    "workitem_created_at",
    "workitem_updated_at",
    "workitem_resolved_at",
    "pr_created",
    "pr_merged",
    "pr_closed",
    "pr_updated",
    "committed",
    "job_end",
    "first_detected",
    "last_detected",
    "incident_created_at",
    "incident_resolved_at",
    "alert_created_at",
    "alert_resolved_at",
];

pub const HYGIENE_AXES: &[&str] = &["hygiene_type", "workitem_hygiene_types"];

/// Axes whose scalar value is a count matched with an inclusive point range.
const COUNT_AXES: &[(&str, &str)] = &[
    ("reviewer_count", "num_reviewers"),
    ("approver_count", "num_approvers"),
];

const ASSIGNEE_AXES: &[&str] = &["assignee", "first_assignee"];

/// Everything the mapper reads besides the filter map itself.
pub struct MapContext<'a> {
    pub report_type: &'a str,
    pub descriptor: &'a ReportDescriptor,
    pub registry: &'a ReportTypeRegistry,
    pub dashboard: &'a DashboardContext,
    pub query: &'a WidgetQuery,
    pub interval: Option<Interval>,
    pub now: i64,
    pub week_start: Weekday,
    pub sentinel: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    pub filters: FilterMap,
    pub across: String,
}

pub fn is_time_continuous(across: &str, descriptor: &ReportDescriptor) -> bool {
    TIME_CONTINUOUS_AXES.contains(&across)
        || DOMAIN_TIME_AXES.contains(&across)
        || descriptor.is_time_axis(across)
}

pub fn map_click(
    ctx: &MapContext<'_>,
    across: &str,
    click: Option<&ClickEvent>,
    filters: FilterMap,
) -> Mapped {
    let filters = match click {
        Some(click) => hoist_custom_fields(apply_rules(ctx, across, click, filters)),
        None => {
            debug!(report_type = ctx.report_type, "no recognizable click; filters unchanged");
            filters
        }
    };
    Mapped {
        filters,
        across: switched_across(ctx, across),
    }
}

fn apply_rules(ctx: &MapContext<'_>, across: &str, click: &ClickEvent, filters: FilterMap) -> FilterMap {
    match click {
        ClickEvent::Scalar(value) => {
            if is_time_continuous(across, ctx.descriptor) && !has_link_list(across, &filters) {
                trace!(across, "scalar click on a continuous axis adds no equality filter");
                return filters;
            }
            if HYGIENE_AXES.contains(&across) {
                return map_hygiene_scalar(ctx, across, value, filters);
            }
            map_scalar(ctx, across, value, filters)
        }
        ClickEvent::TimeBucket { value, .. } => map_time_bucket(ctx, value, filters),
        ClickEvent::Structured(fields) => {
            let fields = drop_axis_keys(fields);
            if HYGIENE_AXES.contains(&across) {
                merge_hygiene_filters(&fields, &filters, Some(&ctx.query.filters))
            } else {
                map_structured(&fields, filters)
            }
        }
    }
}

fn has_link_list(across: &str, filters: &FilterMap) -> bool {
    across == "links"
        && filters
            .get("links")
            .and_then(Value::as_array)
            .is_some_and(|links| !links.is_empty())
}

fn point_range(value: &str) -> Value {
    json!({ "$gte": value, "$lte": value })
}

fn map_scalar(ctx: &MapContext<'_>, across: &str, value: &str, filters: FilterMap) -> FilterMap {
    let unassigned = value.contains("UNASSIGNED") && !ctx.descriptor.flags.keep_unassigned_label;

    if unassigned && ASSIGNEE_AXES.contains(&across) {
        return with_nested_entry(&filters, MISSING_FIELDS, across, Value::Bool(true));
    }
    if let Some((_, key)) = COUNT_AXES.iter().find(|(axis, _)| *axis == across) {
        return with_entry(&filters, key, point_range(value));
    }

    let filter_key = ctx.registry.values_to_filter_key(ctx.report_type, across);
    let list = if unassigned {
        json!([ctx.sentinel])
    } else {
        json!([value])
    };

    if is_custom_field_key(&filter_key) {
        let nested = if ctx.dashboard.is_checkbox(&filter_key) {
            Value::String(value.to_string())
        } else {
            list
        };
        return with_nested_entry(&filters, CUSTOM_FIELDS, &filter_key, nested);
    }
    if ctx.descriptor.flags.numeric_bin && !unassigned {
        return with_entry(&filters, &filter_key, point_range(value));
    }
    with_entry(&filters, &filter_key, list)
}

/// A clicked hygiene bar: a built-in category, or a custom hygiene defined on the dashboard.
fn map_hygiene_scalar(ctx: &MapContext<'_>, across: &str, value: &str, filters: FilterMap) -> FilterMap {
    if let Some(custom) = custom_hygiene_filter(ctx.dashboard, value) {
        return merge_hygiene_filters(&custom, &filters, Some(&ctx.query.filters));
    }
    let filter_key = ctx.registry.values_to_filter_key(ctx.report_type, across);
    let category = if value.contains("UNASSIGNED") {
        ctx.sentinel.to_string()
    } else {
        value.to_lowercase()
    };
    with_entry(&filters, &filter_key, json!([category]))
}

/// Filter of the custom hygiene named (or identified) by `value` in dashboard metadata.
fn custom_hygiene_filter(dashboard: &DashboardContext, value: &str) -> Option<FilterMap> {
    dashboard
        .metadata
        .get("custom_hygienes")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find(|hygiene| {
            ["name", "id"]
                .iter()
                .any(|key| hygiene.get(*key).and_then(Value::as_str) == Some(value))
        })
        .and_then(|hygiene| hygiene.get("filter"))
        .and_then(Value::as_object)
        .cloned()
}

fn map_time_bucket(ctx: &MapContext<'_>, value: &str, filters: FilterMap) -> FilterMap {
    let Some(epoch) = epoch_of(&Value::String(value.to_string())) else {
        debug!(value, "time bucket value is not epoch seconds; ignoring click");
        return filters;
    };
    let bounds = match ctx.interval.filter(|interval| *interval != Interval::Day) {
        Some(interval) => period_bounds(epoch, interval, ctx.week_start),
        None => epoch.checked_add(DAY_SPAN).map(|end| (epoch, end)),
    };
    let Some((start, end)) = bounds else {
        debug!(epoch, "time bucket outside the calendar range; ignoring click");
        return filters;
    };
    let end = if ctx.descriptor.flags.compare_against_now {
        end.min(ctx.now)
    } else {
        end
    };
    let key = ctx
        .registry
        .report_filter_key(ctx.report_type, "trend")
        .unwrap_or("start_time");
    with_entry(&filters, key, time_window(start, end))
}

fn drop_axis_keys(fields: &FilterMap) -> FilterMap {
    fields
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "across" | "stacks"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn map_structured(fields: &FilterMap, filters: FilterMap) -> FilterMap {
    let mut merged = filters;
    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }
    if fields.contains_key("creators") {
        merged.remove("approvers");
    } else if fields.contains_key("approvers") {
        merged.remove("creators");
    }
    merged
}

fn switched_across(ctx: &MapContext<'_>, across: &str) -> String {
    match (&ctx.descriptor.interval_across_switch, ctx.interval) {
        (Some((from, to)), Some(interval)) if from == across && interval.is_coarse() => to.clone(),
        _ => across.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ReportType;

    struct Fixture {
        registry: ReportTypeRegistry,
        dashboard: DashboardContext,
        query: WidgetQuery,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: ReportTypeRegistry::builtin(),
                dashboard: DashboardContext::default(),
                query: WidgetQuery::default(),
            }
        }

        fn map(&self, report: &str, across: &str, click: ClickEvent, interval: Option<Interval>) -> Mapped {
            let ctx = MapContext {
                report_type: report,
                descriptor: self.registry.lookup(report),
                registry: &self.registry,
                dashboard: &self.dashboard,
                query: &self.query,
                interval,
                now: 1_700_000_000,
                week_start: Weekday::Sun,
                sentinel: "_UNASSIGNED_",
            };
            map_click(&ctx, across, Some(&click), FilterMap::new())
        }
    }

    #[test]
    fn test_scalar_uses_global_filter_key() {
        let mapped = Fixture::new().map("tickets_report", "status", ClickEvent::scalar("Open"), None);
        assert_eq!(mapped.filters["statuses"], json!(["Open"]));
    }

    #[test]
    fn test_scalar_on_continuous_axis_is_skipped() {
        let mapped = Fixture::new().map("tickets_report", "issue_created", ClickEvent::scalar("1612915200"), None);
        assert!(mapped.filters.is_empty());
    }

    #[test]
    fn test_unassigned_assignee_becomes_missing_field() {
        let mapped = Fixture::new().map("tickets_report", "assignee", ClickEvent::scalar("_UNASSIGNED_"), None);
        assert_eq!(mapped.filters["missing_fields"], json!({"assignee": true}));
        assert!(!mapped.filters.contains_key("assignees"));
    }

    #[test]
    fn test_unassigned_label_kept_for_cicd() {
        let mapped = Fixture::new().map(
            ReportType::CicdJobsCountReport.as_str(),
            "cicd_user_id",
            ClickEvent::scalar("UNASSIGNED"),
            None,
        );
        assert_eq!(mapped.filters["cicd_user_ids"], json!(["UNASSIGNED"]));
    }

    #[test]
    fn test_reviewer_count_is_point_range() {
        let mapped = Fixture::new().map("github_prs_report", "reviewer_count", ClickEvent::scalar("2"), None);
        assert_eq!(mapped.filters["num_reviewers"], json!({"$gte": "2", "$lte": "2"}));
    }

    #[test]
    fn test_checkbox_custom_field_stores_raw_scalar() {
        let mut fixture = Fixture::new();
        fixture.dashboard = DashboardContext::default().with_custom_field("customfield_7", "checkbox");
        let mapped = fixture.map("tickets_report", "customfield_7", ClickEvent::scalar("true"), None);
        assert_eq!(mapped.filters["custom_fields"], json!({"customfield_7": "true"}));
    }

    #[test]
    fn test_monthly_bucket_spans_calendar_month() {
        let mapped = Fixture::new().map(
            "tickets_report",
            "trend",
            ClickEvent::bucket("Feb", "1612915200"),
            Some(Interval::Month),
        );
        assert_eq!(
            mapped.filters["start_time"],
            json!({"$gt": "1612137600", "$lt": "1614556799"})
        );
    }

    #[test]
    fn test_out_of_range_bucket_adds_no_filter() {
        let fixture = Fixture::new();
        let click = ClickEvent::bucket("x", "9223372036854775807");
        let daily = fixture.map("tickets_report", "trend", click.clone(), None);
        let monthly = fixture.map("tickets_report", "trend", click, Some(Interval::Month));
        assert!(daily.filters.is_empty());
        assert!(monthly.filters.is_empty());
    }

    #[test]
    fn test_hygiene_scalar_is_lowercased() {
        let mapped = Fixture::new().map("hygiene_report", "hygiene_type", ClickEvent::scalar("POOR_DESCRIPTION"), None);
        assert_eq!(mapped.filters["hygiene_types"], json!(["poor_description"]));
    }

    #[test]
    fn test_backlog_across_switches_for_coarse_interval() {
        let fixture = Fixture::new();
        let weekly = fixture.map("jira_backlog_trend_report", "issue_created", ClickEvent::scalar("x"), Some(Interval::Week));
        let daily = fixture.map("jira_backlog_trend_report", "issue_created", ClickEvent::scalar("x"), Some(Interval::Day));
        assert_eq!(weekly.across, "issue_closed");
        assert_eq!(daily.across, "issue_created");
    }
}
