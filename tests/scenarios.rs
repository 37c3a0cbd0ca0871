//! End-to-end drilldown scenarios recorded from the dashboard.
mod common;
use common::*;
use drilldown::engine::sanitizer::sanitize;
use drilldown::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_cicd_user_click_scopes_to_user() {
        let payload = derive(
            "jenkins_job_config_change_counts",
            &query("cicd_user_id", json!({})),
            Some(ClickEvent::scalar("viraj")),
            &context(json!({"product_id": "186"})),
        );

        assert_eq!(
            Value::Object(payload.filter),
            json!({"product_id": "186", "cicd_user_ids": ["viraj"]})
        );
        assert_eq!(payload.across, "cicd_user_id");
    }

    #[test]
    fn test_config_change_trend_bucket_uses_report_key() {
        let payload = derive(
            "jenkins_job_config_change_counts_trend",
            &query("trend", json!({})),
            Some(ClickEvent::bucket("02/10", "1612915200")),
            &DashboardContext::default(),
        );

        assert_eq!(
            payload.filter["job_config_changed_at"],
            json!({"$gt": "1612915200", "$lt": "1613001599"})
        );
        assert!(!payload.filter.contains_key("start_time"));
    }

    #[test]
    fn test_pipeline_duration_bucket_keeps_end_time() {
        let end_time = json!({"$gt": "1617062400", "$lt": "1617663252"});
        let payload = derive(
            "cicd_pipeline_jobs_duration_trend_report",
            &query("trend", json!({"end_time": end_time.clone()})),
            Some(ClickEvent::bucket("04/01", "1617235200")),
            &DashboardContext::default(),
        );

        assert_eq!(payload.filter["end_time"], end_time);
        assert_eq!(
            payload.filter["start_time"],
            json!({"$gt": "1617235200", "$lt": "1617321599"})
        );
    }

    #[test]
    fn test_hygiene_merge_of_two_sources() {
        let a = filters(json!({
            "missing_fields": {"story_points": false, "customfield_10020": false}
        }));
        let b = filters(json!({
            "status_categories": ["Done"],
            "exclude": {"custom_fields": {"customfield_10020": ["Sprint 1"]}}
        }));

        let merged = merge_hygiene_filters(&a, &b, None);
        assert_eq!(
            merged["exclude"]["custom_fields"],
            json!({"customfield_10020": ["Sprint 1"]})
        );
        assert_eq!(merged["missing_fields"], a["missing_fields"]);
        assert_eq!(merged["hygiene_types"], json!([]));
        assert_eq!(merged["status_categories"], json!(["Done"]));
    }

    #[test]
    fn test_sanitizer_drops_empty_list() {
        let cleaned = sanitize(&filters(json!({"projects": [], "status_categories": ["Done"]})), &[]);
        assert!(!cleaned.contains_key("projects"));
        assert_eq!(cleaned["status_categories"], json!(["Done"]));
    }

    #[test]
    fn test_empty_list_never_reaches_payload() {
        let payload = derive(
            "tickets_report",
            &query("status", json!({"projects": [], "status_categories": ["Done"]})),
            Some(ClickEvent::scalar("Open")),
            &DashboardContext::default(),
        );
        assert!(!payload.filter.contains_key("projects"));
        assert_eq!(payload.filter["status_categories"], json!(["Done"]));
        assert_eq!(payload.filter["statuses"], json!(["Open"]));
    }

    #[test]
    fn test_stored_widget_and_dashboard_json() {
        let engine = create_engine();
        let widget: Value = serde_json::from_str(TICKETS_WIDGET_JSON).expect("Failed to parse widget");
        let dashboard: Value = serde_json::from_str(DASHBOARD_CONTEXT_JSON).expect("Failed to parse context");

        let payload = engine
            .derive_json("tickets_report", &widget, &json!("jane"), &dashboard)
            .expect("Failed to derive from JSON inputs");

        assert_eq!(payload.across, "assignee");
        assert_eq!(payload.filter["assignees"], json!(["jane"]));
        assert_eq!(payload.filter["product_id"], json!("186"));
        assert_eq!(payload.filter["exclude"], json!({"priorities": ["LOW"]}));
        assert_eq!(payload.filter["custom_fields"], json!({"customfield_10020": ["Team A"]}));
        assert_eq!(payload.filter["or"], json!({"labels": ["urgent"]}));
        assert!(!payload.filter.contains_key("statuses"));
        assert!(!payload.filter.contains_key("interval"));
        assert_eq!(payload.ou_ids, Some(vec!["ou-1".to_string()]));
        assert_eq!(payload.ou_exclusions, Some(vec!["assignees".to_string()]));

        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    }

    #[test]
    fn test_resolution_time_payload_carries_sort_and_interval() {
        let payload = derive(
            "resolution_time_report",
            &query("assignee", json!({})).with_interval("month"),
            Some(ClickEvent::scalar("jane")),
            &DashboardContext::default(),
        );
        assert_eq!(payload.interval.as_deref(), Some("month"));
        assert_eq!(payload.sort, Some(vec![json!({"id": "resolution_time", "desc": true})]));
    }

    #[test]
    fn test_widget_sort_used_without_report_default() {
        let sort = vec![json!({"id": "priority", "desc": false})];
        let payload = derive(
            "tickets_report",
            &query("assignee", json!({})).with_sort(sort.clone()),
            Some(ClickEvent::scalar("jane")),
            &DashboardContext::default(),
        );
        assert_eq!(payload.sort, Some(sort));
        assert!(!payload.filter.contains_key("sort"));
    }

    #[test]
    fn test_unknown_report_type_uses_generic_pipeline() {
        let payload = derive(
            "brand_new_report",
            &query("status", json!({"projects": ["A"]})),
            Some(ClickEvent::scalar("Open")),
            &context(json!({"product_id": "1"})),
        );
        assert_eq!(
            Value::Object(payload.filter),
            json!({"projects": ["A"], "statuses": ["Open"], "product_id": "1"})
        );
        assert_eq!(payload.ou_ids, None);
    }
}
