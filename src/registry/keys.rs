//! Global dimension-to-filter-key names shared by every report.

use ahash::AHashMap;

const GLOBAL_VALUES_TO_FILTER_KEYS: &[(&str, &str)] = &[
    // Issue management
    ("assignee", "assignees"),
    ("first_assignee", "first_assignees"),
    ("reporter", "reporters"),
    ("status", "statuses"),
    ("status_category", "status_categories"),
    ("priority", "priorities"),
    ("project", "projects"),
    ("component", "components"),
    ("label", "labels"),
    ("issue_type", "issue_types"),
    ("epic", "epics"),
    ("parent", "parent_keys"),
    ("fix_version", "fix_versions"),
    ("version", "versions"),
    ("resolution", "resolutions"),
    ("sprint", "sprint_names"),
    ("hygiene_type", "hygiene_types"),
    ("workitem_hygiene_types", "workitem_hygiene_types"),
    ("workitem_type", "workitem_types"),
    ("workitem_status", "workitem_statuses"),
    ("workitem_priority", "workitem_priorities"),
    ("workitem_project", "workitem_projects"),
    ("parent_workitem_id", "parent_workitem_ids"),
    // SCM
    ("repo_id", "repo_ids"),
    ("branch", "branches"),
    ("author", "authors"),
    ("committer", "committers"),
    ("creator", "creators"),
    ("reviewer", "reviewers"),
    ("approver", "approvers"),
    ("label_name", "labels"),
    ("state", "states"),
    // CI/CD
    ("cicd_user_id", "cicd_user_ids"),
    ("job_status", "job_statuses"),
    ("job_name", "job_names"),
    ("job_normalized_full_name", "job_normalized_full_names"),
    ("instance_name", "instance_names"),
    ("qualified_job_name", "qualified_job_names"),
    ("project_name", "project_names"),
    // Support
    ("brand", "brands"),
    ("organization", "organizations"),
    ("requester", "requesters"),
    ("submitter", "submitters"),
    ("contact", "contacts"),
    ("account_name", "accounts"),
    // PagerDuty
    ("pd_service", "pd_service_ids"),
    ("incident_priority", "incident_priorities"),
    ("incident_urgency", "incident_urgencies"),
    ("alert_severity", "alert_severities"),
    ("user_id", "user_ids"),
    // Coverity
    ("impact", "cov_defect_impacts"),
    ("category", "cov_defect_categories"),
    ("kind", "cov_defect_kinds"),
    ("checker_name", "cov_defect_checker_names"),
    // TestRails
    ("milestone", "milestones"),
    ("test_plan", "test_plans"),
    ("test_run", "test_runs"),
    ("type", "types"),
];

/// Builds the table consulted when a report declares no mapping for a dimension.
pub fn global_values_to_filter_keys() -> AHashMap<String, String> {
    GLOBAL_VALUES_TO_FILTER_KEYS
        .iter()
        .map(|(across, key)| (across.to_string(), key.to_string()))
        .collect()
}
