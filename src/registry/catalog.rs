//! Built-in drilldown configuration for every supported report type.

use crate::registry::descriptor::ReportDescriptor;
use crate::registry::report_type::ReportType;
use serde_json::json;

/// Descriptors for the reports that deviate from the generic pipeline.
///
/// Report types missing here still get a family-tagged default descriptor.
pub fn builtin_descriptors() -> Vec<ReportDescriptor> {
    let mut descriptors = Vec::new();
    descriptors.extend(cicd_descriptors());
    descriptors.extend(jira_descriptors());
    descriptors.extend(azure_descriptors());
    descriptors.extend(scm_descriptors());
    descriptors.extend(support_descriptors());
    descriptors.extend(effort_descriptors());
    descriptors.extend(sprint_descriptors());
    descriptors.extend(security_and_incident_descriptors());
    descriptors
}

fn cicd_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(JenkinsJobConfigChangeCounts),
        ReportDescriptor::new(JenkinsJobConfigChangeCountsTrend)
            .value_key("trend", "job_config_changed_at"),
        ReportDescriptor::new(JenkinsJobConfigChangeCountsStat)
            .forced_across("trend")
            .value_key("trend", "job_config_changed_at"),
        ReportDescriptor::new(CicdPipelineJobsDurationReport)
            .post_processor("cicd.duration_seconds")
            .post_processor("cicd.integration_scope")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(CicdPipelineJobsDurationTrendReport)
            .post_processor("cicd.duration_seconds")
            .post_processor("cicd.integration_scope"),
        ReportDescriptor::new(CicdPipelineJobsCountReport)
            .post_processor("cicd.integration_scope")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(CicdPipelineJobsCountTrendReport)
            .post_processor("cicd.integration_scope"),
        ReportDescriptor::new(CicdScmJobsCountReport)
            .value_key("trend", "end_time")
            .time_axis("job_end")
            .post_processor("cicd.job_end_window"),
        ReportDescriptor::new(CicdScmJobsDurationReport)
            .value_key("trend", "end_time")
            .time_axis("job_end")
            .post_processor("cicd.job_end_window")
            .post_processor("cicd.duration_seconds"),
        ReportDescriptor::new(CodeVolumeVsDeploymentReport).value_key("trend", "end_time"),
    ]
}

fn jira_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(TicketsReport)
            .value_key("links", "linked_issue_keys")
            .post_processor("common.time_axis_window")
            .post_processor("jira.unresolved")
            .post_processor("jira.or_query")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(TicketsReportTrends)
            .value_key("trend", "issue_created_at")
            .post_processor("jira.or_query"),
        ReportDescriptor::new(HygieneReport)
            .post_processor("jira.idle_days")
            .post_processor("jira.or_query")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(HygieneReportTrends)
            .post_processor("common.ingested_at")
            .post_processor("jira.idle_days")
            .with_flags(|f| f.compare_against_now = true),
        ReportDescriptor::new(BounceReport)
            .post_processor("common.time_axis_window")
            .post_processor("jira.unresolved"),
        ReportDescriptor::new(HopsReport)
            .post_processor("common.time_axis_window")
            .post_processor("jira.unresolved"),
        ReportDescriptor::new(FirstAssigneeReport).post_processor("common.time_axis_window"),
        ReportDescriptor::new(ResponseTimeReport)
            .value_key("trend", "issue_created_at")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(ResolutionTimeReport)
            .value_key("trend", "issue_resolved_at")
            .post_processor("common.time_axis_window")
            .sort_by(vec![json!({"id": "resolution_time", "desc": true})])
            .with_flags(|f| {
                f.supports_ou = true;
                f.include_interval_in_payload = true;
            }),
        ReportDescriptor::new(StageBounceReport).value_key("stage", "stages"),
        ReportDescriptor::new(JiraBacklogTrendReport)
            .switch_across("issue_created", "issue_closed")
            .post_processor("common.ingested_at")
            .with_flags(|f| f.compare_against_now = true),
        ReportDescriptor::new(StoryPointsReport)
            .value_key("story_points", "story_points")
            .with_flags(|f| f.numeric_bin = true),
        ReportDescriptor::new(LeadTimeByStageReport)
            .hidden("calculation", json!("ticket_velocity"))
            .unset("ratings")
            .with_flags(|f| f.include_context_filter = false),
        ReportDescriptor::new(EpicPriorityTrendReport)
            .unset("issue_resolved_at")
            .unset("ticket_categorization_scheme"),
    ]
}

fn azure_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    let azure = |report_type: ReportType| {
        ReportDescriptor::new(report_type)
            .value_key("status", "workitem_statuses")
            .value_key("priority", "workitem_priorities")
            .value_key("project", "workitem_projects")
            .value_key("assignee", "workitem_assignees")
            .value_key("sprint", "workitem_sprint_full_names")
            .value_key("code_area", "code_area")
            .value_key("teams", "teams")
            .post_processor("azure.code_area")
            .post_processor("azure.parent_workitem")
            .post_processor("azure.iteration")
            .post_processor("azure.sprint")
    };
    vec![
        azure(AzureTicketsReport)
            .post_processor("common.time_axis_window")
            .with_flags(|f| f.supports_ou = true),
        azure(AzureTicketsReportTrends).value_key("trend", "workitem_created_at"),
        azure(AzureHygieneReport),
        azure(AzureBacklogTrendReport)
            .switch_across("workitem_created_at", "workitem_resolved_at")
            .post_processor("common.ingested_at")
            .with_flags(|f| f.compare_against_now = true),
        azure(AzureResolutionTimeReport).value_key("trend", "workitem_resolved_at"),
        azure(AzureIssuesProgressReport).unset("workitem_ticket_categorization_scheme"),
    ]
}

fn scm_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(GithubPrsReport)
            .post_processor("scm.pr_time_window")
            .with_flags(|f| f.supports_ou = true),
        ReportDescriptor::new(GithubPrsSingleStat)
            .forced_across("pr_created")
            .post_processor("scm.pr_time_window"),
        ReportDescriptor::new(GithubCommitsReport)
            .value_key("trend", "committed_at")
            .post_processor("scm.pr_time_window"),
        ReportDescriptor::new(GithubPrsMergeTrends).value_key("trend", "pr_merged_at"),
        ReportDescriptor::new(ScmIssuesTimeResolutionReport).post_processor("scm.pr_time_window"),
        ReportDescriptor::new(ReviewCollaborationReport).with_flags(|f| f.supports_ou = true),
    ]
}

fn support_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(JiraZendeskReport)
            .post_processor("support.created_window")
            .post_processor("jira.or_query"),
        ReportDescriptor::new(JiraSalesforceReport)
            .post_processor("support.created_window")
            .post_processor("jira.or_query"),
        ReportDescriptor::new(ZendeskTicketsReport).post_processor("support.created_window"),
        ReportDescriptor::new(ZendeskTicketsReportTrends).value_key("trend", "ticket_created_at"),
        ReportDescriptor::new(SalesforceTicketsReport).post_processor("support.created_window"),
    ]
}

fn effort_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(EffortInvestmentTrendReport)
            .value_key("trend", "issue_resolved_at")
            .post_processor("effort.trend_window")
            .post_processor("effort.status_categories")
            .unset("ticket_categorization_unit")
            .with_flags(|f| f.compare_against_now = true),
        ReportDescriptor::new(EffortInvestmentSingleStat)
            .post_processor("effort.status_categories")
            .unset("ticket_categorization_unit"),
        ReportDescriptor::new(JiraEffortInvestmentEngineerReport)
            .forced_across("assignee")
            .post_processor("effort.engineer")
            .post_processor("effort.status_categories")
            .unset("ticket_categorization_unit"),
        ReportDescriptor::new(AzureEffortInvestmentTrendReport)
            .value_key("trend", "workitem_resolved_at")
            .post_processor("effort.trend_window")
            .post_processor("effort.status_categories")
            .unset("ticket_categorization_unit")
            .with_flags(|f| f.compare_against_now = true),
        ReportDescriptor::new(AzureEffortInvestmentEngineerReport)
            .forced_across("assignee")
            .value_key("assignee", "workitem_assignees")
            .post_processor("effort.status_categories")
            .unset("ticket_categorization_unit"),
    ]
}

fn sprint_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(SprintMetricsTrend)
            .post_processor("sprint.metric_trend")
            .with_flags(|f| f.week_starts_on_monday = true),
        ReportDescriptor::new(SprintMetricsPercentageTrend)
            .post_processor("sprint.metric_trend")
            .with_flags(|f| f.week_starts_on_monday = true),
        ReportDescriptor::new(SprintMetricsSingleStat).implicit("include_issue_keys", json!(true)),
        ReportDescriptor::new(SprintGoal).value_key("sprint", "sprint_report"),
        ReportDescriptor::new(SprintDistributionRetrospectiveReport)
            .implicit("include_issue_keys", json!(true))
            .with_flags(|f| f.across_from_click = true),
        ReportDescriptor::new(AzureSprintMetricsTrend)
            .post_processor("sprint.metric_trend")
            .with_flags(|f| f.week_starts_on_monday = true),
    ]
}

fn security_and_incident_descriptors() -> Vec<ReportDescriptor> {
    use ReportType::*;
    vec![
        ReportDescriptor::new(CoverityIssuesReport).post_processor("coverity.detected_window"),
        ReportDescriptor::new(CoverityIssuesTrendReport)
            .value_key("trend", "cov_defect_snapshot_created_at")
            .post_processor("coverity.detected_window"),
        ReportDescriptor::new(PagerdutyIncidentReportTrends)
            .value_key("trend", "incident_created_at")
            .post_processor("pagerduty.time_axis"),
        ReportDescriptor::new(PagerdutyHotspotReport).post_processor("pagerduty.time_axis"),
        ReportDescriptor::new(PagerdutyAckTrend)
            .value_key("trend", "incident_acknowledged_at")
            .post_processor("pagerduty.time_axis"),
        ReportDescriptor::new(TestrailsTestsTrendReport).post_processor("testrails.trend_metric"),
    ]
}
