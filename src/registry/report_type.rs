use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integration family a report belongs to; selects family-wide behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFamily {
    #[default]
    Generic,
    Jira,
    Azure,
    Scm,
    Cicd,
    Support,
    Effort,
    Sprint,
    Coverity,
    PagerDuty,
    TestRails,
}

impl ReportFamily {
    /// Families whose charts keep the literal "UNASSIGNED" label instead of the sentinel.
    pub fn keeps_unassigned_label(&self) -> bool {
        matches!(self, Self::Cicd | Self::TestRails)
    }
}

/// Defines the closed set of report types with their wire names and families.
macro_rules! define_report_types {
    ( $( ($variant:ident, $name:literal, $family:ident) ),* $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ReportType {
            $( $variant, )*
        }

        impl ReportType {
            pub const ALL: &'static [ReportType] = &[ $( ReportType::$variant, )* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( ReportType::$variant => $name, )*
                }
            }

            pub fn family(&self) -> ReportFamily {
                match self {
                    $( ReportType::$variant => ReportFamily::$family, )*
                }
            }

            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(ReportType::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_report_types! {
    // Jenkins / CI-CD
    (JenkinsJobConfigChangeCounts, "jenkins_job_config_change_counts", Cicd),
    (JenkinsJobConfigChangeCountsTrend, "jenkins_job_config_change_counts_trend", Cicd),
    (JenkinsJobConfigChangeCountsStat, "jenkins_job_config_change_counts_stat", Cicd),
    (CicdPipelineJobsDurationReport, "cicd_pipeline_jobs_duration_report", Cicd),
    (CicdPipelineJobsDurationTrendReport, "cicd_pipeline_jobs_duration_trend_report", Cicd),
    (CicdPipelineJobsCountReport, "cicd_pipeline_jobs_count_report", Cicd),
    (CicdPipelineJobsCountTrendReport, "cicd_pipeline_jobs_count_trend_report", Cicd),
    (CicdScmJobsCountReport, "cicd_scm_jobs_count_report", Cicd),
    (CicdScmJobsDurationReport, "cicd_scm_jobs_duration_report", Cicd),
    (CicdJobsCountReport, "cicd_jobs_count_report", Cicd),
    (JobsCountTrendsReport, "jobs_count_trends_report", Cicd),
    (JobsDurationsTrendsReport, "jobs_durations_trends_report", Cicd),
    (CodeVolumeVsDeploymentReport, "code_volume_vs_deployment_report", Cicd),
    (JobRunsTestReport, "job_runs_test_report", Cicd),
    // Jira
    (TicketsReport, "tickets_report", Jira),
    (TicketsReportTrends, "tickets_report_trends", Jira),
    (HygieneReport, "hygiene_report", Jira),
    (HygieneReportTrends, "hygiene_report_trends", Jira),
    (BounceReport, "bounce_report", Jira),
    (HopsReport, "hops_report", Jira),
    (ResponseTimeReport, "response_time_report", Jira),
    (ResolutionTimeReport, "resolution_time_report", Jira),
    (FirstAssigneeReport, "first_assignee_report", Jira),
    (StageBounceReport, "stage_bounce_report", Jira),
    (AssigneeTimeReport, "assignee_time_report", Jira),
    (JiraTimeAcrossStages, "jira_time_across_stages", Jira),
    (JiraBacklogTrendReport, "jira_backlog_trend_report", Jira),
    (StoryPointsReport, "story_points_report", Jira),
    (LeadTimeByStageReport, "lead_time_by_stage_report", Jira),
    (EpicPriorityTrendReport, "epic_priority_trend_report", Jira),
    // Azure DevOps
    (AzureTicketsReport, "azure_tickets_report", Azure),
    (AzureTicketsReportTrends, "azure_tickets_report_trends", Azure),
    (AzureHygieneReport, "azure_hygiene_report", Azure),
    (AzureBacklogTrendReport, "azure_backlog_trend_report", Azure),
    (AzureResolutionTimeReport, "azure_resolution_time_report", Azure),
    (AzureIssuesProgressReport, "azure_issues_progress_report", Azure),
    // SCM
    (GithubPrsReport, "github_prs_report", Scm),
    (GithubPrsSingleStat, "github_prs_single_stat", Scm),
    (GithubCommitsReport, "github_commits_report", Scm),
    (GithubPrsMergeTrends, "github_prs_merge_trends", Scm),
    (ScmIssuesTimeResolutionReport, "scm_issues_time_resolution_report", Scm),
    (ReviewCollaborationReport, "review_collaboration_report", Scm),
    // Jira x Zendesk / Salesforce
    (JiraZendeskReport, "jira_zendesk_report", Support),
    (JiraSalesforceReport, "jira_salesforce_report", Support),
    (ZendeskTicketsReport, "zendesk_tickets_report", Support),
    (ZendeskTicketsReportTrends, "zendesk_tickets_report_trends", Support),
    (SalesforceTicketsReport, "salesforce_tickets_report", Support),
    // Effort investment / business alignment
    (EffortInvestmentTrendReport, "effort_investment_trend_report", Effort),
    (EffortInvestmentSingleStat, "effort_investment_single_stat", Effort),
    (JiraEffortInvestmentEngineerReport, "jira_effort_investment_engineer_report", Effort),
    (AzureEffortInvestmentTrendReport, "azure_effort_investment_trend_report", Effort),
    (AzureEffortInvestmentEngineerReport, "azure_effort_investment_engineer_report", Effort),
    // Sprints
    (SprintMetricsTrend, "sprint_metrics_trend", Sprint),
    (SprintMetricsPercentageTrend, "sprint_metrics_percentage_trend", Sprint),
    (SprintMetricsSingleStat, "sprint_metrics_single_stat", Sprint),
    (SprintGoal, "sprint_goal", Sprint),
    (SprintDistributionRetrospectiveReport, "sprint_distribution_retrospective_report", Sprint),
    (AzureSprintMetricsTrend, "azure_sprint_metrics_trend", Sprint),
    // Coverity
    (CoverityIssuesReport, "coverity_issues_report", Coverity),
    (CoverityIssuesTrendReport, "coverity_issues_trend_report", Coverity),
    // PagerDuty
    (PagerdutyIncidentReportTrends, "pagerduty_incident_report_trends", PagerDuty),
    (PagerdutyHotspotReport, "pagerduty_hotspot_report", PagerDuty),
    (PagerdutyAckTrend, "pagerduty_ack_trend", PagerDuty),
    // TestRails
    (TestrailsTestsReport, "testrails_tests_report", TestRails),
    (TestrailsTestsTrendReport, "testrails_tests_trend_report", TestRails),
}

impl ReportType {
    /// Azure-backed reports filed under a non-Azure family (sprints, effort).
    pub fn is_azure(&self) -> bool {
        self.family() == ReportFamily::Azure || self.as_str().starts_with("azure_")
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RegistryError::UnknownReportType(s.to_string()))
    }
}
