//! Tests for the post-processor pipeline: failure policy, contract checks, idempotence.
mod common;
use common::*;
use drilldown::postprocess::{DEFAULT_POST_PROCESSOR_IDS, create_post_processor_by_id};
use drilldown::prelude::*;
use serde_json::{Value, json};

/// Always fails.
struct Failing;

impl PostProcessor for Failing {
    fn id(&self) -> &str {
        "test.failing"
    }

    fn process(&self, _stage: Stage, _ctx: &ProcessContext<'_>) -> std::result::Result<Stage, DerivationError> {
        Err(DerivationError::ProcessorFailed {
            processor: self.id().to_string(),
            reason: "boom".to_string(),
        })
    }
}

/// Removes `projects` without declaring it.
struct DropsProjects;

impl PostProcessor for DropsProjects {
    fn id(&self) -> &str {
        "test.drops_projects"
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> std::result::Result<Stage, DerivationError> {
        stage.filters.remove("projects");
        Ok(stage)
    }
}

/// Writes a value nested deeper than the backend accepts.
struct TooDeep;

impl PostProcessor for TooDeep {
    fn id(&self) -> &str {
        "test.too_deep"
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> std::result::Result<Stage, DerivationError> {
        stage
            .filters
            .insert("labels".to_string(), json!({"a": {"b": {"c": {"d": ["x"]}}}}));
        Ok(stage)
    }
}

fn engine_with(processor: Box<dyn PostProcessor>, strict: bool) -> DrilldownEngine {
    let overrides = format!(
        r#"{{"tickets_report": {{"post_processors": ["{}", "jira.unresolved"]}}}}"#,
        processor.id()
    );
    let registry = ReportTypeRegistry::builder()
        .with_overrides_json(&overrides)
        .expect("Failed to apply overrides")
        .build();
    DrilldownEngine::builder()
        .with_registry(registry)
        .with_clock(FixedClock(NOW))
        .with_post_processor(processor)
        .strict_post_processors(strict)
        .build()
        .expect("Failed to build engine")
}

fn tickets_inputs() -> (WidgetQuery, ClickEvent) {
    (
        query("resolution", json!({"projects": ["PROP"]})),
        ClickEvent::scalar("UNRESOLVED"),
    )
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_failing_processor_skipped_when_lenient() {
        let engine = engine_with(Box::new(Failing), false);
        let (query, click) = tickets_inputs();

        let (payload, trace) = engine
            .derive_traced("tickets_report", &query, Some(&click), &DashboardContext::default())
            .expect("Lenient engine should not fail");

        assert_eq!(payload.filter["projects"], json!(["PROP"]));
        // Later processors still run.
        assert_eq!(payload.filter["missing_fields"], json!({"resolution": true}));
        let skipped: Vec<_> = trace.skipped_steps().map(|s| s.stage.clone()).collect();
        assert_eq!(skipped, vec!["test.failing".to_string()]);

        let formatted = TraceFormatter::format_trace(&trace);
        assert!(formatted.contains("test.failing [across: resolution] skipped (Post-processor 'test.failing' failed: boom)"));
        println!("{}", formatted);
    }

    #[test]
    fn test_failing_processor_aborts_when_strict() {
        let engine = engine_with(Box::new(Failing), true);
        let (query, click) = tickets_inputs();

        let result = engine.derive("tickets_report", &query, Some(&click), &DashboardContext::default());
        assert!(matches!(
            result,
            Err(DerivationError::ProcessorFailed { ref processor, .. }) if processor == "test.failing"
        ));
    }

    #[test]
    fn test_undeclared_removal_is_a_contract_violation() {
        let (query, click) = tickets_inputs();

        let lenient = engine_with(Box::new(DropsProjects), false)
            .derive("tickets_report", &query, Some(&click), &DashboardContext::default())
            .expect("Lenient engine should revert the stage");
        assert_eq!(lenient.filter["projects"], json!(["PROP"]));

        let strict = engine_with(Box::new(DropsProjects), true).derive(
            "tickets_report",
            &query,
            Some(&click),
            &DashboardContext::default(),
        );
        assert!(matches!(strict, Err(DerivationError::ContractViolation { .. })));
    }

    #[test]
    fn test_out_of_shape_value_is_a_contract_violation() {
        let (query, click) = tickets_inputs();
        let strict = engine_with(Box::new(TooDeep), true).derive(
            "tickets_report",
            &query,
            Some(&click),
            &DashboardContext::default(),
        );
        assert!(matches!(strict, Err(DerivationError::ContractViolation { .. })));

        let lenient = engine_with(Box::new(TooDeep), false)
            .derive("tickets_report", &query, Some(&click), &DashboardContext::default())
            .expect("Lenient engine should revert the stage");
        assert!(!lenient.filter.contains_key("labels"));
    }

    #[test]
    fn test_descriptor_naming_unknown_processor_fails_build() {
        let registry = ReportTypeRegistry::builder()
            .with_overrides_json(r#"{"tickets_report": {"post_processors": ["nope.missing"]}}"#)
            .expect("Failed to apply overrides")
            .build();
        let result = DrilldownEngine::builder().with_registry(registry).build();
        assert!(matches!(
            result,
            Err(RegistryError::UnknownPostProcessor { ref processor, .. }) if processor == "nope.missing"
        ));
    }

    #[test]
    fn test_builtin_ids_create_matching_processors() {
        for id in DEFAULT_POST_PROCESSOR_IDS {
            let processor = create_post_processor_by_id(id).expect("built-in id should resolve");
            assert_eq!(processor.id(), *id);
        }
        assert!(create_post_processor_by_id("unknown.id").is_none());
    }

    /// Every built-in processor tolerates already-processed input.
    #[test]
    fn test_builtin_processors_are_idempotent() {
        let samples: Vec<(&str, &str, Option<ClickEvent>, Value)> = vec![
            (
                "tickets_report",
                "issue_created",
                Some(ClickEvent::bucket("02/10", "1612915200")),
                json!({"resolutions": ["UNRESOLVED", "Fixed"], "issue_created_at": {"$gt": "1612000000", "$lt": "1612950000"}}),
            ),
            (
                "hygiene_report_trends",
                "trend",
                Some(ClickEvent::bucket("02/10", "1612915200")),
                json!({"idle_seconds": {"$gt": 172800}, "start_time": {"$gt": "1", "$lt": "2"}}),
            ),
            (
                "azure_tickets_report",
                "code_area",
                Some(ClickEvent::scalar("Area")),
                json!({
                    "code_area": [{"child": "Area"}],
                    "teams": ["Core"],
                    "sprint": ["Proj\\Sprint 2"],
                    "azure_iteration": [{"parent": "Proj", "child": "Sprint 1"}],
                    "parent_workitem_ids": ["42"],
                    "workitem_parent_workitem_types": ["Epic"],
                    "partial_match": {"azure_iteration": {"$begins": "Proj"}},
                    "exclude": {"azure_iteration": [{"parent": "Proj", "child": "Sprint 0"}]}
                }),
            ),
            (
                "cicd_pipeline_jobs_duration_report",
                "job_status",
                Some(ClickEvent::scalar("SUCCESS")),
                json!({"duration_ms": {"$gt": "60000"}, "integration_ids": ["1", "2"]}),
            ),
            (
                "cicd_scm_jobs_count_report",
                "job_end",
                Some(ClickEvent::bucket("04/01", "1617235200")),
                json!({"end_time": {"$gt": "1617062400", "$lt": "1617663252"}}),
            ),
            (
                "effort_investment_trend_report",
                "trend",
                Some(ClickEvent::bucket("Feb", "1612137600")),
                json!({"effort_investment_profile": "profile-1", "dataKeyClicked": "Feature", "completed_statuses": ["Closed"]}),
            ),
            (
                "jira_effort_investment_engineer_report",
                "assignee",
                Some(ClickEvent::scalar("jane")),
                json!({"assignees": ["jane"]}),
            ),
            (
                "sprint_metrics_trend",
                "week",
                Some(ClickEvent::bucket("wk 6", "1612742400")),
                json!({"metric": "creep_done", "sprint_names": ["S1"]}),
            ),
            (
                "azure_sprint_metrics_trend",
                "sprint",
                Some(ClickEvent::scalar("Sprint 9")),
                json!({"workitem_sprint_full_names": ["P\\Sprint 9"]}),
            ),
            (
                "github_prs_report",
                "pr_merged",
                Some(ClickEvent::scalar("1612915200")),
                json!({"repo_ids": ["r1"]}),
            ),
            (
                "jira_zendesk_report",
                "ticket_created",
                Some(ClickEvent::bucket("02/10", "1612915200")),
                json!({}),
            ),
            (
                "coverity_issues_trend_report",
                "first_detected",
                Some(ClickEvent::scalar("1612915200")),
                json!({}),
            ),
            (
                "pagerduty_incident_report_trends",
                "incident_created_at",
                Some(ClickEvent::bucket("02/10", "1612915200")),
                json!({}),
            ),
            (
                "testrails_tests_trend_report",
                "trend",
                Some(ClickEvent::bucket("02/10", "1612915200")),
                json!({"metric": "test_case_count"}),
            ),
        ];

        let registry = ReportTypeRegistry::builtin();
        let dashboard = DashboardContext::default()
            .with_metadata(filters(json!({"jira_or_query": {"labels": ["urgent"]}})));

        for (report_type, across, click, sample) in samples {
            let descriptor = registry.lookup(report_type);
            assert!(!descriptor.post_processors.is_empty(), "{} has no processors", report_type);
            let widget = WidgetQuery::new(filters(sample.clone())).with_across(across);
            let ctx = ProcessContext {
                report_type,
                descriptor,
                registry: &registry,
                click: click.as_ref(),
                query: &widget,
                dashboard: &dashboard,
                interval: None,
                now: NOW,
                week_start: chrono::Weekday::Sun,
            };

            for id in &descriptor.post_processors {
                let processor = create_post_processor_by_id(id).expect("built-in id should resolve");
                let stage = Stage {
                    across: across.to_string(),
                    filters: filters(sample.clone()),
                };
                let once = processor.process(stage, &ctx).expect("first pass should succeed");
                let twice = processor
                    .process(once.clone(), &ctx)
                    .expect("second pass should succeed");
                assert_eq!(once, twice, "{} is not idempotent for {}", id, report_type);
            }
        }
    }
}
