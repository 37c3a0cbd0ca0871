use crate::filters::string_of;
use crate::model::{ClickEvent, WidgetQuery};
use crate::registry::ReportDescriptor;

/// Resolves the dimension the drilldown filters on.
///
/// A registry `across` override beats the widget's own grouping. Reports that take their
/// dimension from the click ignore the widget entirely and yield an empty dimension when
/// the click carries none.
pub fn resolve_across(
    descriptor: &ReportDescriptor,
    query: &WidgetQuery,
    click: Option<&ClickEvent>,
) -> String {
    if descriptor.flags.across_from_click {
        return click
            .and_then(ClickEvent::as_structured)
            .and_then(|fields| string_of(fields, "across"))
            .unwrap_or_default();
    }
    descriptor
        .across_override()
        .map(str::to_string)
        .or_else(|| query.across.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ReportType;
    use serde_json::json;

    #[test]
    fn test_registry_override_wins() {
        let descriptor = ReportDescriptor::new(ReportType::GithubPrsSingleStat).forced_across("pr_created");
        let query = WidgetQuery::default().with_across("repo_id");
        assert_eq!(resolve_across(&descriptor, &query, None), "pr_created");
    }

    #[test]
    fn test_across_from_click() {
        let descriptor = ReportDescriptor::new(ReportType::SprintDistributionRetrospectiveReport)
            .with_flags(|f| f.across_from_click = true);
        let query = WidgetQuery::default().with_across("sprint");
        let click = ClickEvent::from_value(&json!({"across": "sprint_report", "sprint_report": ["S1"]}));

        assert_eq!(resolve_across(&descriptor, &query, click.as_ref()), "sprint_report");
        assert_eq!(resolve_across(&descriptor, &query, None), "");
    }
}
