use crate::trace::{DerivationTrace, TraceStep};

/// Formats derivation traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a derivation trace, one numbered line per stage.
    pub fn format_trace(trace: &DerivationTrace) -> String {
        let mut result = format!("drilldown '{}'", trace.report_type);
        for (index, step) in trace.steps.iter().enumerate() {
            result.push('\n');
            result.push_str(&format!("  {}. {}", index + 1, Self::format_step(step)));
        }
        result
    }

    /// Format a single step: its name, the across it produced, and its key changes.
    fn format_step(step: &TraceStep) -> String {
        let mut result = step.stage.clone();
        if !step.across.is_empty() {
            result.push_str(&format!(" [across: {}]", step.across));
        }

        if let Some(reason) = &step.skipped {
            result.push_str(&format!(" skipped ({})", reason));
            return result;
        }

        let changes: Vec<String> = [("+", &step.added), ("-", &step.removed), ("~", &step.changed)]
            .iter()
            .flat_map(|(marker, keys)| keys.iter().map(move |key| format!("{}{}", marker, key)))
            .collect();
        if changes.is_empty() {
            result.push_str(" (no change)");
        } else {
            result.push(' ');
            result.push_str(&changes.join(" "));
        }
        result
    }
}
