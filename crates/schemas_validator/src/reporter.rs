//! Rendering of validation results.
//!
//! Diagnostics are always listed in schema declaration order, which is the
//! order `ValidationResult` keeps them in.

use schemas_core::{FieldStatus, ValidationResult};
use serde_json::json;
use std::str::FromStr;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Summary counters shared by every text rendering, in display order.
pub fn summary_lines(result: &ValidationResult) -> [(&'static str, usize); 5] {
    let stats = result.stats();
    let skipped_fields = result
        .outcomes()
        .iter()
        .filter(|o| o.status == FieldStatus::Skipped)
        .count();
    [
        ("Fields checked:", stats.fields_checked),
        ("Fields skipped:", skipped_fields),
        ("Rules evaluated:", stats.rules_evaluated),
        ("Rules skipped:", stats.rules_skipped),
        ("Rules failed:", stats.rules_failed),
    ]
}

/// Formats validation results for humans or machines.
pub struct Reporter;

impl Reporter {
    /// Renders a result in the requested format.
    pub fn format(result: &ValidationResult, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => Self::text(result),
            ReportFormat::Json => Self::json(result),
        }
    }

    fn text(result: &ValidationResult) -> String {
        let verdict = if result.passed() { "PASSED" } else { "FAILED" };
        let mut out = format!("Validation of '{}': {}\n", result.data_type(), verdict);

        if !result.diagnostics().is_empty() {
            out.push_str("\nDiagnostics:\n");
            for (i, diagnostic) in result.diagnostics().iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, diagnostic));
            }
        }

        if !result.warnings().is_empty() {
            out.push_str("\nWarnings:\n");
            for (i, warning) in result.warnings().iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, warning));
            }
        }

        out.push_str("\nFields:\n");
        for outcome in result.outcomes() {
            out.push_str(&format!(
                "  {:<24} {:<12} ({})\n",
                outcome.field, outcome.status, outcome.origin
            ));
        }

        out.push_str("\nSummary:\n");
        for (label, count) in summary_lines(result) {
            out.push_str(&format!("  {:<17}{}\n", label, count));
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn json(result: &ValidationResult) -> String {
        let output = json!({
            "data_type": result.data_type(),
            "passed": result.passed(),
            "diagnostics": result.diagnostics(),
            "warnings": result.warnings(),
            "fields": result.outcomes(),
            "summary": result.stats(),
        });

        // Only plain maps, strings and numbers end up in the value.
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    }
}
