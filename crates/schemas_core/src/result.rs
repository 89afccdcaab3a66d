//! Validation result types.
//!
//! A [`ValidationResult`] is produced once per validation call. Its summary
//! fields (`passed`, diagnostics, statistics) are derived from the per-field
//! outcomes at construction time and cannot drift from them afterwards.

use crate::RuleCategory;
use serde::Serialize;
use std::fmt;

/// Outcome of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// Every enabled check held
    Passed,
    /// At least one enabled check failed
    Failed,
    /// Required field absent from the payload
    Missing,
    /// Every check was disabled by configuration
    Skipped,
    /// Optional field absent; nothing evaluated
    NotProvided,
}

impl FieldStatus {
    /// Whether this status makes the overall result fail.
    pub fn is_failure(&self) -> bool {
        matches!(self, FieldStatus::Failed | FieldStatus::Missing)
    }

    /// Lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Passed => "passed",
            FieldStatus::Failed => "failed",
            FieldStatus::Missing => "missing",
            FieldStatus::Skipped => "skipped",
            FieldStatus::NotProvided => "not_provided",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of one check on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// Check held
    Passed,
    /// Check failed
    Failed,
    /// Check disabled by configuration, not evaluated
    Skipped,
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    /// Rule identifier (e.g. `required`, `type`, `range`, `helper:mf.md5_checksum`)
    pub rule: String,
    /// Rule category
    pub category: RuleCategory,
    /// Result of the check
    pub status: RuleStatus,
    /// Failure message, present only for failed checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleOutcome {
    /// A check that held.
    pub fn passed(rule: impl Into<String>, category: RuleCategory) -> Self {
        Self {
            rule: rule.into(),
            category,
            status: RuleStatus::Passed,
            message: None,
        }
    }

    /// A check that failed.
    pub fn failed(
        rule: impl Into<String>,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            category,
            status: RuleStatus::Failed,
            message: Some(message.into()),
        }
    }

    /// A check disabled by configuration.
    pub fn skipped(rule: impl Into<String>, category: RuleCategory) -> Self {
        Self {
            rule: rule.into(),
            category,
            status: RuleStatus::Skipped,
            message: None,
        }
    }
}

/// Outcome of one schema field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOutcome {
    /// Declaration position of the field in the resolved schema
    pub position: usize,
    /// Field name
    pub field: String,
    /// Domain the effective field rule came from
    pub origin: String,
    /// Aggregated status
    pub status: FieldStatus,
    /// Individual checks in evaluation order
    pub rules: Vec<RuleOutcome>,
}

/// A failed check, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Declaration position of the field
    pub position: usize,
    /// Field name
    pub field: String,
    /// Rule identifier
    pub rule: String,
    /// Rule category
    pub category: RuleCategory,
    /// Failure message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.rule, self.message)
    }
}

/// Statistics about a validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of field outcomes
    pub fields_checked: usize,
    /// Checks that were evaluated
    pub rules_evaluated: usize,
    /// Checks disabled by configuration
    pub rules_skipped: usize,
    /// Checks that failed
    pub rules_failed: usize,
}

/// Structured outcome of checking a payload against a resolved schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    data_type: String,
    passed: bool,
    outcomes: Vec<FieldOutcome>,
    diagnostics: Vec<Diagnostic>,
    warnings: Vec<String>,
    stats: ValidationStats,
}

impl ValidationResult {
    /// Builds a result from per-field outcomes.
    ///
    /// Outcomes are ordered by declaration position; diagnostics, the overall
    /// verdict and statistics are derived from them.
    pub fn new(
        data_type: impl Into<String>,
        mut outcomes: Vec<FieldOutcome>,
        mut warnings: Vec<String>,
    ) -> Self {
        outcomes.sort_by_key(|o| o.position);
        warnings.sort();

        let mut diagnostics = Vec::new();
        let mut stats = ValidationStats {
            fields_checked: outcomes.len(),
            ..Default::default()
        };

        for outcome in &outcomes {
            for rule in &outcome.rules {
                match rule.status {
                    RuleStatus::Passed => stats.rules_evaluated += 1,
                    RuleStatus::Skipped => stats.rules_skipped += 1,
                    RuleStatus::Failed => {
                        stats.rules_evaluated += 1;
                        stats.rules_failed += 1;
                        diagnostics.push(Diagnostic {
                            position: outcome.position,
                            field: outcome.field.clone(),
                            rule: rule.rule.clone(),
                            category: rule.category,
                            message: rule.message.clone().unwrap_or_default(),
                        });
                    }
                }
            }
        }

        let passed = !outcomes.iter().any(|o| o.status.is_failure());

        Self {
            data_type: data_type.into(),
            passed,
            outcomes,
            diagnostics,
            warnings,
            stats,
        }
    }

    /// Data type the payload was validated as.
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Whether no enabled check failed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Per-field outcomes in declaration order.
    pub fn outcomes(&self) -> &[FieldOutcome] {
        &self.outcomes
    }

    /// Failed checks in declaration order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Non-fatal observations, sorted.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Validation statistics.
    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    /// Looks up the outcome of a field by name.
    pub fn outcome(&self, field: &str) -> Option<&FieldOutcome> {
        self.outcomes.iter().find(|o| o.field == field)
    }

    /// Status of a field, if the schema declares it.
    pub fn status(&self, field: &str) -> Option<FieldStatus> {
        self.outcome(field).map(|o| o.status)
    }
}
