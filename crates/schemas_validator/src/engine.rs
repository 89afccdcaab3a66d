//! Main validation engine.
//!
//! This module provides the `ValidationEngine` that resolves the effective
//! schema for a data type and checks a payload against it, field by field,
//! honouring the configuration gates.

use crate::helpers::HelperCatalog;
use crate::registry::{ResolvedField, ResolvedSchema, SchemaRegistry};
use crate::rules::{RuleContext, check_rule, check_type};
use crate::EngineError;
use schemas_core::{
    Configuration, Constraint, FieldOutcome, FieldStatus, FieldType, Payload, RuleCategory,
    RuleOutcome, RuleStatus, ValidationResult,
};
use std::sync::Arc;
use tracing::{debug, warn};

const REQUIRED_RULE: &str = "required";
const TYPE_RULE: &str = "type";
const UNKNOWN_FIELD_RULE: &str = "unknown_field";

/// Validation engine.
///
/// The engine holds no per-call state: `validate` takes `&self` and can be
/// called concurrently from many threads.
///
/// # Example
///
/// ```rust
/// use schemas_core::{Configuration, Constraint, FieldBuilder, FieldType, Payload, SchemaBuilder, Value};
/// use schemas_validator::{SchemaRegistry, ValidationEngine};
/// use std::sync::Arc;
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(
///         SchemaBuilder::new("account")
///             .field(
///                 FieldBuilder::new("balance", FieldType::Number)
///                     .required(true)
///                     .rule(Constraint::min(0.0))
///                     .build(),
///             )
///             .build(),
///     )
///     .unwrap();
///
/// let engine = ValidationEngine::new(Arc::new(registry));
/// let mut payload = Payload::new();
/// payload.insert("balance".to_string(), Value::Int(-5));
///
/// let result = engine
///     .validate("account", &payload, &Configuration::default())
///     .unwrap();
///
/// assert!(!result.passed());
/// for diagnostic in result.diagnostics() {
///     println!("{}", diagnostic);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<SchemaRegistry>,
    helpers: HelperCatalog,
}

impl ValidationEngine {
    /// Creates an engine with the built-in helpers.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_helpers(registry, HelperCatalog::with_builtins())
    }

    /// Creates an engine with a custom helper catalog.
    pub fn with_helpers(registry: Arc<SchemaRegistry>, helpers: HelperCatalog) -> Self {
        Self { registry, helpers }
    }

    /// The schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The helper catalog.
    pub fn helpers(&self) -> &HelperCatalog {
        &self.helpers
    }

    /// Validates a payload as the given data type.
    ///
    /// # Errors
    ///
    /// * `EngineError::Schema` if the data type cannot be resolved
    /// * `EngineError::Computation` if a helper is missing or broken
    ///
    /// Rule failures are not errors; they are reported in the result.
    pub fn validate(
        &self,
        data_type: &str,
        payload: &Payload,
        config: &Configuration,
    ) -> Result<ValidationResult, EngineError> {
        let schema = self.registry.resolve(data_type)?;
        debug!(
            "Validating '{}' against {} fields (domain: {})",
            data_type,
            schema.fields.len(),
            schema.domain
        );

        let mut outcomes = Vec::with_capacity(schema.fields.len());
        for (position, field) in schema.fields.iter().enumerate() {
            outcomes.push(self.validate_field(position, field, payload, config)?);
        }

        let mut warnings = Vec::new();
        let unknown = unknown_fields(&schema, payload);
        let presence_enabled = config.is_category_enabled(&schema.domain, RuleCategory::Presence);
        for (offset, name) in unknown.into_iter().enumerate() {
            if config.strict {
                let (status, rule) = if presence_enabled {
                    (
                        FieldStatus::Failed,
                        RuleOutcome::failed(
                            UNKNOWN_FIELD_RULE,
                            RuleCategory::Presence,
                            "field is not declared by the schema",
                        ),
                    )
                } else {
                    (
                        FieldStatus::Skipped,
                        RuleOutcome::skipped(UNKNOWN_FIELD_RULE, RuleCategory::Presence),
                    )
                };
                outcomes.push(FieldOutcome {
                    position: schema.fields.len() + offset,
                    field: name.to_string(),
                    origin: schema.domain.clone(),
                    status,
                    rules: vec![rule],
                });
            } else {
                warnings.push(format!(
                    "Field '{}' is not declared by schema '{}'",
                    name, data_type
                ));
            }
        }

        let result = ValidationResult::new(data_type, outcomes, warnings);
        if !result.passed() {
            warn!(
                "Validation of '{}' failed with {} diagnostic(s)",
                data_type,
                result.diagnostics().len()
            );
        }
        Ok(result)
    }

    fn validate_field(
        &self,
        position: usize,
        field: &ResolvedField,
        payload: &Payload,
        config: &Configuration,
    ) -> Result<FieldOutcome, EngineError> {
        // A disabled override falls back to the layer it replaced.
        let field = field.effective(|domain| config.is_domain_enabled(domain));
        let rule = &field.rule;
        let domain = field.origin.as_str();
        let value = payload.get(&rule.name).filter(|v| !v.is_null());

        let outcome = |status, rules| FieldOutcome {
            position,
            field: rule.name.clone(),
            origin: field.origin.clone(),
            status,
            rules,
        };

        if !config.is_domain_enabled(domain) {
            debug!("Skipping field '{}': domain '{}' disabled", rule.name, domain);
            return Ok(outcome(FieldStatus::Skipped, all_skipped(field)));
        }

        let Some(value) = value else {
            if !rule.required {
                return Ok(outcome(FieldStatus::NotProvided, Vec::new()));
            }
            if !config.is_category_enabled(domain, RuleCategory::Presence) {
                return Ok(outcome(
                    FieldStatus::Skipped,
                    vec![RuleOutcome::skipped(REQUIRED_RULE, RuleCategory::Presence)],
                ));
            }
            return Ok(outcome(
                FieldStatus::Missing,
                vec![RuleOutcome::failed(
                    REQUIRED_RULE,
                    RuleCategory::Presence,
                    "required field is missing",
                )],
            ));
        };

        let mut rules = Vec::with_capacity(rule.rules.len() + 1);

        if rule.field_type != FieldType::Any {
            if !config.is_category_enabled(domain, RuleCategory::Type) {
                rules.push(RuleOutcome::skipped(TYPE_RULE, RuleCategory::Type));
            } else if let Some(message) = check_type(rule.field_type, value) {
                rules.push(RuleOutcome::failed(TYPE_RULE, RuleCategory::Type, message));
                return Ok(outcome(FieldStatus::Failed, rules));
            } else {
                rules.push(RuleOutcome::passed(TYPE_RULE, RuleCategory::Type));
            }
        }

        let ctx = RuleContext {
            field: &rule.name,
            value,
            payload,
        };
        for check in &rule.rules {
            let name = check.name();
            let category = check.category();

            let gated = !config.is_category_enabled(domain, category)
                || matches!(&check.constraint, Constraint::Helper { name: helper, .. }
                    if !config.is_helper_enabled(domain, helper));
            if gated {
                rules.push(RuleOutcome::skipped(name, category));
                continue;
            }

            match check_rule(check, &ctx, &self.registry, &self.helpers)? {
                None => rules.push(RuleOutcome::passed(name, category)),
                Some(message) => rules.push(RuleOutcome::failed(name, category, message)),
            }
        }

        Ok(outcome(field_status(&rules), rules))
    }
}

/// Aggregates rule outcomes into a field status.
fn field_status(rules: &[RuleOutcome]) -> FieldStatus {
    if rules.iter().any(|r| r.status == RuleStatus::Failed) {
        FieldStatus::Failed
    } else if !rules.is_empty() && rules.iter().all(|r| r.status == RuleStatus::Skipped) {
        FieldStatus::Skipped
    } else {
        FieldStatus::Passed
    }
}

/// Every check of a field, recorded as skipped.
fn all_skipped(field: &ResolvedField) -> Vec<RuleOutcome> {
    let rule = &field.rule;
    let mut rules = Vec::new();
    if rule.required {
        rules.push(RuleOutcome::skipped(REQUIRED_RULE, RuleCategory::Presence));
    }
    if rule.field_type != FieldType::Any {
        rules.push(RuleOutcome::skipped(TYPE_RULE, RuleCategory::Type));
    }
    rules.extend(
        rule.rules
            .iter()
            .map(|check| RuleOutcome::skipped(check.name(), check.category())),
    );
    rules
}

/// Payload keys the schema does not declare, in name order.
fn unknown_fields<'a>(schema: &ResolvedSchema, payload: &'a Payload) -> Vec<&'a str> {
    payload
        .keys()
        .filter(|key| schema.field(key).is_none())
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemas_core::{FieldBuilder, MF_DOMAIN, SchemaBuilder, Value};

    fn engine() -> ValidationEngine {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("account")
                    .field(FieldBuilder::new("id", FieldType::String).required(true).build())
                    .field(
                        FieldBuilder::new("balance", FieldType::Number)
                            .rule(Constraint::min(0.0))
                            .rule(Constraint::max(1000.0))
                            .build(),
                    )
                    .field(
                        FieldBuilder::new("email", FieldType::String)
                            .rule(Constraint::helper("general.lowercase"))
                            .build(),
                    )
                    .build(),
            )
            .unwrap();
        ValidationEngine::new(Arc::new(registry))
    }

    fn payload(entries: &[(&str, Value)]) -> Payload {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_valid_payload() {
        let result = engine()
            .validate(
                "account",
                &payload(&[("id", Value::from("A1")), ("balance", Value::Int(10))]),
                &Configuration::default(),
            )
            .unwrap();

        assert!(result.passed());
        assert_eq!(result.status("id"), Some(FieldStatus::Passed));
        assert_eq!(result.status("email"), Some(FieldStatus::NotProvided));
        assert_eq!(result.stats().fields_checked, 3);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let result = engine()
            .validate(
                "account",
                &payload(&[("id", Value::Null), ("balance", Value::Null)]),
                &Configuration::default(),
            )
            .unwrap();

        assert_eq!(result.status("id"), Some(FieldStatus::Missing));
        assert_eq!(result.status("balance"), Some(FieldStatus::NotProvided));
        assert_eq!(result.diagnostics()[0].rule, REQUIRED_RULE);
    }

    #[test]
    fn test_type_failure_stops_rules() {
        let result = engine()
            .validate(
                "account",
                &payload(&[("id", Value::from("A1")), ("balance", Value::from("lots"))]),
                &Configuration::default(),
            )
            .unwrap();

        let balance = result.outcome("balance").unwrap();
        assert_eq!(balance.status, FieldStatus::Failed);
        assert_eq!(balance.rules.len(), 1);
        assert_eq!(balance.rules[0].rule, TYPE_RULE);
    }

    #[test]
    fn test_disabled_category_is_skipped_not_passed() {
        let config = Configuration::default().with_disabled_category("general", RuleCategory::Range);
        let result = engine()
            .validate(
                "account",
                &payload(&[("id", Value::from("A1")), ("balance", Value::Int(-5))]),
                &config,
            )
            .unwrap();

        assert!(result.passed());
        let balance = result.outcome("balance").unwrap();
        assert_eq!(balance.status, FieldStatus::Passed);
        assert!(balance.rules[1..].iter().all(|r| r.status == RuleStatus::Skipped));
        assert_eq!(result.stats().rules_skipped, 2);
    }

    #[test]
    fn test_disabled_helper() {
        let config = Configuration::default().with_disabled_helper("general", "general.lowercase");
        let result = engine()
            .validate(
                "account",
                &payload(&[("id", Value::from("A1")), ("email", Value::from("A@B.C"))]),
                &config,
            )
            .unwrap();
        assert!(result.passed());
        assert_eq!(result.outcome("email").unwrap().rules[1].status, RuleStatus::Skipped);
    }

    #[test]
    fn test_disabled_domain_skips_every_check() {
        let config = Configuration::default().with_domain_disabled("general");
        let result = engine()
            .validate("account", &Payload::new(), &config)
            .unwrap();

        assert!(result.passed());
        assert!(result.outcomes().iter().all(|o| o.status == FieldStatus::Skipped));
        assert_eq!(result.stats().rules_evaluated, 0);
    }

    #[test]
    fn test_unknown_fields_warn_or_fail() {
        let data = payload(&[("id", Value::from("A1")), ("zeta", Value::Int(1)), ("alpha", Value::Int(2))]);

        let lenient = engine().validate("account", &data, &Configuration::default()).unwrap();
        assert!(lenient.passed());
        assert_eq!(lenient.warnings().len(), 2);
        assert!(lenient.warnings()[0].contains("alpha"));

        let strict = engine()
            .validate("account", &data, &Configuration::default().with_strict(true))
            .unwrap();
        assert!(!strict.passed());
        let fields: Vec<&str> = strict.diagnostics().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["alpha", "zeta"]);
        assert_eq!(strict.diagnostics()[0].position, 3);
    }

    #[test]
    fn test_strict_unknown_fields_respect_presence_gate() {
        let data = payload(&[("id", Value::from("A1")), ("extra", Value::Int(1))]);

        let no_presence = Configuration::default()
            .with_strict(true)
            .with_disabled_category("general", RuleCategory::Presence);
        let result = engine().validate("account", &data, &no_presence).unwrap();
        assert!(result.passed());
        assert!(result.diagnostics().is_empty());
        let extra = result.outcome("extra").unwrap();
        assert_eq!(extra.status, FieldStatus::Skipped);
        assert_eq!(extra.rules[0].rule, UNKNOWN_FIELD_RULE);
        assert_eq!(extra.rules[0].status, RuleStatus::Skipped);

        let no_domain = Configuration::default()
            .with_strict(true)
            .with_domain_disabled("general");
        let result = engine().validate("account", &data, &no_domain).unwrap();
        assert!(result.passed());
        assert_eq!(result.status("extra"), Some(FieldStatus::Skipped));
    }

    #[test]
    fn test_disabled_override_falls_back_to_base_field() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("account")
                    .field(
                        FieldBuilder::new("balance", FieldType::Number)
                            .required(true)
                            .rule(Constraint::min(0.0))
                            .build(),
                    )
                    .build(),
            )
            .unwrap();
        registry
            .register(
                SchemaBuilder::new("account")
                    .domain(MF_DOMAIN)
                    .field(
                        FieldBuilder::new("balance", FieldType::Number)
                            .required(true)
                            .rule(Constraint::min(100.0))
                            .build(),
                    )
                    .build(),
            )
            .unwrap();
        let engine = ValidationEngine::new(Arc::new(registry));
        let config = Configuration::default().with_domain_disabled(MF_DOMAIN);

        let missing = engine.validate("account", &Payload::new(), &config).unwrap();
        assert!(!missing.passed());
        let balance = missing.outcome("balance").unwrap();
        assert_eq!(balance.status, FieldStatus::Missing);
        assert_eq!(balance.origin, "general");

        let low = engine
            .validate("account", &payload(&[("balance", Value::Int(50))]), &config)
            .unwrap();
        assert!(low.passed());

        let negative = engine
            .validate("account", &payload(&[("balance", Value::Int(-1))]), &config)
            .unwrap();
        assert_eq!(
            negative.diagnostics()[0].message,
            "value -1 is below the minimum of 0"
        );
    }

    #[test]
    fn test_unknown_data_type() {
        let err = engine()
            .validate("ledger", &Payload::new(), &Configuration::default())
            .unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_missing_helper_aborts() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("account")
                    .domain(MF_DOMAIN)
                    .field(
                        FieldBuilder::new("id", FieldType::String)
                            .rule(Constraint::helper("mf.not_there"))
                            .build(),
                    )
                    .build(),
            )
            .unwrap();
        let engine = ValidationEngine::with_helpers(Arc::new(registry), HelperCatalog::new());

        let err = engine
            .validate("account", &payload(&[("id", Value::from("A1"))]), &Configuration::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Computation(_)));
    }
}
