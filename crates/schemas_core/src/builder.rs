//! Builder pattern for creating schemas.
//!
//! This module provides fluent builders for constructing schemas and their
//! field rules in code, mainly for built-in rule sets and tests.

use crate::{Constraint, FieldRule, FieldType, Schema, ValidationRule};

/// Builder for creating a `Schema`.
///
/// # Example
///
/// ```rust
/// use schemas_core::{FieldBuilder, FieldType, SchemaBuilder, MF_DOMAIN};
///
/// let schema = SchemaBuilder::new("mf_account")
///     .domain(MF_DOMAIN)
///     .extends("account")
///     .description("Manifest account rules")
///     .field(FieldBuilder::new("riskTier", FieldType::String).build())
///     .build();
///
/// assert!(schema.is_override());
/// assert_eq!(schema.base_type(), Some("account"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    data_type: String,
    domain: Option<String>,
    extends: Option<String>,
    description: Option<String>,
    fields: Vec<FieldRule>,
}

impl SchemaBuilder {
    /// Creates a builder for a general schema.
    ///
    /// # Arguments
    ///
    /// * `data_type` - Data type identifier
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    /// Sets the rule-set domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the base data type.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field rule.
    pub fn field(mut self, field: FieldRule) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several field rules.
    pub fn fields(mut self, fields: Vec<FieldRule>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema {
            data_type: self.data_type,
            domain: self.domain,
            extends: self.extends,
            description: self.description,
            fields: self.fields,
        }
    }
}

/// Builder for creating a `FieldRule`.
///
/// # Example
///
/// ```rust
/// use schemas_core::{Constraint, FieldBuilder, FieldType};
///
/// let field = FieldBuilder::new("balance", FieldType::Number)
///     .required(true)
///     .rule_with_message(Constraint::min(0.0), "{field} must not be negative")
///     .build();
///
/// assert_eq!(field.rules.len(), 1);
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    required: bool,
    description: Option<String>,
    rules: Vec<ValidationRule>,
}

impl FieldBuilder {
    /// Creates a new optional field builder.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: None,
            rules: Vec::new(),
        }
    }

    /// Sets whether the field must be present.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a rule with the default failure message.
    pub fn rule(mut self, constraint: Constraint) -> Self {
        self.rules.push(ValidationRule::new(constraint));
        self
    }

    /// Adds a rule with a custom failure message template.
    pub fn rule_with_message(mut self, constraint: Constraint, message: impl Into<String>) -> Self {
        self.rules
            .push(ValidationRule::with_message(constraint, message));
        self
    }

    /// Builds the field rule.
    pub fn build(self) -> FieldRule {
        FieldRule {
            name: self.name,
            field_type: self.field_type,
            required: self.required,
            description: self.description,
            rules: self.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GENERAL_DOMAIN, RuleCategory};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_builder_minimal() {
        let schema = SchemaBuilder::new("account").build();

        assert_eq!(schema.data_type, "account");
        assert_eq!(schema.domain_name(), GENERAL_DOMAIN);
        assert!(schema.extends.is_none());
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn test_schema_builder_preserves_field_order() {
        let schema = SchemaBuilder::new("account")
            .field(FieldBuilder::new("id", FieldType::String).build())
            .fields(vec![
                FieldBuilder::new("balance", FieldType::Number).build(),
                FieldBuilder::new("riskTier", FieldType::String).build(),
            ])
            .build();

        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "balance", "riskTier"]);
    }

    #[test]
    fn test_field_builder_minimal() {
        let field = FieldBuilder::new("id", FieldType::String).build();

        assert_eq!(field.name, "id");
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.required);
        assert!(field.rules.is_empty());
    }

    #[test]
    fn test_field_builder_rules() {
        let field = FieldBuilder::new("riskTier", FieldType::String)
            .required(true)
            .description("Risk classification")
            .rule(Constraint::allowed_values(["low", "high"]))
            .rule_with_message(Constraint::length(Some(3), None), "too short")
            .build();

        assert!(field.required);
        assert_eq!(field.rules.len(), 2);
        assert_eq!(field.rules[0].category(), RuleCategory::AllowedValues);
        assert_eq!(field.rules[1].message.as_deref(), Some("too short"));
    }
}
