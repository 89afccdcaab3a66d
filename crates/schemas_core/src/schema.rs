//! Schema definition types.
//!
//! This module contains the declarative description of a data type: its
//! fields, the semantic type of each field, and the rules a field value must
//! satisfy. Schemas are plain data; the registry in `schemas_validator` owns
//! them and composes general schemas with domain overrides.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the general (non domain-specific) rule set.
pub const GENERAL_DOMAIN: &str = "general";

/// Name of the manifest domain rule set.
pub const MF_DOMAIN: &str = "mf";

/// A schema for one data type.
///
/// A schema without a `domain` (or with the `general` domain) is a general
/// schema. A schema with any other domain is an override layer which is merged
/// over the general schema it extends when the data type is resolved.
///
/// # Example
///
/// ```rust
/// use schemas_core::{Constraint, FieldBuilder, FieldType, SchemaBuilder};
///
/// let account = SchemaBuilder::new("account")
///     .field(FieldBuilder::new("id", FieldType::String).required(true).build())
///     .field(
///         FieldBuilder::new("balance", FieldType::Number)
///             .required(true)
///             .rule(Constraint::min(0.0))
///             .build(),
///     )
///     .build();
///
/// assert!(!account.is_override());
/// assert_eq!(account.fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Data type identifier shared between payload producers and schema authors
    pub data_type: String,

    /// Rule-set domain; `None` means general
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Data type of the general schema this schema extends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Field rules in declaration order
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl Schema {
    /// Returns the domain this schema belongs to.
    pub fn domain_name(&self) -> &str {
        self.domain.as_deref().unwrap_or(GENERAL_DOMAIN)
    }

    /// Returns true if this schema is a domain override rather than a general schema.
    pub fn is_override(&self) -> bool {
        self.domain_name() != GENERAL_DOMAIN
    }

    /// Data type of the general schema this one builds on.
    ///
    /// An override without an explicit `extends` builds on the general schema
    /// registered under its own data type, if any.
    pub fn base_type(&self) -> Option<&str> {
        match (&self.extends, self.is_override()) {
            (Some(parent), _) => Some(parent.as_str()),
            (None, true) => Some(self.data_type.as_str()),
            (None, false) => None,
        }
    }

    /// Looks up a field rule by name.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Semantic type expected for a field value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text
    #[serde(alias = "str", alias = "text")]
    String,
    /// Whole number
    #[serde(alias = "int", alias = "int64", alias = "long")]
    Integer,
    /// Any numeric value; integers are accepted
    #[serde(alias = "float", alias = "float64", alias = "double")]
    Number,
    /// true / false
    #[serde(alias = "bool")]
    Boolean,
    /// RFC 3339 string, date, or unix epoch
    #[serde(alias = "datetime")]
    Timestamp,
    /// Nested key/value object
    #[serde(alias = "object")]
    Map,
    /// Ordered sequence
    #[serde(alias = "array")]
    List,
    /// No type check
    #[default]
    Any,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Map => "map",
            FieldType::List => "list",
            FieldType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A single field definition in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field name
    pub name: String,

    /// Expected semantic type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rules evaluated against the value, all of which must hold
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
}

/// A constraint plus the message template reported when it fails.
///
/// Message templates may reference `{field}` and `{value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// The predicate to evaluate
    #[serde(flatten)]
    pub constraint: Constraint,

    /// Failure message template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    /// Creates a rule with the default failure message.
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            message: None,
        }
    }

    /// Creates a rule with a custom failure message template.
    pub fn with_message(constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            constraint,
            message: Some(message.into()),
        }
    }

    /// Identifier used in diagnostics.
    pub fn name(&self) -> String {
        self.constraint.name()
    }

    /// Category used by configuration gates.
    pub fn category(&self) -> RuleCategory {
        self.constraint.category()
    }
}

impl From<Constraint> for ValidationRule {
    fn from(constraint: Constraint) -> Self {
        Self::new(constraint)
    }
}

/// Validation constraints that can be applied to a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be one of the listed values
    #[serde(alias = "enum")]
    AllowedValues {
        /// Valid values
        values: Vec<String>,
        /// Compare after trimming and lower-casing
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Numeric value must be within the bounds (inclusive)
    Range {
        /// Minimum value
        #[serde(default)]
        min: Option<f64>,
        /// Maximum value
        #[serde(default)]
        max: Option<f64>,
    },

    /// Text value must fully match the regular expression
    Pattern {
        /// Regular expression
        regex: String,
    },

    /// Length of a string, list or map must be within the bounds (inclusive)
    Length {
        /// Minimum length
        #[serde(default)]
        min: Option<usize>,
        /// Maximum length
        #[serde(default)]
        max: Option<usize>,
    },

    /// Named predicate from the helper catalog
    Helper {
        /// Helper name, e.g. `mf.md5_checksum`
        name: String,
        /// Helper arguments
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        args: BTreeMap<String, Value>,
    },
}

impl Constraint {
    /// Allowed-values constraint with exact comparison.
    pub fn allowed_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::AllowedValues {
            values: values.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Inclusive numeric range.
    pub fn range(min: f64, max: f64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Lower bound only.
    pub fn min(min: f64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: None,
        }
    }

    /// Upper bound only.
    pub fn max(max: f64) -> Self {
        Constraint::Range {
            min: None,
            max: Some(max),
        }
    }

    /// Full-match regular expression.
    pub fn pattern(regex: impl Into<String>) -> Self {
        Constraint::Pattern {
            regex: regex.into(),
        }
    }

    /// Inclusive length bounds.
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Constraint::Length { min, max }
    }

    /// Helper predicate without arguments.
    pub fn helper(name: impl Into<String>) -> Self {
        Constraint::Helper {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    /// Helper predicate with arguments.
    pub fn helper_with_args<I, K>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Constraint::Helper {
            name: name.into(),
            args: args.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Identifier used in diagnostics.
    pub fn name(&self) -> String {
        match self {
            Constraint::AllowedValues { .. } => "allowed_values".to_string(),
            Constraint::Range { .. } => "range".to_string(),
            Constraint::Pattern { .. } => "pattern".to_string(),
            Constraint::Length { .. } => "length".to_string(),
            Constraint::Helper { name, .. } => format!("helper:{}", name),
        }
    }

    /// Category used by configuration gates.
    pub fn category(&self) -> RuleCategory {
        match self {
            Constraint::AllowedValues { .. } => RuleCategory::AllowedValues,
            Constraint::Range { .. } => RuleCategory::Range,
            Constraint::Pattern { .. } => RuleCategory::Pattern,
            Constraint::Length { .. } => RuleCategory::Length,
            Constraint::Helper { .. } => RuleCategory::Derived,
        }
    }
}

/// Category of a check, used to enable or disable checks per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Required field presence
    Presence,
    /// Semantic type conformance
    Type,
    /// Allowed values / enum membership
    #[serde(alias = "enum")]
    AllowedValues,
    /// Numeric bounds
    Range,
    /// Regular expression match
    Pattern,
    /// Length bounds
    Length,
    /// Helper predicates, including cross-field derivations
    Derived,
}

impl RuleCategory {
    /// Snake-case name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Presence => "presence",
            RuleCategory::Type => "type",
            RuleCategory::AllowedValues => "allowed_values",
            RuleCategory::Range => "range",
            RuleCategory::Pattern => "pattern",
            RuleCategory::Length => "length",
            RuleCategory::Derived => "derived",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_domain_defaults_to_general() {
        let schema = Schema {
            data_type: "account".to_string(),
            domain: None,
            extends: None,
            description: None,
            fields: vec![],
        };
        assert_eq!(schema.domain_name(), GENERAL_DOMAIN);
        assert!(!schema.is_override());
        assert_eq!(schema.base_type(), None);
    }

    #[test]
    fn test_override_base_type() {
        let same_type = Schema {
            data_type: "account".to_string(),
            domain: Some(MF_DOMAIN.to_string()),
            extends: None,
            description: None,
            fields: vec![],
        };
        assert!(same_type.is_override());
        assert_eq!(same_type.base_type(), Some("account"));

        let extending = Schema {
            data_type: "mf_account".to_string(),
            extends: Some("account".to_string()),
            ..same_type
        };
        assert_eq!(extending.base_type(), Some("account"));
    }

    #[test]
    fn test_explicit_general_domain_is_not_override() {
        let schema = Schema {
            data_type: "account".to_string(),
            domain: Some("general".to_string()),
            extends: None,
            description: None,
            fields: vec![],
        };
        assert!(!schema.is_override());
    }

    #[test]
    fn test_constraint_names_and_categories() {
        assert_eq!(
            Constraint::allowed_values(["a"]).category(),
            RuleCategory::AllowedValues
        );
        assert_eq!(Constraint::range(0.0, 1.0).name(), "range");
        assert_eq!(
            Constraint::helper("mf.md5_checksum").name(),
            "helper:mf.md5_checksum"
        );
        assert_eq!(
            Constraint::helper("general.url").category(),
            RuleCategory::Derived
        );
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Integer.to_string(), "integer");
        assert_eq!(FieldType::default(), FieldType::Any);
    }

    #[test]
    fn test_rule_deserializes_from_json() {
        let rule: ValidationRule = serde_json::from_str(
            r#"{"type": "enum", "values": ["low", "high"], "message": "bad tier {value}"}"#,
        )
        .unwrap();
        assert_eq!(rule.category(), RuleCategory::AllowedValues);
        assert_eq!(rule.message.as_deref(), Some("bad tier {value}"));
    }
}
