//! Schema registry.
//!
//! Holds general schemas and domain override layers, keyed by data type, and
//! composes them into the effective schema for a data type. Registration
//! needs `&mut self`; once every schema is in, the registry is frozen behind
//! an `Arc` and shared read-only.

use crate::utils::general::compile_pattern;
use regex::Regex;
use schemas_core::{Constraint, FieldRule, Schema, SchemaError};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// A field of a resolved schema together with the domain its rule came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// Effective field rule
    pub rule: FieldRule,
    /// Domain that contributed this rule
    pub origin: String,
    /// Field this one replaced in a lower layer, if any
    pub base: Option<Box<ResolvedField>>,
}

impl ResolvedField {
    /// The top-most layer of this field whose domain passes `enabled`.
    ///
    /// Falls back to the field itself when no layer does.
    pub fn effective(&self, enabled: impl Fn(&str) -> bool) -> &ResolvedField {
        let mut layer = self;
        while !enabled(&layer.origin) {
            match layer.base.as_deref() {
                Some(base) => layer = base,
                None => return self,
            }
        }
        layer
    }
}

/// The effective schema for a data type after composing overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// Data type identifier
    pub data_type: String,
    /// Domain of the top-most layer
    pub domain: String,
    /// Fields in declaration order
    pub fields: Vec<ResolvedField>,
}

impl ResolvedSchema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.rule.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.rule.name.as_str()).collect()
    }
}

/// Registry of general schemas and domain overrides.
///
/// # Example
///
/// ```rust
/// use schemas_core::{FieldBuilder, FieldType, SchemaBuilder, MF_DOMAIN};
/// use schemas_validator::SchemaRegistry;
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(
///         SchemaBuilder::new("account")
///             .field(FieldBuilder::new("id", FieldType::String).required(true).build())
///             .build(),
///     )
///     .unwrap();
/// registry
///     .register(
///         SchemaBuilder::new("mf_account")
///             .domain(MF_DOMAIN)
///             .extends("account")
///             .field(FieldBuilder::new("riskTier", FieldType::String).build())
///             .build(),
///     )
///     .unwrap();
///
/// let resolved = registry.resolve("mf_account").unwrap();
/// assert_eq!(resolved.field_names(), vec!["id", "riskTier"]);
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    general: BTreeMap<String, Schema>,
    overrides: BTreeMap<String, Schema>,
    patterns: HashMap<String, Regex>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a general schema or a domain override.
    ///
    /// # Errors
    ///
    /// * `DuplicateSchema` if the same data type is already registered for
    ///   the same layer (general, or override)
    /// * `DuplicateField` if the schema declares a field twice
    /// * `InvalidPattern` if a pattern rule does not compile
    pub fn register(&mut self, schema: Schema) -> Result<(), SchemaError> {
        let layer = if schema.is_override() {
            &self.overrides
        } else {
            &self.general
        };
        if let Some(existing) = layer.get(&schema.data_type) {
            return Err(SchemaError::duplicate_schema(
                &schema.data_type,
                existing.domain_name(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: schema.data_type.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut compiled = Vec::new();
        for field in &schema.fields {
            for rule in &field.rules {
                if let Constraint::Pattern { regex } = &rule.constraint {
                    if self.patterns.contains_key(regex) {
                        continue;
                    }
                    let re = compile_pattern(regex).map_err(|err| SchemaError::InvalidPattern {
                        schema: schema.data_type.clone(),
                        field: field.name.clone(),
                        error: err.to_string(),
                    })?;
                    compiled.push((regex.clone(), re));
                }
            }
        }
        self.patterns.extend(compiled);

        info!(
            "Registered {} schema '{}' ({} fields)",
            schema.domain_name(),
            schema.data_type,
            schema.fields.len()
        );

        let key = schema.data_type.clone();
        if schema.is_override() {
            self.overrides.insert(key, schema);
        } else {
            self.general.insert(key, schema);
        }
        Ok(())
    }

    /// Registers several schemas, stopping at the first error.
    pub fn register_all(
        &mut self,
        schemas: impl IntoIterator<Item = Schema>,
    ) -> Result<(), SchemaError> {
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(())
    }

    /// Resolves the effective schema for a data type.
    ///
    /// A domain override is merged over its general base: base fields keep
    /// their order, an override field with the same name replaces the base
    /// field in place, and new override fields are appended.
    ///
    /// # Errors
    ///
    /// * `UnknownSchema` if nothing is registered for the data type or an
    ///   `extends` target is missing
    /// * `CyclicExtension` if `extends` links form a loop
    /// * `RequiredFieldRelaxed` if an override makes a required field optional
    pub fn resolve(&self, data_type: &str) -> Result<ResolvedSchema, SchemaError> {
        let mut chain = Vec::new();
        let resolved = self.resolve_key(data_type, &mut chain)?;
        debug!(
            "Resolved '{}' from {} layer(s) into {} fields",
            data_type,
            chain.len(),
            resolved.fields.len()
        );
        Ok(resolved)
    }

    /// Whether anything is registered for the data type.
    pub fn contains(&self, data_type: &str) -> bool {
        self.general.contains_key(data_type) || self.overrides.contains_key(data_type)
    }

    /// Registered data types, sorted and deduplicated.
    pub fn data_types(&self) -> Vec<&str> {
        self.general
            .keys()
            .chain(self.overrides.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of registered schemas, counting each layer.
    pub fn len(&self) -> usize {
        self.general.len() + self.overrides.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compiled form of a pattern rule.
    pub fn pattern(&self, regex: &str) -> Option<&Regex> {
        self.patterns.get(regex)
    }

    /// Resolves every registered data type and collects the failures.
    pub fn check_all(&self) -> Vec<SchemaError> {
        self.data_types()
            .into_iter()
            .filter_map(|data_type| self.resolve(data_type).err())
            .collect()
    }

    fn resolve_key(
        &self,
        data_type: &str,
        chain: &mut Vec<String>,
    ) -> Result<ResolvedSchema, SchemaError> {
        match self.overrides.get(data_type) {
            Some(schema) => self.compose(schema, chain),
            None => self.resolve_general(data_type, chain),
        }
    }

    fn resolve_general(
        &self,
        data_type: &str,
        chain: &mut Vec<String>,
    ) -> Result<ResolvedSchema, SchemaError> {
        let schema = self
            .general
            .get(data_type)
            .ok_or_else(|| SchemaError::unknown_schema(data_type))?;
        self.compose(schema, chain)
    }

    fn compose(
        &self,
        schema: &Schema,
        chain: &mut Vec<String>,
    ) -> Result<ResolvedSchema, SchemaError> {
        let link = format!("{}/{}", schema.domain_name(), schema.data_type);
        if chain.contains(&link) {
            return Err(SchemaError::CyclicExtension(schema.data_type.clone()));
        }
        chain.push(link);

        let base = match (&schema.extends, schema.is_override()) {
            (Some(parent), _) => Some(self.resolve_key(parent, chain)?),
            (None, true) if self.general.contains_key(&schema.data_type) => {
                Some(self.resolve_general(&schema.data_type, chain)?)
            }
            _ => None,
        };

        let origin = schema.domain_name().to_string();
        let mut fields = Vec::new();
        let mut parent = None;
        if let Some(base) = base {
            fields = base.fields;
            parent = Some(base.data_type);
        }

        for rule in &schema.fields {
            match fields.iter().position(|f: &ResolvedField| f.rule.name == rule.name) {
                Some(pos) => {
                    if fields[pos].rule.required && !rule.required {
                        return Err(SchemaError::RequiredFieldRelaxed {
                            schema: schema.data_type.clone(),
                            field: rule.name.clone(),
                            parent: parent.clone().unwrap_or_default(),
                        });
                    }
                    let replaced = std::mem::replace(
                        &mut fields[pos],
                        ResolvedField {
                            rule: rule.clone(),
                            origin: origin.clone(),
                            base: None,
                        },
                    );
                    fields[pos].base = Some(Box::new(replaced));
                }
                None => fields.push(ResolvedField {
                    rule: rule.clone(),
                    origin: origin.clone(),
                    base: None,
                }),
            }
        }

        Ok(ResolvedSchema {
            data_type: schema.data_type.clone(),
            domain: origin,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemas_core::{FieldBuilder, FieldType, GENERAL_DOMAIN, MF_DOMAIN, SchemaBuilder};

    fn account() -> Schema {
        SchemaBuilder::new("account")
            .field(FieldBuilder::new("id", FieldType::String).required(true).build())
            .field(
                FieldBuilder::new("balance", FieldType::Number)
                    .required(true)
                    .rule(Constraint::min(0.0))
                    .build(),
            )
            .field(FieldBuilder::new("riskTier", FieldType::String).build())
            .build()
    }

    #[test]
    fn test_register_and_resolve_general() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();

        let resolved = registry.resolve("account").unwrap();
        assert_eq!(resolved.domain, GENERAL_DOMAIN);
        assert_eq!(resolved.field_names(), vec!["id", "balance", "riskTier"]);
        assert!(resolved.fields.iter().all(|f| f.origin == GENERAL_DOMAIN));
    }

    #[test]
    fn test_duplicate_general_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();
        let err = registry.register(account()).unwrap_err();
        assert_eq!(err, SchemaError::duplicate_schema("account", GENERAL_DOMAIN));
    }

    #[test]
    fn test_duplicate_override() {
        let mut registry = SchemaRegistry::new();
        let mf = SchemaBuilder::new("account").domain(MF_DOMAIN).build();
        registry.register(mf.clone()).unwrap();
        assert!(matches!(
            registry.register(mf),
            Err(SchemaError::DuplicateSchema { .. })
        ));
    }

    #[test]
    fn test_general_and_override_share_key() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();
        registry
            .register(
                SchemaBuilder::new("account")
                    .domain(MF_DOMAIN)
                    .field(
                        FieldBuilder::new("balance", FieldType::Number)
                            .required(true)
                            .rule(Constraint::range(10.0, 500.0))
                            .build(),
                    )
                    .field(FieldBuilder::new("region", FieldType::String).build())
                    .build(),
            )
            .unwrap();

        let resolved = registry.resolve("account").unwrap();
        assert_eq!(resolved.domain, MF_DOMAIN);
        assert_eq!(
            resolved.field_names(),
            vec!["id", "balance", "riskTier", "region"]
        );
        let balance = resolved.field("balance").unwrap();
        assert_eq!(balance.origin, MF_DOMAIN);
        assert_eq!(balance.rule.rules[0].constraint, Constraint::range(10.0, 500.0));
        assert_eq!(resolved.field("id").unwrap().origin, GENERAL_DOMAIN);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.data_types(), vec!["account"]);
    }

    #[test]
    fn test_unknown_schema() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.resolve("ledger").unwrap_err(),
            SchemaError::unknown_schema("ledger")
        );
    }

    #[test]
    fn test_missing_extends_target() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("mf_account")
                    .domain(MF_DOMAIN)
                    .extends("account")
                    .build(),
            )
            .unwrap();
        assert_eq!(
            registry.resolve("mf_account").unwrap_err(),
            SchemaError::unknown_schema("account")
        );
        assert_eq!(registry.check_all().len(), 1);
    }

    #[test]
    fn test_override_without_base() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("manifest_location")
                    .domain(MF_DOMAIN)
                    .field(FieldBuilder::new("remotePath", FieldType::String).build())
                    .build(),
            )
            .unwrap();
        let resolved = registry.resolve("manifest_location").unwrap();
        assert_eq!(resolved.field_names(), vec!["remotePath"]);
        assert_eq!(resolved.fields[0].origin, MF_DOMAIN);
    }

    #[test]
    fn test_cyclic_extension() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(SchemaBuilder::new("a").extends("b").build())
            .unwrap();
        registry
            .register(SchemaBuilder::new("b").extends("a").build())
            .unwrap();
        assert!(matches!(
            registry.resolve("a"),
            Err(SchemaError::CyclicExtension(_))
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let mut registry = SchemaRegistry::new();
        let schema = SchemaBuilder::new("account")
            .field(FieldBuilder::new("id", FieldType::String).build())
            .field(FieldBuilder::new("id", FieldType::Integer).build())
            .build();
        assert_eq!(
            registry.register(schema).unwrap_err(),
            SchemaError::DuplicateField {
                schema: "account".to_string(),
                field: "id".to_string()
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut registry = SchemaRegistry::new();
        let schema = SchemaBuilder::new("account")
            .field(
                FieldBuilder::new("id", FieldType::String)
                    .rule(Constraint::pattern("(unclosed"))
                    .build(),
            )
            .build();
        assert!(matches!(
            registry.register(schema),
            Err(SchemaError::InvalidPattern { .. })
        ));
        assert!(!registry.contains("account"));
    }

    #[test]
    fn test_patterns_compiled_on_register() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                SchemaBuilder::new("account")
                    .field(
                        FieldBuilder::new("id", FieldType::String)
                            .rule(Constraint::pattern("A[0-9]+"))
                            .build(),
                    )
                    .build(),
            )
            .unwrap();
        let re = registry.pattern("A[0-9]+").unwrap();
        assert!(re.is_match("A12"));
        assert!(!re.is_match("xA12"));
    }

    #[test]
    fn test_required_field_relaxed() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();
        registry
            .register(
                SchemaBuilder::new("mf_account")
                    .domain(MF_DOMAIN)
                    .extends("account")
                    .field(FieldBuilder::new("id", FieldType::String).build())
                    .build(),
            )
            .unwrap();
        assert_eq!(
            registry.resolve("mf_account").unwrap_err(),
            SchemaError::RequiredFieldRelaxed {
                schema: "mf_account".to_string(),
                field: "id".to_string(),
                parent: "account".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();
        registry
            .register(
                SchemaBuilder::new("mf_account")
                    .domain(MF_DOMAIN)
                    .extends("account")
                    .field(FieldBuilder::new("riskTier", FieldType::String).build())
                    .build(),
            )
            .unwrap();
        let first = registry.resolve("mf_account").unwrap();
        for _ in 0..5 {
            assert_eq!(registry.resolve("mf_account").unwrap(), first);
        }
    }
}
