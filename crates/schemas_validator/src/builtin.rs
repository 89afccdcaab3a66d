//! Built-in manifest schemas.
//!
//! These describe the data the manifest tooling exchanges: Bungie API
//! response envelopes, the location of the latest remote manifest, and the
//! manifest installed on disk.

use crate::registry::SchemaRegistry;
use crate::utils::mf::LC_CHECKSUM_PATTERN;
use schemas_core::{
    Constraint, FieldBuilder, FieldType, MF_DOMAIN, Schema, SchemaBuilder, SchemaError, Value,
};

/// Data type of a Bungie API response envelope.
pub const BUNGIE_RESPONSE: &str = "bungie_response";

/// Data type of an installed manifest.
pub const INSTALLED_MANIFEST: &str = "installed_manifest";

/// Data type of an installed manifest checked with manifest-domain rules.
pub const MF_INSTALLED_MANIFEST: &str = "mf_installed_manifest";

/// Data type of a remote manifest location.
pub const MANIFEST_LOCATION: &str = "manifest_location";

/// All built-in schemas, general layers first.
pub fn builtin_schemas() -> Vec<Schema> {
    vec![
        bungie_response(),
        mf_bungie_response(),
        installed_manifest(),
        mf_installed_manifest(),
        manifest_location(),
    ]
}

/// Registers every built-in schema.
pub fn register_builtins(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register_all(builtin_schemas())
}

fn bungie_response() -> Schema {
    SchemaBuilder::new(BUNGIE_RESPONSE)
        .description("Envelope returned by every Bungie API endpoint")
        .field(FieldBuilder::new("ErrorCode", FieldType::Integer).required(true).build())
        .field(
            FieldBuilder::new("ThrottleSeconds", FieldType::Integer)
                .required(true)
                .rule(Constraint::min(0.0))
                .build(),
        )
        .field(FieldBuilder::new("ErrorStatus", FieldType::String).required(true).build())
        .field(FieldBuilder::new("Message", FieldType::String).required(true).build())
        .field(FieldBuilder::new("MessageData", FieldType::Map).required(true).build())
        .field(FieldBuilder::new("Response", FieldType::Any).build())
        .build()
}

fn mf_bungie_response() -> Schema {
    SchemaBuilder::new(BUNGIE_RESPONSE)
        .domain(MF_DOMAIN)
        .description("Manifest requests only accept successful responses")
        .field(
            FieldBuilder::new("ErrorCode", FieldType::Integer)
                .required(true)
                .rule_with_message(
                    Constraint::helper("mf.bungie_success"),
                    "Bungie API returned error code {value}",
                )
                .build(),
        )
        .build()
}

fn installed_manifest() -> Schema {
    SchemaBuilder::new(INSTALLED_MANIFEST)
        .description("Manifest file found in the manifest directory")
        .field(
            FieldBuilder::new("fileName", FieldType::String)
                .required(true)
                .rule(Constraint::helper("general.non_empty"))
                .build(),
        )
        .field(
            FieldBuilder::new("checksum", FieldType::String)
                .rule_with_message(
                    Constraint::pattern(LC_CHECKSUM_PATTERN),
                    "{field} must be a lower-case MD5 checksum, got '{value}'",
                )
                .build(),
        )
        .field(FieldBuilder::new("installedAt", FieldType::Timestamp).build())
        .build()
}

fn mf_installed_manifest() -> Schema {
    SchemaBuilder::new(MF_INSTALLED_MANIFEST)
        .domain(MF_DOMAIN)
        .extends(INSTALLED_MANIFEST)
        .description("Installed manifest whose name embeds its checksum")
        .field(
            FieldBuilder::new("fileName", FieldType::String)
                .required(true)
                .rule_with_message(
                    Constraint::helper("mf.manifest_file_name"),
                    "'{value}' is not a manifest file name",
                )
                .build(),
        )
        .field(
            FieldBuilder::new("checksum", FieldType::String)
                .required(true)
                .rule(Constraint::helper("mf.md5_checksum"))
                .rule_with_message(
                    Constraint::helper_with_args(
                        "mf.checksum_matches",
                        [("name_field", Value::from("fileName"))],
                    ),
                    "checksum {value} does not match the one in the file name",
                )
                .build(),
        )
        .build()
}

fn manifest_location() -> Schema {
    SchemaBuilder::new(MANIFEST_LOCATION)
        .domain(MF_DOMAIN)
        .description("Location of the latest manifest for the desired language")
        .field(
            FieldBuilder::new("remotePath", FieldType::String)
                .required(true)
                .rule(Constraint::helper("mf.remote_manifest_path"))
                .build(),
        )
        .field(
            FieldBuilder::new("url", FieldType::String)
                .rule(Constraint::helper("general.url"))
                .build(),
        )
        .field(
            FieldBuilder::new("language", FieldType::String)
                .required(true)
                .rule_with_message(
                    Constraint::helper_with_args(
                        "mf.language_available",
                        [("languages_field", Value::from("availableLanguages"))],
                    ),
                    "manifest language '{value}' is currently unavailable",
                )
                .build(),
        )
        .field(
            FieldBuilder::new("availableLanguages", FieldType::Map)
                .required(true)
                .rule(Constraint::length(Some(1), None))
                .build(),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_builtins() {
        let mut registry = SchemaRegistry::new();
        register_builtins(&mut registry).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.data_types(),
            vec![
                BUNGIE_RESPONSE,
                INSTALLED_MANIFEST,
                MANIFEST_LOCATION,
                MF_INSTALLED_MANIFEST
            ]
        );
        assert!(registry.check_all().is_empty());
    }

    #[test]
    fn test_bungie_response_override_keeps_base_order() {
        let mut registry = SchemaRegistry::new();
        register_builtins(&mut registry).unwrap();

        let resolved = registry.resolve(BUNGIE_RESPONSE).unwrap();
        assert_eq!(resolved.fields[0].rule.name, "ErrorCode");
        assert_eq!(resolved.fields[0].origin, MF_DOMAIN);
        assert_eq!(resolved.fields.len(), 6);
    }

    #[test]
    fn test_mf_installed_manifest_extends_general() {
        let mut registry = SchemaRegistry::new();
        register_builtins(&mut registry).unwrap();

        let resolved = registry.resolve(MF_INSTALLED_MANIFEST).unwrap();
        assert_eq!(resolved.field_names(), vec!["fileName", "checksum", "installedAt"]);
        assert!(resolved.field("checksum").unwrap().rule.required);
    }
}
