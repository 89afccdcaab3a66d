//! Parser for schema, configuration and payload documents (YAML/TOML/JSON).
//!
//! This crate turns documents on disk into the strongly-typed values of
//! `schemas_core`: schema definitions, the validation [`Configuration`], and
//! payloads to validate.
//!
//! A schema document holds either a single schema or a `schemas` list.
//!
//! # Example
//!
//! ```rust
//! use schemas_parser::parse_schemas_yaml;
//!
//! let yaml = r#"
//! schemas:
//!   - data_type: account
//!     fields:
//!       - name: id
//!         type: string
//!         required: true
//!   - data_type: mf_account
//!     domain: mf
//!     extends: account
//!     fields:
//!       - name: riskTier
//!         type: string
//!         rules:
//!           - type: enum
//!             values: [low, high]
//! "#;
//!
//! let schemas = parse_schemas_yaml(yaml).expect("Failed to parse schemas");
//! assert_eq!(schemas.len(), 2);
//! assert_eq!(schemas[1].base_type(), Some("account"));
//! ```

pub mod provider;

pub use provider::{ConfigProvider, FileConfigProvider, StaticConfigProvider};

use schemas_core::{Configuration, Payload, Schema};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while parsing documents.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing, deserialization or serialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A payload document is not a key/value mapping
    #[error("Payload must be a mapping of field names to values")]
    PayloadNotMapping,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// A document holding several schemas.
#[derive(Debug, Deserialize)]
struct SchemaList {
    #[serde(default)]
    schemas: Vec<Schema>,
}

const SCHEMAS_KEY: &str = "schemas";

/// Parse schemas from a YAML string.
///
/// The document is either one schema or a mapping with a `schemas` list.
pub fn parse_schemas_yaml(content: &str) -> Result<Vec<Schema>> {
    let document: serde_yaml_ng::Value = serde_yaml_ng::from_str(content)?;
    if document.get(SCHEMAS_KEY).is_some() {
        let list: SchemaList = serde_yaml_ng::from_value(document)?;
        Ok(list.schemas)
    } else {
        let schema: Schema = serde_yaml_ng::from_value(document)?;
        Ok(vec![schema])
    }
}

/// Parse schemas from a TOML string.
///
/// ```rust
/// use schemas_parser::parse_schemas_toml;
///
/// let toml = r#"
/// data_type = "account"
///
/// [[fields]]
/// name = "balance"
/// type = "number"
/// required = true
/// rules = [{ type = "range", min = 0 }]
/// "#;
///
/// let schemas = parse_schemas_toml(toml).unwrap();
/// assert_eq!(schemas[0].fields[0].name, "balance");
/// ```
pub fn parse_schemas_toml(content: &str) -> Result<Vec<Schema>> {
    let table: toml::Table = content.parse().map_err(toml_error)?;
    if table.contains_key(SCHEMAS_KEY) {
        let list: SchemaList = toml::Value::Table(table).try_into().map_err(toml_error)?;
        Ok(list.schemas)
    } else {
        let schema: Schema = toml::Value::Table(table).try_into().map_err(toml_error)?;
        Ok(vec![schema])
    }
}

/// Parse schemas from a JSON string.
pub fn parse_schemas_json(content: &str) -> Result<Vec<Schema>> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    if document.get(SCHEMAS_KEY).is_some() {
        let list: SchemaList = serde_json::from_value(document)?;
        Ok(list.schemas)
    } else {
        let schema: Schema = serde_json::from_value(document)?;
        Ok(vec![schema])
    }
}

/// Parse a validation configuration from a YAML string.
pub fn parse_config_yaml(content: &str) -> Result<Configuration> {
    Ok(serde_yaml_ng::from_str(content)?)
}

/// Parse a validation configuration from a TOML string.
///
/// Omitted settings take their default values.
///
/// ```rust
/// use schemas_parser::parse_config_toml;
/// use schemas_core::RuleCategory;
///
/// let config = parse_config_toml(r#"
/// strict = true
///
/// [domains.mf]
/// disabled_categories = ["range"]
/// "#).unwrap();
///
/// assert!(config.strict);
/// assert!(!config.is_category_enabled("mf", RuleCategory::Range));
/// ```
pub fn parse_config_toml(content: &str) -> Result<Configuration> {
    toml::from_str(content).map_err(toml_error)
}

/// Parse a validation configuration from a JSON string.
pub fn parse_config_json(content: &str) -> Result<Configuration> {
    Ok(serde_json::from_str(content)?)
}

/// Render a configuration as TOML with every setting spelled out.
pub fn render_config_toml(config: &Configuration) -> Result<String> {
    toml::to_string_pretty(config).map_err(toml_error)
}

/// Parse a payload from a JSON string.
pub fn parse_payload_json(content: &str) -> Result<Payload> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    schemas_core::Value::from(value)
        .into_payload()
        .ok_or(ParserError::PayloadNotMapping)
}

/// Parse a payload from a YAML string.
pub fn parse_payload_yaml(content: &str) -> Result<Payload> {
    let value: schemas_core::Value = serde_yaml_ng::from_str(content)?;
    value.into_payload().ok_or(ParserError::PayloadNotMapping)
}

/// Parse a payload from a TOML string.
///
/// Native TOML datetimes become strings in their TOML spelling, which the
/// `timestamp` type accepts.
pub fn parse_payload_toml(content: &str) -> Result<Payload> {
    let table: toml::Table = toml::from_str(content).map_err(toml_error)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, from_toml(value)))
        .collect())
}

fn from_toml(value: toml::Value) -> schemas_core::Value {
    use schemas_core::Value;

    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect(),
        ),
    }
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
/// * `.json` → `DocumentFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        "json" => Ok(DocumentFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse schemas from a file with automatic format detection.
///
/// ```no_run
/// use schemas_parser::parse_schemas_file;
/// use std::path::Path;
///
/// let schemas = parse_schemas_file(Path::new("schemas/account.yml")).unwrap();
/// println!("Loaded {} schemas", schemas.len());
/// ```
pub fn parse_schemas_file(path: &Path) -> Result<Vec<Schema>> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Parsing schema document {} as {:?}", path.display(), format);

    match format {
        DocumentFormat::Yaml => parse_schemas_yaml(&content),
        DocumentFormat::Toml => parse_schemas_toml(&content),
        DocumentFormat::Json => parse_schemas_json(&content),
    }
}

/// Parse a validation configuration from a file with automatic format detection.
pub fn parse_config_file(path: &Path) -> Result<Configuration> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Parsing configuration {} as {:?}", path.display(), format);

    match format {
        DocumentFormat::Yaml => parse_config_yaml(&content),
        DocumentFormat::Toml => parse_config_toml(&content),
        DocumentFormat::Json => parse_config_json(&content),
    }
}

/// Parse a payload from a file with automatic format detection.
pub fn parse_payload_file(path: &Path) -> Result<Payload> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Parsing payload {} as {:?}", path.display(), format);

    match format {
        DocumentFormat::Yaml => parse_payload_yaml(&content),
        DocumentFormat::Toml => parse_payload_toml(&content),
        DocumentFormat::Json => parse_payload_json(&content),
    }
}

fn toml_error(err: impl std::fmt::Display) -> ParserError {
    ParserError::TomlError(err.to_string())
}
