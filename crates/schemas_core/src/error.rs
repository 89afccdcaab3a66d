//! Error types for schema registration, resolution and helper computation.
//!
//! Rule failures are not errors: they are reported as diagnostics inside a
//! `ValidationResult`. The types here cover schema problems, which are
//! surfaced at registration or resolution, and faults raised by helper
//! predicates.

use std::fmt;
use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Result type for helper computations.
pub type ComputationResult<T> = std::result::Result<T, ComputationError>;

/// Errors raised by the schema registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A schema with the same data type and domain is already registered
    #[error("Schema '{data_type}' is already registered for domain '{domain}'")]
    DuplicateSchema {
        /// Data type identifier
        data_type: String,
        /// Rule-set domain
        domain: String,
    },

    /// No schema is registered for the data type
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// A schema declares the same field twice
    #[error("Schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Data type identifier
        schema: String,
        /// Field name
        field: String,
    },

    /// An override makes a field optional that its base requires
    #[error("Schema '{schema}' makes field '{field}' optional, but '{parent}' requires it")]
    RequiredFieldRelaxed {
        /// Overriding data type
        schema: String,
        /// Field name
        field: String,
        /// Base data type
        parent: String,
    },

    /// Following `extends` links leads back to the starting schema
    #[error("Cyclic schema extension involving '{0}'")]
    CyclicExtension(String),

    /// A pattern rule does not compile
    #[error("Invalid pattern for field '{field}' in schema '{schema}': {error}")]
    InvalidPattern {
        /// Data type identifier
        schema: String,
        /// Field name
        field: String,
        /// Regex compiler message
        error: String,
    },
}

impl SchemaError {
    /// Creates a duplicate schema error.
    pub fn duplicate_schema(data_type: impl Into<String>, domain: impl Into<String>) -> Self {
        Self::DuplicateSchema {
            data_type: data_type.into(),
            domain: domain.into(),
        }
    }

    /// Creates an unknown schema error.
    pub fn unknown_schema(data_type: impl Into<String>) -> Self {
        Self::UnknownSchema(data_type.into())
    }
}

/// How a helper computation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationErrorKind {
    /// The value (or a related payload value) is not something the helper
    /// can work with; reported as a rule failure
    InvalidInput,
    /// The helper itself is broken or misconfigured; aborts validation
    Defect,
}

impl fmt::Display for ComputationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationErrorKind::InvalidInput => f.write_str("invalid input"),
            ComputationErrorKind::Defect => f.write_str("defect"),
        }
    }
}

/// Error raised by a helper predicate.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Helper '{helper}' failed ({kind}): {message}")]
pub struct ComputationError {
    /// Failure kind
    pub kind: ComputationErrorKind,
    /// Helper name
    pub helper: String,
    /// Description of the failure
    pub message: String,
}

impl ComputationError {
    /// The input cannot be processed by the helper.
    pub fn invalid_input(helper: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ComputationErrorKind::InvalidInput,
            helper: helper.into(),
            message: message.into(),
        }
    }

    /// The helper is broken or misconfigured.
    pub fn defect(helper: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ComputationErrorKind::Defect,
            helper: helper.into(),
            message: message.into(),
        }
    }

    /// Whether this error should abort validation.
    pub fn is_defect(&self) -> bool {
        self.kind == ComputationErrorKind::Defect
    }
}
