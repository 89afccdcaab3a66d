//! Error types for validation operations.
//!
//! Rule failures are reported inside the `ValidationResult`; an
//! [`EngineError`] means the validation call itself could not complete.

use schemas_core::{ComputationError, SchemaError};
use thiserror::Error;

/// Errors that abort a validation call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The schema for the data type could not be resolved
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A helper predicate is missing or broken
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),
}

impl EngineError {
    /// Whether the error stems from the schema definitions.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}
