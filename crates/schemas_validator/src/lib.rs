//! # Schemas Validator
//!
//! Schema registry and validation engine. This crate provides:
//!
//! - The schema registry, which composes general schemas with domain
//!   overrides into the effective schema for a data type
//! - The utility library and helper catalog used by derived checks
//! - The validation engine, which checks payloads against resolved schemas
//!   under a configuration
//! - A reporter rendering results as text or JSON
//! - Built-in schemas for manifest data
//!
//! ## Example
//!
//! ```rust
//! use schemas_core::{Configuration, Payload, Value};
//! use schemas_validator::{register_builtins, Reporter, ReportFormat, SchemaRegistry, ValidationEngine};
//! use std::sync::Arc;
//!
//! let mut registry = SchemaRegistry::new();
//! register_builtins(&mut registry).unwrap();
//! let engine = ValidationEngine::new(Arc::new(registry));
//!
//! let mut payload = Payload::new();
//! payload.insert("ErrorCode".to_string(), Value::Int(2101));
//!
//! let result = engine
//!     .validate("bungie_response", &payload, &Configuration::default())
//!     .unwrap();
//!
//! assert!(!result.passed());
//! println!("{}", Reporter::format(&result, ReportFormat::Text));
//! ```

pub mod utils;

mod builtin;
mod engine;
mod error;
mod helpers;
mod registry;
mod reporter;
mod rules;

pub use builtin::*;
pub use engine::*;
pub use error::*;
pub use helpers::*;
pub use registry::*;
pub use reporter::*;
pub use rules::*;
