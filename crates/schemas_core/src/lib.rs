//! # Schemas Core
//!
//! Core data structures for the schema validation engine.
//!
//! This crate provides the vocabulary shared by the parser, the validator and
//! the CLI: schemas and their field rules, payload values, configuration, and
//! the structured result of a validation call.
//!
//! ## Key Concepts
//!
//! - **Schema**: Declarative description of a data type, either general or a
//!   domain override layered over a general schema
//! - **Field rule**: Expected type, presence and constraints of one field
//! - **Configuration**: Which domains and rule categories are active
//! - **Validation result**: Per-field outcomes plus the derived diagnostics
//!
//! ## Example
//!
//! ```rust
//! use schemas_core::{Constraint, FieldBuilder, FieldType, SchemaBuilder, MF_DOMAIN};
//!
//! let general = SchemaBuilder::new("account")
//!     .field(FieldBuilder::new("id", FieldType::String).required(true).build())
//!     .build();
//!
//! let mf = SchemaBuilder::new("mf_account")
//!     .domain(MF_DOMAIN)
//!     .extends("account")
//!     .field(
//!         FieldBuilder::new("riskTier", FieldType::String)
//!             .rule(Constraint::allowed_values(["low", "high"]))
//!             .build(),
//!     )
//!     .build();
//!
//! assert!(!general.is_override());
//! assert_eq!(mf.base_type(), Some("account"));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod result;
pub mod schema;
pub mod value;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use result::*;
pub use schema::*;
pub use value::*;
