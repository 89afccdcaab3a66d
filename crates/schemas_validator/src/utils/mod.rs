//! Utility library used by rules and helper predicates.
//!
//! Every function here is pure: it either returns a value or a
//! [`ComputationError`](schemas_core::ComputationError), never a partial
//! result.

pub mod general;
pub mod mf;
