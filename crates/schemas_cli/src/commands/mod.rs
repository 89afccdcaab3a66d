pub mod check;
pub mod init;
pub mod validate;

use anyhow::{Context, Result};
use schemas_parser::parse_schemas_file;
use schemas_validator::{SchemaRegistry, register_builtins};
use std::path::PathBuf;
use tracing::info;

/// Builds a registry from schema files, optionally seeded with the built-ins.
pub(crate) fn load_registry(paths: &[PathBuf], builtins: bool) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    if builtins {
        register_builtins(&mut registry).context("Failed to register built-in schemas")?;
        info!("Registered {} built-in data types", registry.len());
    }

    for path in paths {
        let schemas = parse_schemas_file(path)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))?;
        let count = schemas.len();
        registry
            .register_all(schemas)
            .with_context(|| format!("Invalid schema in {}", path.display()))?;
        info!("Registered {} schema(s) from {}", count, path.display());
    }

    Ok(registry)
}
