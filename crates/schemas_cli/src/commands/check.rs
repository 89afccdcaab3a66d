use anyhow::{Result, bail};
use std::path::PathBuf;
use tracing::info;

use super::load_registry;
use crate::output;

pub fn execute(schemas: &[PathBuf], builtins: bool) -> Result<()> {
    if schemas.is_empty() && !builtins {
        bail!("No schema files given (pass files or --builtins)");
    }

    info!("Checking {} schema file(s)", schemas.len());
    let registry = load_registry(schemas, builtins)?;

    output::print_info(&format!(
        "Registered {} schema(s) for {} data type(s)",
        registry.len(),
        registry.data_types().len()
    ));

    let errors = registry.check_all();

    println!("\nData Types:");
    for data_type in registry.data_types() {
        match registry.resolve(data_type) {
            Ok(resolved) => println!(
                "  {:<24} {} field(s) [{}]",
                data_type,
                resolved.fields.len(),
                resolved.domain
            ),
            Err(_) => println!("  {:<24} unresolvable", data_type),
        }
    }

    if errors.is_empty() {
        output::print_success("All schemas resolve");
        return Ok(());
    }

    println!();
    for error in &errors {
        output::print_error(&error.to_string());
    }
    bail!("{} schema definition error(s)", errors.len())
}
