use anyhow::{Context, Result};
use schemas_core::Configuration;
use schemas_parser::render_config_toml;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(output_path: Option<&Path>) -> Result<()> {
    let rendered = render_config_toml(&Configuration::default())
        .context("Failed to render the default configuration")?;

    match output_path {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write configuration: {}", path.display()))?;
            info!("Wrote default configuration to {}", path.display());
            output::print_success(&format!("Configuration written to {}", path.display()));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
