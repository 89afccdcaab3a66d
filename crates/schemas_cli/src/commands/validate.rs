use anyhow::{Context, Result, anyhow};
use schemas_parser::{ConfigProvider, FileConfigProvider, StaticConfigProvider, parse_payload_file};
use schemas_validator::{ReportFormat, ValidationEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::load_registry;
use crate::output;

pub struct ValidateArgs<'a> {
    pub data_type: &'a str,
    pub payload: &'a Path,
    pub schemas: &'a [PathBuf],
    pub config: Option<&'a Path>,
    pub builtins: bool,
    pub strict: bool,
    pub format: &'a str,
}

pub fn execute(args: ValidateArgs<'_>) -> Result<()> {
    let format: ReportFormat = args.format.parse().map_err(|e: String| anyhow!(e))?;

    info!("Validating {} as '{}'", args.payload.display(), args.data_type);

    let provider: Box<dyn ConfigProvider> = match args.config {
        Some(path) => Box::new(FileConfigProvider::new(path)),
        None => Box::new(StaticConfigProvider::default()),
    };
    let mut config = provider
        .load_config()
        .context("Failed to load configuration")?;
    if args.strict {
        config = config.with_strict(true);
    }
    info!("Strict mode: {}", config.strict);

    let registry = load_registry(args.schemas, args.builtins)?;
    if !registry.contains(args.data_type) {
        output::print_info(&format!(
            "Known data types: {}",
            registry.data_types().join(", ")
        ));
    }

    let payload = parse_payload_file(args.payload)
        .with_context(|| format!("Failed to parse payload file: {}", args.payload.display()))?;

    let engine = ValidationEngine::new(Arc::new(registry));
    let result = engine
        .validate(args.data_type, &payload, &config)
        .with_context(|| format!("Validation of '{}' could not run", args.data_type))?;

    output::print_validation_result(&result, format);

    if !result.passed() {
        std::process::exit(1);
    }

    Ok(())
}
