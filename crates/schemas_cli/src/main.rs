mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sve")]
#[command(version, about = "Schema Validation Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a registered data type
    Validate {
        /// Data type to validate the payload as
        data_type: String,

        /// Path to the payload file (JSON, YAML or TOML)
        payload: PathBuf,

        /// Schema file to register (repeatable)
        #[arg(short = 'S', long = "schema")]
        schemas: Vec<PathBuf>,

        /// Configuration file (YAML, TOML or JSON)
        #[arg(short, long, env = "SVE_CONFIG")]
        config: Option<PathBuf>,

        /// Register the built-in manifest schemas
        #[arg(short, long)]
        builtins: bool,

        /// Treat undeclared payload fields as failures
        #[arg(short, long)]
        strict: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check schema definitions without validating data
    Check {
        /// Schema files (YAML, TOML or JSON)
        schemas: Vec<PathBuf>,

        /// Register the built-in manifest schemas as well
        #[arg(short, long)]
        builtins: bool,
    },

    /// Write the default configuration
    Init {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            data_type,
            payload,
            schemas,
            config,
            builtins,
            strict,
            format,
        } => commands::validate::execute(commands::validate::ValidateArgs {
            data_type: &data_type,
            payload: &payload,
            schemas: &schemas,
            config: config.as_deref(),
            builtins,
            strict,
            format: &format,
        }),

        Commands::Check { schemas, builtins } => commands::check::execute(&schemas, builtins),

        Commands::Init { output } => commands::init::execute(output.as_deref()),
    }
}
