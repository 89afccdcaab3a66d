//! Configuration providers.
//!
//! Configuration is read once at process start. A provider hides where it
//! comes from, so the engine and the CLI only ever see a [`Configuration`].

use crate::{Result, parse_config_file};
use schemas_core::Configuration;
use std::path::{Path, PathBuf};
use tracing::info;

/// Source of the validation configuration.
///
/// # Example
///
/// ```rust
/// use schemas_core::Configuration;
/// use schemas_parser::{ConfigProvider, StaticConfigProvider};
///
/// let provider = StaticConfigProvider::new(Configuration::default().with_strict(true));
/// let config = provider.load_config().unwrap();
/// assert!(config.strict);
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Loads the configuration.
    fn load_config(&self) -> Result<Configuration>;
}

/// Reads the configuration from a YAML, TOML or JSON file.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    /// Creates a provider for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the configuration is read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load_config(&self) -> Result<Configuration> {
        let config = parse_config_file(&self.path)?;
        info!(
            "Loaded configuration from {} (strict: {}, domains: {})",
            self.path.display(),
            config.strict,
            config.domains.len()
        );
        Ok(config)
    }
}

/// Serves an in-memory configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: Configuration,
}

impl StaticConfigProvider {
    /// Creates a provider for the given configuration.
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn load_config(&self) -> Result<Configuration> {
        Ok(self.config.clone())
    }
}
