//! Configuration loading from TOML or YAML files plus environment overrides.

use crate::schema::Config;
use salesboard_common::{Result, SalesError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding `store.dataset_path`.
pub const ENV_DATASET: &str = "SALESBOARD_DATASET";
/// Environment variable overriding `store.pool_size`.
pub const ENV_POOL_SIZE: &str = "SALESBOARD_POOL_SIZE";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "SALESBOARD_LOG_LEVEL";

/// Configuration loader bound to one file path.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates configuration from file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as TOML.
    pub fn load(&self) -> Result<Config> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            SalesError::config_with_source(
                format!("Failed to read {}", self.path.display()),
                e,
            )
        })?;

        let config = if self.is_yaml() {
            serde_yaml::from_str::<Config>(&raw)
                .map_err(|e| SalesError::config_with_source("YAML parsing error", e))?
        } else {
            toml::from_str::<Config>(&raw)
                .map_err(|e| SalesError::config_with_source("TOML parsing error", e))?
        };

        config.validate()?;
        info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        )
    }
}

/// Applies `SALESBOARD_*` overrides read through `lookup`.
///
/// Pass `|key| std::env::var(key).ok()` for the process environment.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(ENV_DATASET) {
        debug!(dataset = %path, "Dataset path overridden from environment");
        config.store.dataset_path = Some(PathBuf::from(path));
    }

    if let Some(size) = lookup(ENV_POOL_SIZE) {
        config.store.pool_size = size.trim().parse().map_err(|_| {
            SalesError::config(format!("{ENV_POOL_SIZE} must be a positive integer, got '{size}'"))
        })?;
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    config.validate()?;
    Ok(config)
}

/// Applies overrides from the process environment.
pub fn from_env(config: Config) -> Result<Config> {
    apply_overrides(config, |key| std::env::var(key).ok())
}
