//! Runtime validation of loaded configuration.

use crate::defaults::INTERVAL_NAMES;
use crate::schema::Config;
use salesboard_common::{Result, SalesError};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first violated constraint.
    pub fn validate(config: &Config) -> Result<()> {
        if config.store.pool_size == 0 {
            return Err(SalesError::config("store.pool_size must be at least 1"));
        }

        if config.store.acquire_timeout_ms == 0 {
            return Err(SalesError::config(
                "store.acquire_timeout_ms must be greater than zero",
            ));
        }

        if config.reports.user_report_limit == 0 {
            return Err(SalesError::config(
                "reports.user_report_limit must be at least 1",
            ));
        }

        if !INTERVAL_NAMES.contains(&config.reports.default_interval.as_str()) {
            return Err(SalesError::config(format!(
                "reports.default_interval must be one of {}, got '{}'",
                INTERVAL_NAMES.join(", "),
                config.reports.default_interval
            )));
        }

        if config.logging.level.trim().is_empty() {
            return Err(SalesError::config("logging.level cannot be empty"));
        }

        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}
