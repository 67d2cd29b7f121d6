//! Default values for every configuration section.

use crate::schema::{Config, LogConfig, ReportsConfig, StoreConfig};
use chrono::NaiveDate;

/// Bucket granularities accepted in configuration.
pub const INTERVAL_NAMES: [&str; 5] = ["day", "week", "month", "quarter", "year"];

/// Reporting window start used when none is configured.
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2021, 1, 1);

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            reports: ReportsConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            pool_size: 10,
            acquire_timeout_ms: 5_000,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        Self {
            default_start_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            default_interval: "month".to_string(),
            user_report_limit: 10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}
