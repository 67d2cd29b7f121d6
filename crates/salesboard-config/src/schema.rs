//! Configuration schema definitions using serde.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for salesboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub store: StoreConfig,
    /// Report defaults.
    pub reports: ReportsConfig,
    /// Logging configuration.
    pub logging: LogConfig,
}

/// Record store and pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot to serve reports from. Empty store when unset.
    pub dataset_path: Option<PathBuf>,
    /// Maximum number of concurrently checked-out store handles.
    pub pool_size: usize,
    /// How long a request waits for a free handle, in milliseconds.
    pub acquire_timeout_ms: u64,
}

/// Defaults applied when a report request omits a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Start of the reporting window when `startDate` is absent.
    pub default_start_date: NaiveDate,
    /// Bucket granularity used when `interval` is absent or invalid.
    pub default_interval: String,
    /// Row limit of the user-performance report when `limit` is absent.
    pub user_report_limit: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter directive.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Write logs to this file instead of stderr.
    pub file: Option<String>,
}
