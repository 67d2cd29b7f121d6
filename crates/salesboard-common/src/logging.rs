//! Structured logging infrastructure for salesboard

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, SalesError};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "salesboard_engine=trace")
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_targets: true,
        }
    }
}

/// Builds the event filter. `RUST_LOG` takes precedence over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Log output goes to stderr so report JSON on stdout stays clean. When a
/// file path is configured the returned guard must be held until shutdown,
/// otherwise buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    if let Some(file_path) = &config.file_path {
        let path = Path::new(file_path);
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| SalesError::config(format!("Invalid log file path: {file_path}")))?;
        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(config.include_targets)
            .with_writer(writer);
        if config.json_format {
            registry
                .with(layer.json())
                .try_init()
                .map_err(|e| SalesError::config(format!("Logging already initialised: {e}")))?;
        } else {
            registry
                .with(layer)
                .try_init()
                .map_err(|e| SalesError::config(format!("Logging already initialised: {e}")))?;
        }
        return Ok(Some(guard));
    }

    let layer = fmt::layer()
        .with_target(config.include_targets)
        .with_writer(std::io::stderr);
    let installed = if config.json_format {
        registry.with(layer.json()).try_init()
    } else if config.pretty_format {
        registry.with(layer.pretty()).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };
    installed.map_err(|e| SalesError::config(format!("Logging already initialised: {e}")))?;

    Ok(None)
}
