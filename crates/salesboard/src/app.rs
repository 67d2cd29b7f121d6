//! Application wiring: configuration, logging, store and report manager.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::cli::Cli;
use crate::error::AppResult;
use salesboard_common::{init_logging, Clock, FixedClock, LoggingConfig, SystemClock};
use salesboard_config::{from_env, Config, ConfigCache, ConfigLoader};
use salesboard_engine::ReportParams;
use salesboard_reports::{InMemoryStore, ReportKind, ReportManager, ReportOutcome};

/// Loads configuration: file when given, defaults otherwise, then environment overrides.
pub fn load_config(cli: &Cli) -> AppResult<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::new(path).load()?,
        None => Config::default(),
    };
    let mut config = from_env(config)?;

    if let Some(dataset) = &cli.dataset {
        config.store.dataset_path = Some(dataset.clone());
    }
    Ok(config)
}

/// Maps the logging section onto the subscriber settings.
pub fn logging_config(config: &Config) -> LoggingConfig {
    LoggingConfig {
        level: config.logging.level.clone(),
        json_format: config.logging.json,
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    }
}

/// Builds the record store from the configured snapshot, or an empty one.
pub fn open_store(config: &Config) -> AppResult<InMemoryStore> {
    match &config.store.dataset_path {
        Some(path) => Ok(InMemoryStore::load_json(path)?),
        None => {
            warn!("No dataset configured; serving an empty store");
            Ok(InMemoryStore::default())
        }
    }
}

/// A ready-to-run application.
pub struct App {
    manager: ReportManager,
    _log_guard: Option<WorkerGuard>,
}

impl App {
    /// Wires the application from command line arguments.
    ///
    /// Initialises the global subscriber, so call it at most once per process.
    pub fn bootstrap(cli: &Cli) -> AppResult<Self> {
        let config = load_config(cli)?;
        let log_guard = init_logging(&logging_config(&config))?;
        info!(version = env!("CARGO_PKG_VERSION"), "Starting salesboard");
        Self::with_config(&config, cli, log_guard)
    }

    /// Wires the application from an already loaded configuration.
    pub fn with_config(config: &Config, cli: &Cli, log_guard: Option<WorkerGuard>) -> AppResult<Self> {
        let store = open_store(config)?;
        let clock: Arc<dyn Clock> = match cli.today {
            Some(today) => Arc::new(FixedClock(today)),
            None => Arc::new(SystemClock),
        };

        Ok(Self {
            manager: ReportManager::from_config(config, Arc::new(store), clock),
            _log_guard: log_guard,
        })
    }

    /// The live configuration report requests read their defaults from.
    pub const fn config(&self) -> &Arc<ConfigCache> {
        self.manager.config()
    }

    /// Runs one report.
    pub async fn run(&self, kind: ReportKind, params: &ReportParams) -> ReportOutcome {
        self.manager.respond(kind, params).await
    }
}

/// Serialises the response envelope.
pub fn render(outcome: &ReportOutcome, pretty: bool) -> AppResult<String> {
    let body = if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    };
    Ok(body)
}
