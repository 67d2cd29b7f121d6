//! Report dispatch and the uniform response envelope.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::group_performance::GroupPerformanceReport;
use crate::pool::StorePool;
use crate::store::SalesStore;
use crate::time_series::TimeSeriesReport;
use crate::traits::{ReportAssembler, ReportContext, ReportKind};
use crate::trend::TrendReport;
use crate::user_performance::UserPerformanceReport;
use salesboard_common::{Clock, Result, SalesError};
use salesboard_config::{Config, ConfigCache, ReportsConfig};
use salesboard_engine::{BucketGranularity, FilterBuilder, FilterDefaults, ReportParams};

/// Body returned for every failed report.
pub const FAILURE_MESSAGE: &str = "report generation failed";

/// What a caller receives: the full row sequence or a uniform failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    /// `{"data": [...]}`
    Success {
        /// Report rows in output order.
        data: Vec<Value>,
    },
    /// `{"error": "..."}`
    Failure {
        /// Generic failure indicator.
        error: String,
    },
}

impl ReportOutcome {
    /// Whether the report succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Rows of a successful report.
    pub fn data(&self) -> Option<&[Value]> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

/// Filter defaults taken from the reports section of a configuration snapshot.
pub fn filter_defaults(reports: &ReportsConfig) -> FilterDefaults {
    FilterDefaults {
        start_date: reports.default_start_date,
        interval: BucketGranularity::coerce(
            Some(reports.default_interval.as_str()),
            BucketGranularity::Month,
        ),
    }
}

/// Owns the assemblers and runs report requests against the store pool.
///
/// Report defaults are read from the configuration cache once per request;
/// pool sizing is fixed when the manager is built.
pub struct ReportManager {
    pool: StorePool,
    clock: Arc<dyn Clock>,
    config: Arc<ConfigCache>,
    assemblers: HashMap<ReportKind, Box<dyn ReportAssembler>>,
}

impl ReportManager {
    /// Creates a manager with every report registered.
    pub fn new(pool: StorePool, clock: Arc<dyn Clock>, config: Arc<ConfigCache>) -> Self {
        let assemblers: Vec<Box<dyn ReportAssembler>> = vec![
            Box::new(TimeSeriesReport),
            Box::new(UserPerformanceReport),
            Box::new(GroupPerformanceReport),
            Box::new(TrendReport),
        ];

        Self {
            pool,
            clock,
            config,
            assemblers: assemblers
                .into_iter()
                .map(|assembler| (assembler.kind(), assembler))
                .collect(),
        }
    }

    /// Creates a manager sized and defaulted from application configuration.
    pub fn from_config(config: &Config, store: Arc<dyn SalesStore>, clock: Arc<dyn Clock>) -> Self {
        let pool = StorePool::new(
            store,
            config.store.pool_size,
            Duration::from_millis(config.store.acquire_timeout_ms),
        );
        Self::new(pool, clock, Arc::new(ConfigCache::new(config.clone())))
    }

    /// The live configuration requests read their defaults from.
    pub const fn config(&self) -> &Arc<ConfigCache> {
        &self.config
    }

    /// The store pool requests run against.
    pub const fn pool(&self) -> &StorePool {
        &self.pool
    }

    /// Registered reports with their descriptions, in [`ReportKind::ALL`] order.
    pub fn describe(&self) -> Vec<(ReportKind, &'static str)> {
        ReportKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.assemblers
                    .get(&kind)
                    .map(|assembler| (kind, assembler.description()))
            })
            .collect()
    }

    /// Runs one report, propagating any error.
    pub async fn run(&self, kind: ReportKind, params: &ReportParams) -> Result<Vec<Value>> {
        let assembler = self.assemblers.get(&kind).ok_or_else(|| {
            SalesError::validation_field(format!("report '{kind}' is not registered"), "report")
        })?;

        let config = self.config.get();
        let ctx = ReportContext {
            params,
            filters: FilterBuilder::new(filter_defaults(&config.reports), self.clock.as_ref()),
            default_user_limit: config.reports.user_report_limit,
        };

        let store = self.pool.acquire().await?;
        debug!(report = %kind, "Assembling report");
        assembler.assemble(&*store, &ctx).await
    }

    /// Runs one report and wraps the result in the response envelope.
    ///
    /// Errors are logged and never leaked into the body.
    pub async fn respond(&self, kind: ReportKind, params: &ReportParams) -> ReportOutcome {
        match self.run(kind, params).await {
            Ok(data) => {
                info!(report = %kind, rows = data.len(), "Report generated");
                ReportOutcome::Success { data }
            }
            Err(e) => {
                error!(report = %kind, error = %e, "Report generation failed");
                ReportOutcome::Failure {
                    error: FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use salesboard_common::test_utils::{date, sample_dataset};
    use salesboard_common::FixedClock;

    fn manager() -> ReportManager {
        let store = Arc::new(InMemoryStore::new(sample_dataset()));
        let clock = Arc::new(FixedClock(date(2024, 3, 31)));
        ReportManager::from_config(&Config::default(), store, clock)
    }

    #[test]
    fn test_outcome_serialization() {
        let ok = ReportOutcome::Success { data: vec![] };
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"data":[]}"#);

        let failed = ReportOutcome::Failure {
            error: FAILURE_MESSAGE.to_string(),
        };
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"error":"report generation failed"}"#
        );
        assert!(!failed.is_success());
        assert!(failed.data().is_none());
    }

    #[test]
    fn test_every_report_registered() {
        let described = manager().describe();
        let kinds: Vec<_> = described.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, ReportKind::ALL.to_vec());
    }

    #[test]
    fn test_filter_defaults_from_config() {
        let mut reports = ReportsConfig::default();
        reports.default_interval = "quarter".into();
        reports.default_start_date = date(2023, 4, 1);

        let defaults = filter_defaults(&reports);
        assert_eq!(defaults.interval, BucketGranularity::Quarter);
        assert_eq!(defaults.start_date, date(2023, 4, 1));
    }

    #[tokio::test]
    async fn test_config_update_applies_to_next_request() {
        let manager = manager();
        let all = manager
            .run(ReportKind::UserPerformance, &ReportParams::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let mut next = Config::default();
        next.reports.user_report_limit = 1;
        manager.config().replace(next).unwrap();

        let top = manager
            .run(ReportKind::UserPerformance, &ReportParams::default())
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_validation_failure_is_uniform() {
        let params = ReportParams {
            start_date: Some("yesterday".into()),
            ..ReportParams::default()
        };
        let manager = manager();

        let err = manager.run(ReportKind::TimeSeries, &params).await.unwrap_err();
        assert!(err.is_validation());

        let outcome = manager.respond(ReportKind::TimeSeries, &params).await;
        assert_eq!(
            outcome,
            ReportOutcome::Failure {
                error: FAILURE_MESSAGE.to_string()
            }
        );
        assert_eq!(manager.pool().available(), manager.pool().size());
    }
}
