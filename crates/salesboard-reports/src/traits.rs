//! Report assembler trait and the request context it receives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::store::SalesStore;
use salesboard_common::{Result, SalesError};
use salesboard_engine::{FilterBuilder, ReportParams};

/// The reports the system can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Revenue per time bucket.
    TimeSeries,
    /// Per-user performance, top N by revenue.
    UserPerformance,
    /// Per-group performance.
    GroupPerformance,
    /// Revenue per time bucket with period-over-period growth.
    Trend,
}

impl ReportKind {
    /// Every report kind.
    pub const ALL: [Self; 4] = [
        Self::TimeSeries,
        Self::UserPerformance,
        Self::GroupPerformance,
        Self::Trend,
    ];

    /// Request name of the report.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeSeries => "time-series",
            Self::UserPerformance => "user-performance",
            Self::GroupPerformance => "group-performance",
            Self::Trend => "trend",
        }
    }
}

impl FromStr for ReportKind {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| SalesError::validation_field(format!("unknown report '{s}'"), "report"))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an assembler needs besides the store.
pub struct ReportContext<'a> {
    /// Raw caller parameters.
    pub params: &'a ReportParams,
    /// Filter Builder bound to the request clock and defaults.
    pub filters: FilterBuilder<'a>,
    /// Row limit of the user report when `limit` is absent.
    pub default_user_limit: usize,
}

/// Composes the engine stages into one report shape.
#[async_trait]
pub trait ReportAssembler: Send + Sync {
    /// Which report this assembler produces.
    fn kind(&self) -> ReportKind;

    /// Human-readable summary of the report.
    fn description(&self) -> &'static str;

    /// Fetches, aggregates, ranks and projects the report rows.
    async fn assemble(&self, store: &dyn SalesStore, ctx: &ReportContext<'_>) -> Result<Vec<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_names() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                Value::String(kind.to_string())
            );
        }
        let err = "leaderboard".parse::<ReportKind>().unwrap_err();
        assert_eq!(err.field(), Some("report"));
    }
}
