//! Time-series report: revenue per time bucket with optional entity filters.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::store::SalesStore;
use crate::traits::{ReportAssembler, ReportContext, ReportKind};
use salesboard_common::{Result, SalesError};
use salesboard_engine::{
    aggregate, rank_and_project, GroupingDimension, Metric, Projection, RankSpec, Records,
};

/// Metrics a time-series row can be narrowed to.
const SERIES_METRICS: [Metric; 4] = [
    Metric::SaleCount,
    Metric::TotalRevenue,
    Metric::AverageRevenue,
    Metric::ActiveUserCount,
];

/// Interprets the `metric` parameter: absent or `all` emits every field.
pub fn parse_projection(metric: Option<&str>) -> Result<Projection> {
    match metric.map(str::trim) {
        None | Some("") => Ok(Projection::All),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(Projection::All),
        Some(raw) => {
            let metric: Metric = raw.parse()?;
            if SERIES_METRICS.contains(&metric) {
                Ok(Projection::Only(metric))
            } else {
                Err(SalesError::validation_field(
                    format!("metric '{raw}' is not available on the time-series report"),
                    "metric",
                ))
            }
        }
    }
}

/// Revenue per time bucket.
#[derive(Debug, Default)]
pub struct TimeSeriesReport;

#[async_trait]
impl ReportAssembler for TimeSeriesReport {
    fn kind(&self) -> ReportKind {
        ReportKind::TimeSeries
    }

    fn description(&self) -> &'static str {
        "Sales count and revenue per time bucket"
    }

    #[instrument(skip_all, name = "time_series_report")]
    async fn assemble(&self, store: &dyn SalesStore, ctx: &ReportContext<'_>) -> Result<Vec<Value>> {
        let built = ctx.filters.build(ctx.params)?;
        let projection = parse_projection(ctx.params.metric.as_deref())?;
        let filter = built.filter;

        let sales = store
            .fetch_sales(&filter.range, filter.user_id, filter.group_id)
            .await?;
        let rows = aggregate(
            Records::Sales(&sales),
            &filter,
            GroupingDimension::TimePeriod(built.granularity),
        )?
        .into_periods()?;

        info!(
            granularity = %built.granularity,
            buckets = rows.len(),
            "Time-series report assembled"
        );
        rank_and_project(rows, &RankSpec::unranked(), projection)
    }
}
