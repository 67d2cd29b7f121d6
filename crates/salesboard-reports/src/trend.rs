//! Trend report: time buckets with period-over-period revenue growth.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::store::SalesStore;
use crate::traits::{ReportAssembler, ReportContext, ReportKind};
use salesboard_common::Result;
use salesboard_engine::{
    aggregate, rank_and_project, with_growth, GroupingDimension, Projection, RankSpec, Records,
};

/// Revenue per bucket plus growth against the previous bucket.
#[derive(Debug, Default)]
pub struct TrendReport;

#[async_trait]
impl ReportAssembler for TrendReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Trend
    }

    fn description(&self) -> &'static str {
        "Revenue per time bucket with period-over-period growth"
    }

    #[instrument(skip_all, name = "trend_report")]
    async fn assemble(&self, store: &dyn SalesStore, ctx: &ReportContext<'_>) -> Result<Vec<Value>> {
        let built = ctx.filters.build(&ctx.params.without_entity_filters())?;
        let filter = built.filter;

        let sales = store.fetch_sales(&filter.range, None, None).await?;
        let periods = aggregate(
            Records::Sales(&sales),
            &filter,
            GroupingDimension::TimePeriod(built.granularity),
        )?
        .into_periods()?;
        let rows = with_growth(periods);

        info!(
            granularity = %built.granularity,
            periods = rows.len(),
            "Trend report assembled"
        );
        rank_and_project(rows, &RankSpec::unranked(), Projection::All)
    }
}
