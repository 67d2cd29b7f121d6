//! Group-performance report.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::store::SalesStore;
use crate::traits::{ReportAssembler, ReportContext, ReportKind};
use salesboard_common::Result;
use salesboard_engine::{
    aggregate, rank_and_project, GroupingDimension, Metric, Projection, RankSpec, Records,
};

/// Every group ranked by total revenue; empty groups included.
#[derive(Debug, Default)]
pub struct GroupPerformanceReport;

#[async_trait]
impl ReportAssembler for GroupPerformanceReport {
    fn kind(&self) -> ReportKind {
        ReportKind::GroupPerformance
    }

    fn description(&self) -> &'static str {
        "Groups ranked by total revenue with per-member averages"
    }

    #[instrument(skip_all, name = "group_performance_report")]
    async fn assemble(&self, store: &dyn SalesStore, ctx: &ReportContext<'_>) -> Result<Vec<Value>> {
        let built = ctx.filters.build(&ctx.params.without_entity_filters())?;
        let filter = built.filter;

        let groups = store.fetch_groups_with_members_and_sales(&filter.range).await?;
        let rows = aggregate(Records::Groups(&groups), &filter, GroupingDimension::Group)?
            .into_groups()?;

        info!(groups = rows.len(), "Group-performance report assembled");
        rank_and_project(
            rows,
            &RankSpec::descending(Metric::TotalRevenue),
            Projection::All,
        )
    }
}
