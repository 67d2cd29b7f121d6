//! User-performance report: top users by revenue.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::store::SalesStore;
use crate::traits::{ReportAssembler, ReportContext, ReportKind};
use salesboard_common::{Result, SalesError};
use salesboard_engine::{
    aggregate, rank_and_project, GroupingDimension, Metric, Projection, RankSpec, Records,
};

/// Parses the `limit` parameter, falling back to `default` when absent.
pub fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<usize>().map_err(|_| {
            SalesError::validation_field(
                format!("'{value}' is not a non-negative integer"),
                "limit",
            )
        }),
    }
}

/// Every user ranked by total revenue, truncated to the requested limit.
#[derive(Debug, Default)]
pub struct UserPerformanceReport;

#[async_trait]
impl ReportAssembler for UserPerformanceReport {
    fn kind(&self) -> ReportKind {
        ReportKind::UserPerformance
    }

    fn description(&self) -> &'static str {
        "Users ranked by total revenue"
    }

    #[instrument(skip_all, name = "user_performance_report")]
    async fn assemble(&self, store: &dyn SalesStore, ctx: &ReportContext<'_>) -> Result<Vec<Value>> {
        let built = ctx.filters.build(&ctx.params.without_entity_filters())?;
        let limit = parse_limit(ctx.params.limit.as_deref(), ctx.default_user_limit)?;
        let filter = built.filter;

        let users = store.fetch_users_with_sales_and_groups(&filter.range).await?;
        let rows = aggregate(Records::Users(&users), &filter, GroupingDimension::User)?
            .into_users()?;

        info!(users = rows.len(), limit, "User-performance report assembled");
        rank_and_project(
            rows,
            &RankSpec::descending(Metric::TotalRevenue).with_limit(limit),
            Projection::All,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 10).unwrap(), 10);
        assert_eq!(parse_limit(Some(" 3 "), 10).unwrap(), 3);
        assert_eq!(parse_limit(Some("0"), 10).unwrap(), 0);
        assert_eq!(parse_limit(Some("-1"), 10).unwrap_err().field(), Some("limit"));
        assert!(parse_limit(Some("ten"), 10).is_err());
    }
}
