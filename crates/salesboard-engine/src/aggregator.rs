//! Bucketing and aggregation of sales by time period, user, or group.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

use crate::filter::ReportFilter;
use crate::granularity::BucketGranularity;
use salesboard_common::{
    checked_ratio, GroupActivity, GroupId, Result, Sale, SalesError, UserActivity, UserId,
};

/// What the aggregation groups sales by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingDimension {
    /// One row per bucket present in the data, ascending.
    TimePeriod(BucketGranularity),
    /// One row per user, including users without sales.
    User,
    /// One row per group, including empty groups.
    Group,
}

/// Count, sum and mean of a set of sale amounts.
///
/// Revenue fields are `None` when there are no sales, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    /// Number of sales.
    pub sale_count: u64,
    /// Sum of amounts.
    pub total_revenue: Option<Decimal>,
    /// Mean amount, rounded to cents.
    pub average_revenue: Option<Decimal>,
}

impl RevenueStats {
    /// Folds the amounts of `sales`.
    ///
    /// A total beyond the decimal range is a computation error.
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Result<Self> {
        let mut count = 0u64;
        let mut total = Decimal::ZERO;
        for sale in sales {
            total = total.checked_add(sale.amount).ok_or_else(|| {
                SalesError::computation(format!("revenue total overflows at sale {}", sale.id))
            })?;
            count += 1;
        }

        if count == 0 {
            return Ok(Self::default());
        }

        Ok(Self {
            sale_count: count,
            total_revenue: Some(total),
            average_revenue: checked_ratio(total, Decimal::from(count)),
        })
    }
}

/// Aggregate for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAggregate {
    /// First day of the bucket.
    pub period: NaiveDate,
    /// Revenue statistics.
    #[serde(flatten)]
    pub stats: RevenueStats,
    /// Distinct users with at least one sale in the bucket.
    pub active_user_count: u64,
}

/// Aggregate for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAggregate {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Role label.
    pub role: String,
    /// Deduplicated group names, in first-seen order.
    pub groups: Vec<String>,
    /// Revenue statistics.
    #[serde(flatten)]
    pub stats: RevenueStats,
    /// Distinct calendar days with a sale.
    pub active_day_count: u64,
}

/// Aggregate for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAggregate {
    /// Group identifier.
    pub group_id: GroupId,
    /// Display name.
    pub name: String,
    /// Distinct members.
    pub member_count: u64,
    /// Revenue statistics.
    #[serde(flatten)]
    pub stats: RevenueStats,
    /// `totalRevenue / memberCount`; `None` without members or revenue.
    pub avg_revenue_per_member: Option<Decimal>,
}

/// Records handed to [`aggregate`], one shape per dimension.
#[derive(Debug, Clone, Copy)]
pub enum Records<'a> {
    /// Raw sales, for time bucketing.
    Sales(&'a [Sale]),
    /// Users with their sales and groups.
    Users(&'a [UserActivity]),
    /// Groups with member counts and sales.
    Groups(&'a [GroupActivity]),
}

/// Rows produced by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateRows {
    /// Time-bucketed rows, ascending by period.
    Periods(Vec<PeriodAggregate>),
    /// Per-user rows, ascending by user id.
    Users(Vec<UserAggregate>),
    /// Per-group rows, ascending by group id.
    Groups(Vec<GroupAggregate>),
}

impl AggregateRows {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Periods(rows) => rows.len(),
            Self::Users(rows) => rows.len(),
            Self::Groups(rows) => rows.len(),
        }
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The time-bucketed rows, or a computation error for another shape.
    pub fn into_periods(self) -> Result<Vec<PeriodAggregate>> {
        match self {
            Self::Periods(rows) => Ok(rows),
            other => Err(other.shape_mismatch("period")),
        }
    }

    /// The per-user rows, or a computation error for another shape.
    pub fn into_users(self) -> Result<Vec<UserAggregate>> {
        match self {
            Self::Users(rows) => Ok(rows),
            other => Err(other.shape_mismatch("user")),
        }
    }

    /// The per-group rows, or a computation error for another shape.
    pub fn into_groups(self) -> Result<Vec<GroupAggregate>> {
        match self {
            Self::Groups(rows) => Ok(rows),
            other => Err(other.shape_mismatch("group")),
        }
    }

    fn shape_mismatch(&self, wanted: &str) -> SalesError {
        let found = match self {
            Self::Periods(_) => "period",
            Self::Users(_) => "user",
            Self::Groups(_) => "group",
        };
        SalesError::computation(format!("expected {wanted} rows, got {found} rows"))
    }
}

/// Aggregates `records` along `dimension`.
///
/// Empty inputs produce empty output. A record shape that does not fit the
/// dimension is a caller defect and yields a computation error.
pub fn aggregate(
    records: Records<'_>,
    filter: &ReportFilter,
    dimension: GroupingDimension,
) -> Result<AggregateRows> {
    match (dimension, records) {
        (GroupingDimension::TimePeriod(granularity), Records::Sales(sales)) => {
            aggregate_periods(sales, filter, granularity).map(AggregateRows::Periods)
        }
        (GroupingDimension::User, Records::Users(users)) => {
            aggregate_users(users, filter).map(AggregateRows::Users)
        }
        (GroupingDimension::Group, Records::Groups(groups)) => {
            aggregate_groups(groups, filter).map(AggregateRows::Groups)
        }
        (dimension, _) => Err(SalesError::computation(format!(
            "records do not match grouping dimension {dimension:?}"
        ))),
    }
}

/// Buckets matching sales by `granularity`; one row per non-empty bucket, ascending.
#[instrument(skip(sales, filter), fields(sales = sales.len()))]
pub fn aggregate_periods(
    sales: &[Sale],
    filter: &ReportFilter,
    granularity: BucketGranularity,
) -> Result<Vec<PeriodAggregate>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&Sale>> = BTreeMap::new();
    for sale in sales.iter().filter(|sale| filter.matches_sale(sale)) {
        buckets
            .entry(granularity.truncate(sale.date))
            .or_default()
            .push(sale);
    }

    let rows: Vec<PeriodAggregate> = buckets
        .into_iter()
        .map(|(period, bucket)| {
            let active_users: HashSet<UserId> = bucket.iter().map(|sale| sale.user_id).collect();
            Ok(PeriodAggregate {
                period,
                stats: RevenueStats::from_sales(bucket.iter().copied())?,
                active_user_count: active_users.len() as u64,
            })
        })
        .collect::<Result<_>>()?;

    debug!("Aggregated {} period buckets", rows.len());
    Ok(rows)
}

/// One row per user, including users without matching sales.
#[instrument(skip(users, filter), fields(users = users.len()))]
pub fn aggregate_users(users: &[UserActivity], filter: &ReportFilter) -> Result<Vec<UserAggregate>> {
    let mut rows: Vec<UserAggregate> = users
        .iter()
        .map(|activity| {
            let sales: Vec<&Sale> = activity
                .sales
                .iter()
                .filter(|sale| filter.range.contains(sale.date))
                .collect();
            let active_days: HashSet<NaiveDate> = sales.iter().map(|sale| sale.date).collect();

            Ok(UserAggregate {
                user_id: activity.user.id,
                name: activity.user.name.clone(),
                role: activity.user.role.clone(),
                groups: distinct_names(&activity.group_names),
                stats: RevenueStats::from_sales(sales.iter().copied())?,
                active_day_count: active_days.len() as u64,
            })
        })
        .collect::<Result<_>>()?;

    rows.sort_by_key(|row| row.user_id);
    debug!("Aggregated {} users", rows.len());
    Ok(rows)
}

/// One row per group, including groups without members or sales.
#[instrument(skip(groups, filter), fields(groups = groups.len()))]
pub fn aggregate_groups(
    groups: &[GroupActivity],
    filter: &ReportFilter,
) -> Result<Vec<GroupAggregate>> {
    let mut rows: Vec<GroupAggregate> = groups
        .iter()
        .map(|activity| {
            let stats = RevenueStats::from_sales(
                activity
                    .sales
                    .iter()
                    .filter(|sale| filter.range.contains(sale.date)),
            )?;
            let avg_revenue_per_member = stats
                .total_revenue
                .and_then(|total| checked_ratio(total, Decimal::from(activity.member_count)));

            Ok(GroupAggregate {
                group_id: activity.group.id,
                name: activity.group.name.clone(),
                member_count: activity.member_count,
                stats,
                avg_revenue_per_member,
            })
        })
        .collect::<Result<_>>()?;

    rows.sort_by_key(|row| row.group_id);
    debug!("Aggregated {} groups", rows.len());
    Ok(rows)
}

/// Drops missing names and duplicates, keeping first-seen order.
fn distinct_names(names: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .flatten()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
