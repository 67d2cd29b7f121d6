//! Ranking, truncation and field projection of aggregate rows.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::aggregator::{GroupAggregate, PeriodAggregate, UserAggregate};
use crate::growth::TrendRow;
use salesboard_common::{Result, SalesError};

/// A numeric field rows can be ranked or projected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `saleCount`
    SaleCount,
    /// `totalRevenue`
    TotalRevenue,
    /// `averageRevenue`
    AverageRevenue,
    /// `activeUserCount`
    ActiveUserCount,
    /// `activeDayCount`
    ActiveDayCount,
    /// `memberCount`
    MemberCount,
    /// `avgRevenuePerMember`
    AvgRevenuePerMember,
    /// `growthPercentage`
    GrowthPercentage,
}

impl Metric {
    /// Every metric.
    pub const ALL: [Self; 8] = [
        Self::SaleCount,
        Self::TotalRevenue,
        Self::AverageRevenue,
        Self::ActiveUserCount,
        Self::ActiveDayCount,
        Self::MemberCount,
        Self::AvgRevenuePerMember,
        Self::GrowthPercentage,
    ];

    /// Output field name of the metric.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::SaleCount => "saleCount",
            Self::TotalRevenue => "totalRevenue",
            Self::AverageRevenue => "averageRevenue",
            Self::ActiveUserCount => "activeUserCount",
            Self::ActiveDayCount => "activeDayCount",
            Self::MemberCount => "memberCount",
            Self::AvgRevenuePerMember => "avgRevenuePerMember",
            Self::GrowthPercentage => "growthPercentage",
        }
    }
}

impl FromStr for Metric {
    type Err = SalesError;

    /// Accepts the camelCase field name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|metric| metric.field_name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| SalesError::validation_field(format!("unknown metric '{s}'"), "metric"))
    }
}

/// Sort direction. Missing values sort last either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

/// How to order and truncate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankSpec {
    /// Sort key; `None` keeps the incoming order.
    pub sort: Option<(Metric, Direction)>,
    /// Maximum rows kept; `None` keeps all.
    pub limit: Option<usize>,
}

impl RankSpec {
    /// Keep incoming order and every row.
    pub const fn unranked() -> Self {
        Self {
            sort: None,
            limit: None,
        }
    }

    /// Descending by `metric`, nulls last.
    pub const fn descending(metric: Metric) -> Self {
        Self {
            sort: Some((metric, Direction::Descending)),
            limit: None,
        }
    }

    /// Caps the number of rows.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which fields of a row to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Every field.
    #[default]
    All,
    /// The row's key field plus one metric.
    Only(Metric),
}

/// Rows that expose metric values for ranking.
pub trait Rankable {
    /// Name of the field identifying the row, kept by every projection.
    const KEY_FIELD: &'static str;

    /// Value of `metric`, or `None` when absent for this row.
    fn metric_value(&self, metric: Metric) -> Option<Decimal>;
}

impl Rankable for PeriodAggregate {
    const KEY_FIELD: &'static str = "period";

    fn metric_value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::SaleCount => Some(Decimal::from(self.stats.sale_count)),
            Metric::TotalRevenue => self.stats.total_revenue,
            Metric::AverageRevenue => self.stats.average_revenue,
            Metric::ActiveUserCount => Some(Decimal::from(self.active_user_count)),
            _ => None,
        }
    }
}

impl Rankable for TrendRow {
    const KEY_FIELD: &'static str = "period";

    fn metric_value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::GrowthPercentage => self.growth_percentage,
            other => self.aggregate.metric_value(other),
        }
    }
}

impl Rankable for UserAggregate {
    const KEY_FIELD: &'static str = "userId";

    fn metric_value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::SaleCount => Some(Decimal::from(self.stats.sale_count)),
            Metric::TotalRevenue => self.stats.total_revenue,
            Metric::AverageRevenue => self.stats.average_revenue,
            Metric::ActiveDayCount => Some(Decimal::from(self.active_day_count)),
            _ => None,
        }
    }
}

impl Rankable for GroupAggregate {
    const KEY_FIELD: &'static str = "groupId";

    fn metric_value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::SaleCount => Some(Decimal::from(self.stats.sale_count)),
            Metric::TotalRevenue => self.stats.total_revenue,
            Metric::AverageRevenue => self.stats.average_revenue,
            Metric::MemberCount => Some(Decimal::from(self.member_count)),
            Metric::AvgRevenuePerMember => self.avg_revenue_per_member,
            _ => None,
        }
    }
}

/// Compares two optional values with `None` after every `Some`.
fn nulls_last(a: Option<Decimal>, b: Option<Decimal>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            Direction::Ascending => a.cmp(&b),
            Direction::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts (stably) and truncates `rows` according to `spec`.
pub fn rank<T: Rankable>(mut rows: Vec<T>, spec: &RankSpec) -> Vec<T> {
    if let Some((metric, direction)) = spec.sort {
        rows.sort_by(|a, b| nulls_last(a.metric_value(metric), b.metric_value(metric), direction));
    }
    if let Some(limit) = spec.limit {
        rows.truncate(limit);
    }
    rows
}

/// Serializes rows, keeping only the fields `projection` asks for.
pub fn project<T: Rankable + Serialize>(rows: &[T], projection: Projection) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| -> Result<Value> {
            let value = serde_json::to_value(row)?;
            Ok(match (projection, value) {
                (Projection::Only(metric), Value::Object(mut fields)) => {
                    let mut projected = Map::new();
                    for name in [T::KEY_FIELD, metric.field_name()] {
                        if let Some(field) = fields.remove(name) {
                            projected.insert(name.to_string(), field);
                        }
                    }
                    Value::Object(projected)
                }
                (_, value) => value,
            })
        })
        .collect()
}

/// [`rank`] followed by [`project`].
pub fn rank_and_project<T: Rankable + Serialize>(
    rows: Vec<T>,
    spec: &RankSpec,
    projection: Projection,
) -> Result<Vec<Value>> {
    let ranked = rank(rows, spec);
    project(&ranked, projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RevenueStats;
    use salesboard_common::test_utils::{date, money};
    use salesboard_common::UserId;

    fn user(id: i64, total: Option<i64>) -> UserAggregate {
        UserAggregate {
            user_id: UserId(id),
            name: format!("user{id}"),
            role: "sales".into(),
            groups: vec![],
            stats: RevenueStats {
                sale_count: u64::from(total.is_some()),
                total_revenue: total.map(money),
                average_revenue: total.map(money),
            },
            active_day_count: u64::from(total.is_some()),
        }
    }

    fn ids(rows: &[UserAggregate]) -> Vec<i64> {
        rows.iter().map(|row| row.user_id.0).collect()
    }

    #[test]
    fn test_descending_with_nulls_last() {
        let rows = vec![user(1, None), user(2, Some(47836)), user(3, Some(88748)), user(4, None)];
        let ranked = rank(rows, &RankSpec::descending(Metric::TotalRevenue));
        assert_eq!(ids(&ranked), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_ascending_keeps_nulls_last() {
        let rows = vec![user(1, None), user(2, Some(47836)), user(3, Some(88748))];
        let spec = RankSpec {
            sort: Some((Metric::TotalRevenue, Direction::Ascending)),
            limit: None,
        };
        assert_eq!(ids(&rank(rows, &spec)), vec![2, 3, 1]);
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let rows = vec![user(1, Some(47836)), user(2, Some(88748))];
        let ranked = rank(rows, &RankSpec::descending(Metric::TotalRevenue).with_limit(1));
        assert_eq!(ids(&ranked), vec![2]);

        let rows = vec![user(1, Some(5))];
        assert!(rank(rows, &RankSpec::unranked().with_limit(0)).is_empty());
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("totalRevenue".parse::<Metric>().unwrap(), Metric::TotalRevenue);
        assert_eq!("total_revenue".parse::<Metric>().unwrap(), Metric::TotalRevenue);
        assert_eq!("SALECOUNT".parse::<Metric>().unwrap(), Metric::SaleCount);
        let err = "revenue_per_fortnight".parse::<Metric>().unwrap_err();
        assert_eq!(err.field(), Some("metric"));
    }

    #[test]
    fn test_projection_keeps_key_and_metric() {
        let row = PeriodAggregate {
            period: date(2024, 1, 1),
            stats: RevenueStats {
                sale_count: 3,
                total_revenue: Some(money(60813)),
                average_revenue: Some(money(20271)),
            },
            active_user_count: 2,
        };

        let all = project(std::slice::from_ref(&row), Projection::All).unwrap();
        assert_eq!(all[0].as_object().unwrap().len(), 5);

        let only = project(&[row], Projection::Only(Metric::SaleCount)).unwrap();
        let fields = only[0].as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["period"], "2024-01-01");
        assert_eq!(fields["saleCount"], 3);
    }
}
