//! Period-over-period revenue growth.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::PeriodAggregate;
use salesboard_common::round_cents;

/// A period aggregate with its growth relative to the preceding period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    /// The period's aggregate.
    #[serde(flatten)]
    pub aggregate: PeriodAggregate,
    /// Percentage change in total revenue, rounded to cents.
    pub growth_percentage: Option<Decimal>,
}

/// Percentage change from `previous` to `current`.
///
/// `None` when either side is missing or `previous` is zero.
pub fn growth_percentage(previous: Option<Decimal>, current: Option<Decimal>) -> Option<Decimal> {
    let previous = previous.filter(|value| !value.is_zero())?;
    let current = current?;
    (current - previous)
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_cents)
}

/// Attaches growth to each row, comparing against the row before it.
///
/// `rows` must already be in ascending period order; the first row never has growth.
pub fn with_growth(rows: Vec<PeriodAggregate>) -> Vec<TrendRow> {
    let mut previous: Option<Decimal> = None;
    rows.into_iter()
        .enumerate()
        .map(|(index, aggregate)| {
            let current = aggregate.stats.total_revenue;
            let growth_percentage = if index == 0 {
                None
            } else {
                growth_percentage(previous, current)
            };
            previous = current;
            TrendRow {
                aggregate,
                growth_percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RevenueStats;
    use salesboard_common::test_utils::{date, money};

    fn row(month: u32, total: Option<i64>) -> PeriodAggregate {
        PeriodAggregate {
            period: date(2024, month, 1),
            stats: RevenueStats {
                sale_count: u64::from(total.is_some()),
                total_revenue: total.map(money),
                average_revenue: total.map(money),
            },
            active_user_count: 1,
        }
    }

    #[test]
    fn test_first_row_has_no_growth() {
        let rows = with_growth(vec![row(1, Some(60813)), row(2, Some(16562))]);
        assert_eq!(rows[0].growth_percentage, None);
        assert_eq!(rows[1].growth_percentage, Some(Decimal::new(-7277, 2)));
    }

    #[test]
    fn test_zero_or_missing_prior_revenue() {
        let rows = with_growth(vec![
            row(1, Some(0)),
            row(2, Some(500)),
            row(3, None),
            row(4, Some(250)),
            row(5, Some(500)),
        ]);
        assert_eq!(rows[1].growth_percentage, None);
        assert_eq!(rows[2].growth_percentage, None);
        assert_eq!(rows[3].growth_percentage, None);
        assert_eq!(rows[4].growth_percentage, Some(Decimal::new(10000, 2)));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(with_growth(Vec::new()).is_empty());
    }

    #[test]
    fn test_trend_row_serializes_flat() {
        let rows = with_growth(vec![row(1, Some(100)), row(2, Some(150))]);
        let value = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(value["period"], "2024-02-01");
        assert_eq!(value["growthPercentage"].as_f64(), Some(50.0));
        assert!(serde_json::to_value(&rows[0]).unwrap()["growthPercentage"].is_null());
    }
}
