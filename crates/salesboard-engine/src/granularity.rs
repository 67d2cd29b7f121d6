//! Time-bucket granularities and date truncation.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketGranularity {
    /// Calendar day.
    Day,
    /// ISO week starting on Monday.
    Week,
    /// Calendar month.
    #[default]
    Month,
    /// Calendar quarter (Jan, Apr, Jul, Oct).
    Quarter,
    /// Calendar year.
    Year,
}

type Truncator = fn(NaiveDate) -> NaiveDate;

/// Indexed by the enum discriminant; the only place a bucket start is computed.
const TRUNCATORS: [Truncator; 5] = [
    truncate_day,
    truncate_week,
    truncate_month,
    truncate_quarter,
    truncate_year,
];

fn truncate_day(date: NaiveDate) -> NaiveDate {
    date
}

fn truncate_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn truncate_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn truncate_quarter(date: NaiveDate) -> NaiveDate {
    let first_month = date.month0() / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
}

fn truncate_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

impl BucketGranularity {
    /// All granularities, in discriminant order.
    pub const ALL: [Self; 5] = [Self::Day, Self::Week, Self::Month, Self::Quarter, Self::Year];

    /// Maps `date` to the first day of its bucket.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        TRUNCATORS[self as usize](date)
    }

    /// Lower-case name as accepted in requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Parses a request value, falling back to `fallback` for anything unrecognised.
    ///
    /// Unknown intervals are a policy fallback, never an error.
    pub fn coerce(input: Option<&str>, fallback: Self) -> Self {
        match input {
            Some(raw) => raw.parse().unwrap_or_else(|()| {
                tracing::warn!(interval = raw, fallback = fallback.as_str(), "Unknown interval coerced");
                fallback
            }),
            None => fallback,
        }
    }
}

impl FromStr for BucketGranularity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(wanted))
            .ok_or(())
    }
}

impl fmt::Display for BucketGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_common::test_utils::date;

    #[test]
    fn test_truncation_per_granularity() {
        let d = date(2024, 8, 15); // Thursday
        assert_eq!(BucketGranularity::Day.truncate(d), d);
        assert_eq!(BucketGranularity::Week.truncate(d), date(2024, 8, 12));
        assert_eq!(BucketGranularity::Month.truncate(d), date(2024, 8, 1));
        assert_eq!(BucketGranularity::Quarter.truncate(d), date(2024, 7, 1));
        assert_eq!(BucketGranularity::Year.truncate(d), date(2024, 1, 1));
    }

    #[test]
    fn test_week_crosses_year_boundary() {
        // 2021-01-01 is a Friday; its week starts in December 2020.
        assert_eq!(
            BucketGranularity::Week.truncate(date(2021, 1, 1)),
            date(2020, 12, 28)
        );
        assert_eq!(
            BucketGranularity::Week.truncate(date(2024, 9, 2)),
            date(2024, 9, 2)
        );
    }

    #[test]
    fn test_quarter_starts() {
        assert_eq!(BucketGranularity::Quarter.truncate(date(2024, 3, 31)), date(2024, 1, 1));
        assert_eq!(BucketGranularity::Quarter.truncate(date(2024, 4, 1)), date(2024, 4, 1));
        assert_eq!(BucketGranularity::Quarter.truncate(date(2024, 12, 31)), date(2024, 10, 1));
    }

    #[test]
    fn test_coerce_unknown_to_fallback() {
        let fallback = BucketGranularity::Month;
        assert_eq!(BucketGranularity::coerce(Some("week"), fallback), BucketGranularity::Week);
        assert_eq!(BucketGranularity::coerce(Some(" QUARTER "), fallback), BucketGranularity::Quarter);
        assert_eq!(BucketGranularity::coerce(Some("fortnight"), fallback), fallback);
        assert_eq!(BucketGranularity::coerce(Some("day; drop table"), fallback), fallback);
        assert_eq!(BucketGranularity::coerce(Some(""), fallback), fallback);
        assert_eq!(BucketGranularity::coerce(None, BucketGranularity::Year), BucketGranularity::Year);
    }

    #[test]
    fn test_discriminants_match_table() {
        for granularity in BucketGranularity::ALL {
            let d = date(2023, 11, 30);
            let start = granularity.truncate(d);
            assert!(start <= d, "{granularity} bucket starts after its member date");
        }
        assert_eq!(BucketGranularity::default(), BucketGranularity::Month);
    }
}
