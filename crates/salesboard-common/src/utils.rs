//! Shared money and date helpers.

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator` rounded to cents, or `None` when the divisor is zero.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator).map(round_cents)
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
///
/// Timestamps are reduced to their UTC date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|ts| ts.naive_utc().date())
        })
}
