//! Test utilities and shared fixtures for salesboard.
//!
//! Available to other crates through the `testing` feature.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Once;

use crate::{Dataset, Group, GroupId, Membership, Sale, SaleId, User, UserId};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Shorthand for a calendar date. Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Shorthand for a whole-unit amount.
pub fn money(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Fluent builder for fixture datasets.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    /// Starts an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    pub fn user(mut self, id: i64, name: &str, role: &str) -> Self {
        self.dataset.users.push(User {
            id: UserId(id),
            name: name.to_string(),
            role: role.to_string(),
        });
        self
    }

    /// Adds a group.
    pub fn group(mut self, id: i64, name: &str) -> Self {
        self.dataset.groups.push(Group {
            id: GroupId(id),
            name: name.to_string(),
        });
        self
    }

    /// Puts a user into a group.
    pub fn member(mut self, user: i64, group: i64) -> Self {
        self.dataset.memberships.push(Membership {
            user_id: UserId(user),
            group_id: GroupId(group),
        });
        self
    }

    /// Records a sale. Sale ids are assigned sequentially.
    pub fn sale(mut self, user: i64, amount: Decimal, on: NaiveDate) -> Self {
        let id = i64::try_from(self.dataset.sales.len()).unwrap_or(i64::MAX) + 1;
        self.dataset.sales.push(Sale {
            id: SaleId(id),
            user_id: UserId(user),
            amount,
            date: on,
        });
        self
    }

    /// Finishes the dataset.
    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// Two months of sales across three users and three groups.
///
/// January 2024: three sales totalling 60813. February 2024: one sale of 16562.
/// Alice earns 38000 on a single day, Bob 39375 over two days, Carol nothing.
/// Group "North" has Alice and Bob, "South" has Bob and Carol, "Dormant" has no members.
pub fn sample_dataset() -> Dataset {
    DatasetBuilder::new()
        .user(1, "Alice", "manager")
        .user(2, "Bob", "sales")
        .user(3, "Carol", "sales")
        .group(1, "North")
        .group(2, "South")
        .group(3, "Dormant")
        .member(1, 1)
        .member(2, 1)
        .member(2, 2)
        .member(3, 2)
        .sale(1, money(20000), date(2024, 1, 5))
        .sale(1, money(18000), date(2024, 1, 5))
        .sale(2, money(22813), date(2024, 1, 20))
        .sale(2, money(16562), date(2024, 2, 10))
        .build()
}

/// Assert that two decimals are equal within a tolerance.
pub fn assert_decimal_eq(left: Decimal, right: Decimal, tolerance: Decimal) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Property-based testing strategies.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Any date between 1990-01-01 and roughly 2060.
    pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..25_000).prop_map(|offset| date(1990, 1, 1) + chrono::Duration::days(offset))
    }

    /// Non-negative amounts with two decimal places.
    pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// A sale by one of `users` users in 2023-2024.
    pub fn sale_strategy(users: i64) -> impl Strategy<Value = Sale> {
        (1i64..=users, amount_strategy(), 0i64..730).prop_map(|(user, amount, offset)| Sale {
            id: SaleId(0),
            user_id: UserId(user),
            amount,
            date: date(2023, 1, 1) + chrono::Duration::days(offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_sample_dataset_shape() {
        let dataset = sample_dataset();
        assert_eq!(dataset.users.len(), 3);
        assert_eq!(dataset.groups.len(), 3);
        assert_eq!(dataset.memberships.len(), 4);
        let january: Decimal = dataset
            .sales
            .iter()
            .filter(|s| s.date < date(2024, 2, 1))
            .map(|s| s.amount)
            .sum();
        assert_eq!(january, money(60813));
        assert_eq!(dataset.sales[3].id, SaleId(4));
    }

    #[test]
    #[should_panic]
    fn test_assert_decimal_eq_fails() {
        assert_decimal_eq(money(1), money(2), Decimal::new(5, 1));
    }
}
