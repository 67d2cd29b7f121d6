//! Record-store entities and newtype wrappers for domain modeling.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SalesError};

/// A user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sale identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub i64);

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded sale. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Sale identifier.
    pub id: SaleId,
    /// The user who made the sale.
    pub user_id: UserId,
    /// Non-negative monetary amount.
    pub amount: Decimal,
    /// Calendar date the sale occurred on.
    pub date: NaiveDate,
}

/// A salesperson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role label, e.g. "manager".
    pub role: String,
}

/// A team of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
}

/// Association between a user and a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Member user.
    pub user_id: UserId,
    /// Group the user belongs to.
    pub group_id: GroupId,
}

/// A user together with their sales and group names, as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivity {
    /// The user.
    pub user: User,
    /// The user's sales within the requested range.
    pub sales: Vec<Sale>,
    /// Names of the user's groups. `None` marks a membership whose group
    /// no longer resolves. May contain duplicates.
    pub group_names: Vec<Option<String>>,
}

/// A group together with its member count and its members' sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupActivity {
    /// The group.
    pub group: Group,
    /// Number of distinct members.
    pub member_count: u64,
    /// Sales made by members within the requested range.
    pub sales: Vec<Sale>,
}

/// A read-only snapshot of the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// All users.
    pub users: Vec<User>,
    /// All groups.
    pub groups: Vec<Group>,
    /// User/group associations.
    pub memberships: Vec<Membership>,
    /// Every recorded sale.
    pub sales: Vec<Sale>,
}

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SalesError::validation_field(
                format!("start date {start} is after end date {end}"),
                "startDate",
            ));
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
