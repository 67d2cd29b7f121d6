//! Filter Builder: validates raw report parameters into a filter predicate
//! and a bucket granularity.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::granularity::BucketGranularity;
use salesboard_common::{parse_date, Clock, DateRange, GroupId, Result, Sale, SalesError, UserId};

/// Raw, unvalidated report parameters as supplied by a caller.
///
/// Numeric parameters may arrive as JSON strings or numbers; both are kept
/// as text and validated by [`FilterBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportParams {
    /// Inclusive window start, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive window end; today when absent.
    pub end_date: Option<String>,
    /// Bucket width name.
    pub interval: Option<String>,
    /// Restrict to one user's sales.
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    /// Restrict to sales by members of one group.
    #[serde(deserialize_with = "string_or_number")]
    pub group_id: Option<String>,
    /// `all` or a single metric name.
    pub metric: Option<String>,
    /// Maximum number of rows.
    #[serde(deserialize_with = "string_or_number")]
    pub limit: Option<String>,
}

impl ReportParams {
    /// Copy of the parameters with `userId` and `groupId` dropped.
    ///
    /// Used by reports that do not support entity filters.
    #[must_use]
    pub fn without_entity_filters(&self) -> Self {
        Self {
            user_id: None,
            group_id: None,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

/// One independent condition of a [`ReportFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterClause {
    /// Sale date falls inside the range.
    DateRange(DateRange),
    /// Sale was made by this user.
    User(UserId),
    /// Sale was made by a member of this group.
    Group(GroupId),
}

impl FilterClause {
    /// Evaluates the clause. `is_member` answers group membership questions.
    pub fn matches(&self, sale: &Sale, is_member: &dyn Fn(UserId, GroupId) -> bool) -> bool {
        match self {
            Self::DateRange(range) => range.contains(sale.date),
            Self::User(user) => sale.user_id == *user,
            Self::Group(group) => is_member(sale.user_id, *group),
        }
    }
}

/// Validated report filter: a conjunction of clauses.
///
/// The date range is always present; user and group clauses only when supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    /// Inclusive date window.
    pub range: DateRange,
    /// Optional user restriction.
    pub user_id: Option<UserId>,
    /// Optional group restriction.
    pub group_id: Option<GroupId>,
}

impl ReportFilter {
    /// A filter with only the date clause.
    pub const fn for_range(range: DateRange) -> Self {
        Self {
            range,
            user_id: None,
            group_id: None,
        }
    }

    /// The active clauses, date range first.
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = vec![FilterClause::DateRange(self.range)];
        clauses.extend(self.user_id.map(FilterClause::User));
        clauses.extend(self.group_id.map(FilterClause::Group));
        clauses
    }

    /// Whether `sale` satisfies every clause.
    pub fn matches(&self, sale: &Sale, is_member: &dyn Fn(UserId, GroupId) -> bool) -> bool {
        self.clauses()
            .iter()
            .all(|clause| clause.matches(sale, is_member))
    }

    /// Evaluates only the clauses decidable from the sale row itself.
    ///
    /// The group clause is resolved by the record store when it fetches sales.
    pub fn matches_sale(&self, sale: &Sale) -> bool {
        self.range.contains(sale.date) && self.user_id.map_or(true, |user| sale.user_id == user)
    }
}

/// Output of [`FilterBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltFilter {
    /// The validated filter.
    pub filter: ReportFilter,
    /// Canonical bucket width.
    pub granularity: BucketGranularity,
}

/// Values used when a parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDefaults {
    /// Window start when `startDate` is absent.
    pub start_date: NaiveDate,
    /// Granularity when `interval` is absent or unrecognised.
    pub interval: BucketGranularity,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            interval: BucketGranularity::Month,
        }
    }
}

/// Builds [`ReportFilter`]s from raw parameters.
pub struct FilterBuilder<'a> {
    defaults: FilterDefaults,
    clock: &'a dyn Clock,
}

impl<'a> FilterBuilder<'a> {
    /// Creates a builder. `clock` supplies the end date when none is given.
    pub fn new(defaults: FilterDefaults, clock: &'a dyn Clock) -> Self {
        Self { defaults, clock }
    }

    /// Validates `params`.
    ///
    /// Every malformed field is reported: a single problem yields a
    /// field-tagged validation error, several are joined into one message.
    pub fn build(&self, params: &ReportParams) -> Result<BuiltFilter> {
        let mut problems: Vec<(&'static str, String)> = Vec::new();

        let start = match params.start_date.as_deref() {
            Some(raw) => parse_date(raw).or_else(|| {
                problems.push(("startDate", format!("'{raw}' is not a valid date")));
                None
            }),
            None => Some(self.defaults.start_date),
        };
        let end = match params.end_date.as_deref() {
            Some(raw) => parse_date(raw).or_else(|| {
                problems.push(("endDate", format!("'{raw}' is not a valid date")));
                None
            }),
            None => Some(self.clock.today()),
        };

        let user_id = parse_id(params.user_id.as_deref(), "userId", &mut problems).map(UserId);
        let group_id = parse_id(params.group_id.as_deref(), "groupId", &mut problems).map(GroupId);

        let range = match (start, end) {
            (Some(start), Some(end)) if start > end => {
                problems.push((
                    "startDate",
                    format!("start date {start} is after end date {end}"),
                ));
                None
            }
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        };

        let granularity =
            BucketGranularity::coerce(params.interval.as_deref(), self.defaults.interval);

        match (range, problems.len()) {
            (Some(range), 0) => {
                let filter = ReportFilter {
                    range,
                    user_id,
                    group_id,
                };
                debug!(%range, ?user_id, ?group_id, %granularity, "Built report filter");
                Ok(BuiltFilter {
                    filter,
                    granularity,
                })
            }
            (_, 1) => {
                let (field, message) = problems.remove(0);
                Err(SalesError::validation_field(message, field))
            }
            _ => Err(SalesError::validation(
                problems
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}

/// Parses an optional integer id; non-numeric input is recorded as a problem.
fn parse_id(
    raw: Option<&str>,
    field: &'static str,
    problems: &mut Vec<(&'static str, String)>,
) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            problems.push((field, format!("'{raw}' is not an integer id")));
            None
        }
    }
}
