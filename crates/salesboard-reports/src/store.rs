//! Read interface to the record store and an in-memory implementation.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use salesboard_common::{
    DateRange, Dataset, GroupActivity, GroupId, Result, Sale, SalesError, UserActivity, UserId,
};
use salesboard_engine::ReportFilter;

/// The reads the report engine needs from the record store.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Sales within `range`, optionally restricted to one user and/or to
    /// members of one group.
    async fn fetch_sales(
        &self,
        range: &DateRange,
        user_id: Option<UserId>,
        group_id: Option<GroupId>,
    ) -> Result<Vec<Sale>>;

    /// Every user with their in-range sales and their group names.
    async fn fetch_users_with_sales_and_groups(&self, range: &DateRange)
        -> Result<Vec<UserActivity>>;

    /// Every group with its member count and its members' in-range sales.
    async fn fetch_groups_with_members_and_sales(
        &self,
        range: &DateRange,
    ) -> Result<Vec<GroupActivity>>;
}

/// Serves reads from a [`Dataset`] snapshot held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    dataset: Dataset,
    memberships: HashSet<(UserId, GroupId)>,
}

impl InMemoryStore {
    /// Wraps a snapshot.
    pub fn new(dataset: Dataset) -> Self {
        let memberships = dataset
            .memberships
            .iter()
            .map(|m| (m.user_id, m.group_id))
            .collect();
        Self {
            dataset,
            memberships,
        }
    }

    /// Loads a JSON snapshot from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SalesError::data_access_with_source(format!("Failed to read {}", path.display()), e)
        })?;
        let dataset: Dataset = serde_json::from_str(&raw)?;
        let negative = dataset
            .sales
            .iter()
            .find(|sale| sale.amount.is_sign_negative() && !sale.amount.is_zero());
        if let Some(sale) = negative {
            return Err(SalesError::data_access(format!(
                "sale {} in {} has negative amount {}",
                sale.id,
                path.display(),
                sale.amount
            )));
        }
        info!(
            path = %path.display(),
            users = dataset.users.len(),
            groups = dataset.groups.len(),
            sales = dataset.sales.len(),
            "Loaded dataset snapshot"
        );
        Ok(Self::new(dataset))
    }

    /// The underlying snapshot.
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn is_member(&self, user: UserId, group: GroupId) -> bool {
        self.memberships.contains(&(user, group))
    }

    fn sales_in<'a>(&'a self, range: &'a DateRange) -> impl Iterator<Item = &'a Sale> + 'a {
        self.dataset
            .sales
            .iter()
            .filter(move |sale| range.contains(sale.date))
    }
}

#[async_trait]
impl SalesStore for InMemoryStore {
    async fn fetch_sales(
        &self,
        range: &DateRange,
        user_id: Option<UserId>,
        group_id: Option<GroupId>,
    ) -> Result<Vec<Sale>> {
        let filter = ReportFilter {
            range: *range,
            user_id,
            group_id,
        };
        let is_member = |user, group| self.is_member(user, group);
        let sales: Vec<Sale> = self
            .dataset
            .sales
            .iter()
            .filter(|sale| filter.matches(sale, &is_member))
            .cloned()
            .collect();
        debug!(count = sales.len(), "Fetched sales");
        Ok(sales)
    }

    async fn fetch_users_with_sales_and_groups(
        &self,
        range: &DateRange,
    ) -> Result<Vec<UserActivity>> {
        let group_names: HashMap<GroupId, &str> = self
            .dataset
            .groups
            .iter()
            .map(|group| (group.id, group.name.as_str()))
            .collect();

        let mut sales_by_user: HashMap<UserId, Vec<Sale>> = HashMap::new();
        for sale in self.sales_in(range) {
            sales_by_user.entry(sale.user_id).or_default().push(sale.clone());
        }

        let mut users: Vec<UserActivity> = self
            .dataset
            .users
            .iter()
            .map(|user| UserActivity {
                user: user.clone(),
                sales: sales_by_user.remove(&user.id).unwrap_or_default(),
                group_names: self
                    .dataset
                    .memberships
                    .iter()
                    .filter(|m| m.user_id == user.id)
                    .map(|m| group_names.get(&m.group_id).map(|name| (*name).to_string()))
                    .collect(),
            })
            .collect();
        users.sort_by_key(|activity| activity.user.id);
        Ok(users)
    }

    async fn fetch_groups_with_members_and_sales(
        &self,
        range: &DateRange,
    ) -> Result<Vec<GroupActivity>> {
        let mut groups: Vec<GroupActivity> = self
            .dataset
            .groups
            .iter()
            .map(|group| {
                let members: BTreeSet<UserId> = self
                    .dataset
                    .memberships
                    .iter()
                    .filter(|m| m.group_id == group.id)
                    .map(|m| m.user_id)
                    .collect();
                GroupActivity {
                    group: group.clone(),
                    member_count: members.len() as u64,
                    sales: self
                        .sales_in(range)
                        .filter(|sale| members.contains(&sale.user_id))
                        .cloned()
                        .collect(),
                }
            })
            .collect();
        groups.sort_by_key(|activity| activity.group.id);
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_common::test_utils::{date, sample_dataset, DatasetBuilder, money};

    fn all_of_2024() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sales_by_group_uses_membership() {
        let store = InMemoryStore::new(sample_dataset());

        let south = store
            .fetch_sales(&all_of_2024(), None, Some(GroupId(2)))
            .await
            .unwrap();
        assert_eq!(south.len(), 2);
        assert!(south.iter().all(|sale| sale.user_id == UserId(2)));

        let alice_in_south = store
            .fetch_sales(&all_of_2024(), Some(UserId(1)), Some(GroupId(2)))
            .await
            .unwrap();
        assert!(alice_in_south.is_empty());
    }

    #[tokio::test]
    async fn test_users_include_dangling_group_names() {
        let dataset = DatasetBuilder::new()
            .user(1, "Alice", "manager")
            .group(1, "North")
            .member(1, 1)
            .member(1, 99)
            .sale(1, money(10), date(2023, 6, 1))
            .build();
        let store = InMemoryStore::new(dataset);

        let users = store
            .fetch_users_with_sales_and_groups(&all_of_2024())
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].sales.is_empty());
        assert_eq!(users[0].group_names, vec![Some("North".to_string()), None]);
    }

    #[tokio::test]
    async fn test_groups_count_distinct_members() {
        let store = InMemoryStore::new(sample_dataset());
        let groups = store
            .fetch_groups_with_members_and_sales(&all_of_2024())
            .await
            .unwrap();

        let counts: Vec<(i64, u64, usize)> = groups
            .iter()
            .map(|g| (g.group.id.0, g.member_count, g.sales.len()))
            .collect();
        assert_eq!(counts, vec![(1, 2, 4), (2, 2, 2), (3, 0, 0)]);
    }

    #[test]
    fn test_load_json_snapshot() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(&sample_dataset()).unwrap()).unwrap();

        let store = InMemoryStore::load_json(file.path()).unwrap();
        assert_eq!(store.dataset(), &sample_dataset());

        assert!(InMemoryStore::load_json("/no/such/snapshot.json").is_err());
    }

    #[test]
    fn test_load_json_rejects_negative_amount() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let dataset = DatasetBuilder::new()
            .user(1, "Alice", "manager")
            .sale(1, money(25), date(2024, 1, 2))
            .sale(1, money(-5), date(2024, 1, 3))
            .build();
        std::fs::write(file.path(), serde_json::to_string(&dataset).unwrap()).unwrap();

        let err = InMemoryStore::load_json(file.path()).unwrap_err();
        assert!(matches!(err, SalesError::DataAccess { .. }));
        assert!(err.to_string().contains("sale 2"));
    }
}
