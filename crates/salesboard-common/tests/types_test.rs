//! Tests for the record-store entity types in salesboard-common.

use chrono::NaiveDate;
use mockall::mock;
use std::collections::HashMap;
use salesboard_common::*;

mock! {
    pub Calendar {}
    impl Clock for Calendar {
        fn today(&self) -> NaiveDate;
    }
}

#[test]
fn test_ids_display_and_hash() {
    let user = UserId(42);
    assert_eq!(user.to_string(), "42");
    assert_eq!(format!("{:?}", user), "UserId(42)");

    let mut by_group = HashMap::new();
    by_group.insert(GroupId(7), "North");
    assert_eq!(by_group.get(&GroupId(7)), Some(&"North"));
}

#[test]
fn test_ids_serialize_transparently() {
    assert_eq!(serde_json::to_string(&UserId(5)).unwrap(), "5");
    let group: GroupId = serde_json::from_str("9").unwrap();
    assert_eq!(group, GroupId(9));
}

#[test]
fn test_dataset_deserializes_with_missing_sections() {
    let json = r#"{
        "users": [{"id": 1, "name": "Alice", "role": "manager"}],
        "memberships": [{"userId": 1, "groupId": 2}]
    }"#;
    let dataset: Dataset = serde_json::from_str(json).unwrap();
    assert_eq!(dataset.users.len(), 1);
    assert!(dataset.groups.is_empty());
    assert!(dataset.sales.is_empty());
    assert_eq!(dataset.memberships[0].group_id, GroupId(2));
}

#[test]
fn test_clock_can_be_mocked() {
    let pinned = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let mut clock = MockCalendar::new();
    clock.expect_today().times(1).return_const(pinned);

    let clock: &dyn Clock = &clock;
    assert_eq!(clock.today(), pinned);
}

#[test]
fn test_date_range_display() {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
    let range = DateRange::new(start, end).unwrap();
    assert_eq!(range.to_string(), "2021-01-01..=2021-12-31");
    assert_eq!(range.start(), start);
    assert_eq!(range.end(), end);
}
