use std::sync::Arc;

use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;
use timetable_core::{TimetableError, Weekday, models::settings::TimetableSettings};
use timetable_db::{repository::MockRepository, stores::SettingsStore};
use uuid::Uuid;

use crate::test_utils::{memory_repo, seeded, session};

#[tokio::test]
async fn test_fetch_or_create_returns_seeded_defaults() {
    let s = seeded().await;
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);

    let settings = store.fetch_or_create().await.unwrap().clone();

    assert_eq!(settings.enabled_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(settings.max_lunch_slots, 1);
    assert!(settings.lunch_slot_ids.is_empty());

    let again = store.fetch_or_create().await.unwrap();
    assert_eq!(again.id, settings.id);
}

#[tokio::test]
async fn test_fetch_or_create_creates_missing_row() {
    let repo = memory_repo();
    let session = session();
    let timetable = repo
        .create_timetable(session.user_id, "Bare")
        .await
        .unwrap();
    let mut store = SettingsStore::new(repo.clone(), session.clone(), timetable.id);
    assert_eq!(store.enabled_days(), Weekday::WEEKDAYS.to_vec());

    store.fetch_or_create().await.unwrap();

    let stored = repo
        .get_settings(session.user_id, timetable.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.settings(), Some(&stored));
}

#[tokio::test]
async fn test_update_enabled_days_sorts_and_dedups() {
    let s = seeded().await;
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);

    store.update_enabled_days(&[6, 1, 6]).await.unwrap();

    assert_eq!(store.enabled_days(), vec![Weekday::Monday, Weekday::Saturday]);
}

#[rstest]
#[case::empty(&[])]
#[case::sunday(&[0])]
#[case::out_of_range(&[1, 7])]
#[tokio::test]
async fn test_update_enabled_days_rejects_invalid_sets(#[case] days: &[i16]) {
    let s = seeded().await;
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);
    store.fetch_or_create().await.unwrap();

    let result = store.update_enabled_days(days).await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
    assert_eq!(store.enabled_days(), Weekday::WEEKDAYS.to_vec());
}

#[tokio::test]
async fn test_update_max_lunch_slots() {
    let s = seeded().await;
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);

    store.update_max_lunch_slots(2).await.unwrap();
    assert_eq!(store.max_lunch_slots(), 2);

    let result = store.update_max_lunch_slots(-1).await;
    assert!(matches!(result, Err(TimetableError::Validation(_))));
    assert_eq!(store.max_lunch_slots(), 2);
}

#[tokio::test]
async fn test_max_lunch_slots_cannot_drop_below_marked_slots() {
    let s = seeded().await;
    let (a, b) = (s.time_slots[3].id, s.time_slots[4].id);
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);
    store.update_max_lunch_slots(2).await.unwrap();
    store.update_lunch_slot_ids(vec![a, b]).await.unwrap();

    let result = store.update_max_lunch_slots(1).await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
    let stored = s
        .repo
        .get_settings(s.session.user_id, s.timetable.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.max_lunch_slots, 2);
    assert_eq!(stored.lunch_slot_ids, vec![a, b]);

    store.toggle_lunch_slot(a, false).await.unwrap();
    store.update_max_lunch_slots(1).await.unwrap();
    assert_eq!(store.max_lunch_slots(), 1);
}

#[tokio::test]
async fn test_toggle_lunch_slot_adds_once_and_removes() {
    let s = seeded().await;
    let slot = s.time_slots[4].id;
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);

    store.toggle_lunch_slot(slot, true).await.unwrap();
    store.toggle_lunch_slot(slot, true).await.unwrap();
    assert_eq!(store.lunch_slot_ids(), &[slot]);

    store.toggle_lunch_slot(slot, false).await.unwrap();
    assert!(store.lunch_slot_ids().is_empty());
}

#[tokio::test]
async fn test_update_lunch_slot_ids_drops_duplicates() {
    let s = seeded().await;
    let (a, b) = (s.time_slots[3].id, s.time_slots[4].id);
    let mut store = SettingsStore::new(s.repo.clone(), s.session.clone(), s.timetable.id);

    store.update_lunch_slot_ids(vec![a, b, a]).await.unwrap();

    assert_eq!(store.lunch_slot_ids(), &[a, b]);
}

#[test_log::test(tokio::test)]
async fn test_failed_update_leaves_settings_unchanged() {
    let session = session();
    let timetable_id = Uuid::new_v4();
    let now = Utc::now();
    let current = TimetableSettings {
        id: Uuid::new_v4(),
        timetable_id,
        user_id: session.user_id,
        enabled_days: vec![1, 2, 3, 4, 5],
        max_lunch_slots: 1,
        lunch_slot_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let mut mock = MockRepository::new();
    let found = current.clone();
    mock.expect_get_settings()
        .times(1)
        .returning(move |_, _| Ok(Some(found.clone())));
    mock.expect_update_settings()
        .times(1)
        .returning(|_, _, _| Err(eyre::eyre!("statement timeout")));

    let mut store = SettingsStore::new(Arc::new(mock), session, timetable_id);
    let result = store.update_max_lunch_slots(3).await;

    assert!(matches!(result, Err(TimetableError::Database(_))));
    assert_eq!(store.settings(), Some(&current));
}
