use pretty_assertions::assert_eq;
use rstest::rstest;
use timetable_core::TimetableError;
use timetable_db::stores::{ReferenceStore, lifecycle};
use uuid::Uuid;

use crate::test_utils::{memory_repo, seeded, session};

#[rstest]
#[case("14:30", "15:30", "2:30 PM", "3:30 PM")]
#[case("9:15 AM", "10:00 AM", "9:15 AM", "10:00 AM")]
#[case("07:45:00", "08:30 am", "7:45 AM", "8:30 AM")]
#[tokio::test]
async fn test_time_slot_times_are_normalized(
    #[case] start: &str,
    #[case] end: &str,
    #[case] expected_start: &str,
    #[case] expected_end: &str,
) {
    let mut store = ReferenceStore::new(memory_repo(), session());

    let slot = store.create_time_slot(start, end, false).await.unwrap();

    assert_eq!(slot.start_time, expected_start);
    assert_eq!(slot.end_time, expected_end);
}

#[tokio::test]
async fn test_invalid_time_is_rejected_before_writing() {
    let repo = memory_repo();
    let session = session();
    let mut store = ReferenceStore::new(repo.clone(), session.clone());

    let result = store.create_time_slot("25:00", "26:00", false).await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
    assert!(repo.list_time_slots(session.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_time_slots_load_in_start_order() {
    let mut store = ReferenceStore::new(memory_repo(), session());
    store.create_time_slot("1:00 PM", "2:00 PM", false).await.unwrap();
    store.create_time_slot("08:00", "09:00", false).await.unwrap();
    store.create_time_slot("10:30", "11:00", true).await.unwrap();

    let starts: Vec<String> = store
        .load_time_slots()
        .await
        .unwrap()
        .iter()
        .map(|s| s.start_time.clone())
        .collect();

    assert_eq!(starts, vec!["8:00 AM", "10:30 AM", "1:00 PM"]);
}

#[tokio::test]
async fn test_update_time_slot_keeps_lunch_flag_when_absent() {
    let mut store = ReferenceStore::new(memory_repo(), session());
    let slot = store.create_time_slot("12:00", "12:30", true).await.unwrap();

    let updated = store
        .update_time_slot(slot.id, "12:15", "12:45", None)
        .await
        .unwrap();

    assert_eq!(updated.start_time, "12:15 PM");
    assert!(updated.is_lunch);
}

#[tokio::test]
async fn test_deleting_time_slot_removes_its_entries() {
    let s = seeded().await;
    let mut store = ReferenceStore::new(s.repo.clone(), s.session.clone());

    store.delete_time_slot(s.time_slots[0].id).await.unwrap();

    let entries = s
        .repo
        .list_entries(s.session.user_id, s.timetable.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 30);
    assert!(entries.iter().all(|e| !e.is_assigned()));
}

#[tokio::test]
async fn test_classes_load_with_sections() {
    let mut store = ReferenceStore::new(memory_repo(), session());
    let class = store.create_class("  Grade 5 ").await.unwrap();
    store.create_section(class.id, "A").await.unwrap();
    store.create_section(class.id, "B").await.unwrap();

    let classes = store.load_classes().await.unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].class.name, "Grade 5");
    let sections: Vec<&str> = classes[0].sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(sections, vec!["A", "B"]);
}

#[tokio::test]
async fn test_blank_class_name_is_rejected() {
    let mut store = ReferenceStore::new(memory_repo(), session());

    let result = store.create_class("   ").await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
}

#[tokio::test]
async fn test_section_for_unknown_class_is_not_found() {
    let mut store = ReferenceStore::new(memory_repo(), session());

    let result = store.create_section(Uuid::new_v4(), "A").await;

    assert!(matches!(result, Err(TimetableError::NotFound(_))));
}

#[tokio::test]
async fn test_deleting_class_removes_sections_and_entries() {
    let s = seeded().await;
    let mut store = ReferenceStore::new(s.repo.clone(), s.session.clone());

    store.delete_class(s.section.class_id).await.unwrap();

    assert!(s.repo.list_sections(s.session.user_id).await.unwrap().is_empty());
    let entries = s
        .repo
        .list_entries(s.session.user_id, s.timetable.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_subject_still_taught_cannot_be_deleted() {
    let s = seeded().await;
    let mut store = ReferenceStore::new(s.repo.clone(), s.session.clone());

    let result = store.delete_subject(s.teachers[0].subject_id).await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
}

#[tokio::test]
async fn test_subject_left_in_cells_cannot_be_deleted() {
    let s = seeded().await;
    let mut store = ReferenceStore::new(s.repo.clone(), s.session.clone());
    let old_subject = s.teachers[0].subject_id;
    let history = store.create_subject("History").await.unwrap();
    store
        .update_teacher(s.teachers[0].id, "Teacher 1", history.id)
        .await
        .unwrap();

    // Monday's first cell still carries the old subject.
    let result = store.delete_subject(old_subject).await;

    match result {
        Err(TimetableError::Validation(message)) => assert!(message.contains("1 timetable cell")),
        other => panic!("expected a validation error, got {:?}", other),
    }
    let subjects = store.load_subjects().await.unwrap();
    assert!(subjects.iter().any(|subject| subject.id == old_subject));

    lifecycle::delete_timetable(&s.repo, &s.session, s.timetable.id)
        .await
        .unwrap();
    store.delete_subject(old_subject).await.unwrap();
}

#[tokio::test]
async fn test_unused_subject_can_be_deleted() {
    let mut store = ReferenceStore::new(memory_repo(), session());
    let subject = store.create_subject("Art").await.unwrap();

    store.delete_subject(subject.id).await.unwrap();

    assert!(store.load_subjects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_teacher_needs_known_subject() {
    let mut store = ReferenceStore::new(memory_repo(), session());

    let result = store.create_teacher("Ms. Lee", Uuid::new_v4()).await;

    assert!(matches!(result, Err(TimetableError::Validation(_))));
}

#[tokio::test]
async fn test_deleting_teacher_unassigns_entries() {
    let s = seeded().await;
    let mut store = ReferenceStore::new(s.repo.clone(), s.session.clone());

    store.delete_teacher(s.teachers[0].id).await.unwrap();

    let entries = s
        .repo
        .list_entries(s.session.user_id, s.timetable.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 35);
    assert!(entries.iter().all(|e| e.teacher_id.is_none() && e.subject_id.is_none()));
}

#[tokio::test]
async fn test_rename_timetable_normalizes_name() {
    let s = seeded().await;
    let store = ReferenceStore::new(s.repo.clone(), s.session.clone());

    let renamed = store.rename_timetable(s.timetable.id, "  Spring  ").await.unwrap();

    assert_eq!(renamed.name, "Spring");
    assert!(renamed.updated_at >= s.timetable.updated_at);
}
