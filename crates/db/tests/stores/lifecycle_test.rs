use std::sync::Arc;

use chrono::Utc;
use pretty_assertions::assert_eq;
use timetable_core::{
    TimetableError,
    models::{
        time_slot::sort_by_start,
        timetable::{Timetable, UNTITLED_TIMETABLE},
    },
};
use timetable_db::{repository::MockRepository, stores::lifecycle};
use uuid::Uuid;

use crate::test_utils::{memory_repo, seeded, session};

#[tokio::test]
async fn test_create_timetable_seeds_term_one() {
    let s = seeded().await;
    let user_id = s.session.user_id;

    assert_eq!(s.timetable.name, "Term 1");

    let classes = s.repo.list_classes(user_id).await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "Class 1");
    assert_eq!(s.section.name, "A");
    assert_eq!(s.section.class_id, classes[0].id);

    let subjects = s.repo.list_subjects(user_id).await.unwrap();
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Mathematics", "English", "Science"]);
    assert_eq!(s.teachers.len(), 3);
    assert_eq!(s.time_slots.len(), 7);
    assert_eq!(s.time_slots[0].start_time, "8:00 AM");
    assert_eq!(s.time_slots[6].end_time, "3:00 PM");

    let entries = s
        .repo
        .list_entries(user_id, s.timetable.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 35);

    let assigned: Vec<_> = entries.iter().filter(|e| e.is_assigned()).collect();
    assert_eq!(assigned.len(), 1);
    assert_eq!(entries.iter().filter(|e| !e.is_assigned()).count(), 34);

    let first = assigned[0];
    assert_eq!(first.day_id, 1);
    assert_eq!(first.time_slot_id, s.time_slots[0].id);
    assert_eq!(first.teacher_id, Some(s.teachers[0].id));
    assert_eq!(first.subject_id, Some(s.teachers[0].subject_id));
    assert_eq!(s.teachers[0].subject_id, subjects[0].id);

    let settings = s
        .repo
        .get_settings(user_id, s.timetable.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settings.enabled_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(settings.max_lunch_slots, 1);
    assert!(settings.lunch_slot_ids.is_empty());
}

#[tokio::test]
async fn test_second_timetable_does_not_duplicate_seed_data() {
    let s = seeded().await;
    let user_id = s.session.user_id;

    let second = lifecycle::create_timetable(&s.repo, &s.session, "Term 2")
        .await
        .unwrap();

    assert_eq!(s.repo.list_classes(user_id).await.unwrap().len(), 1);
    assert_eq!(s.repo.list_subjects(user_id).await.unwrap().len(), 3);
    assert_eq!(s.repo.list_teachers(user_id).await.unwrap().len(), 3);
    assert_eq!(s.repo.list_time_slots(user_id).await.unwrap().len(), 7);

    let entries = s
        .repo
        .list_entries(user_id, second.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 35);
    assert!(entries.iter().all(|e| e.timetable_id == second.id));
}

#[tokio::test]
async fn test_blank_name_becomes_untitled() {
    let repo = memory_repo();
    let session = session();

    let timetable = lifecycle::create_timetable(&repo, &session, "   ")
        .await
        .unwrap();

    assert_eq!(timetable.name, UNTITLED_TIMETABLE);
}

#[tokio::test]
async fn test_delete_timetable_leaves_no_orphans() {
    let s = seeded().await;
    let user_id = s.session.user_id;
    let keep = lifecycle::create_timetable(&s.repo, &s.session, "Keep")
        .await
        .unwrap();

    lifecycle::delete_timetable(&s.repo, &s.session, s.timetable.id)
        .await
        .unwrap();

    assert!(s.repo.get_timetable(user_id, s.timetable.id).await.unwrap().is_none());
    assert!(s.repo.get_settings(user_id, s.timetable.id).await.unwrap().is_none());
    let orphans = s
        .repo
        .list_entries(user_id, s.timetable.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert!(orphans.is_empty());

    let kept = s
        .repo
        .list_entries(user_id, keep.id, s.section.class_id, s.section.id)
        .await
        .unwrap();
    assert_eq!(kept.len(), 35);
}

#[tokio::test]
async fn test_delete_unknown_timetable_is_not_found() {
    let s = seeded().await;
    lifecycle::delete_timetable(&s.repo, &s.session, s.timetable.id)
        .await
        .unwrap();

    let result = lifecycle::delete_timetable(&s.repo, &s.session, s.timetable.id).await;

    assert!(matches!(result, Err(TimetableError::NotFound(_))));
}

#[tokio::test]
async fn test_timetables_are_scoped_by_user() {
    let s = seeded().await;
    let stranger = session();

    let result = lifecycle::delete_timetable(&s.repo, &stranger, s.timetable.id).await;

    assert!(matches!(result, Err(TimetableError::NotFound(_))));
    assert!(
        s.repo
            .list_timetables(stranger.user_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_first_assignment_skips_lunch_slots() {
    let repo = memory_repo();
    let session = session();
    let user_id = session.user_id;
    let breakfast = repo
        .create_time_slot(user_id, "7:00 AM", "8:00 AM", true)
        .await
        .unwrap();

    let timetable = lifecycle::create_timetable(&repo, &session, "Term 1")
        .await
        .unwrap();

    let section = repo.list_sections(user_id).await.unwrap().remove(0);
    let mut slots = repo.list_time_slots(user_id).await.unwrap();
    sort_by_start(&mut slots);
    assert_eq!(slots[0].id, breakfast.id);

    let entries = repo
        .list_entries(user_id, timetable.id, section.class_id, section.id)
        .await
        .unwrap();
    let assigned: Vec<_> = entries.iter().filter(|e| e.is_assigned()).collect();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].day_id, 1);
    assert_eq!(assigned[0].time_slot_id, slots[1].id);
    assert!(
        entries
            .iter()
            .filter(|e| e.time_slot_id == breakfast.id)
            .all(|e| !e.is_assigned())
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_seeding_removes_the_new_timetable() {
    let session = session();
    let timetable = Timetable {
        id: Uuid::new_v4(),
        user_id: session.user_id,
        name: "Term 1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let timetable_id = timetable.id;

    let mut mock = MockRepository::new();
    mock.expect_create_timetable()
        .times(1)
        .returning(move |_, _| Ok(timetable.clone()));
    mock.expect_list_classes()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection reset")));
    mock.expect_delete_timetable()
        .withf(move |_, id| *id == timetable_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let repo: timetable_db::SharedRepository = Arc::new(mock);
    let result = lifecycle::create_timetable(&repo, &session, "Term 1").await;

    assert!(matches!(result, Err(TimetableError::Database(_))));
}
