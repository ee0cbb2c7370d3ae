use std::sync::Arc;

use pretty_assertions::assert_eq;
use timetable_core::{Session, TimetableError, Weekday, models::time_slot::sort_by_start};
use timetable_db::{
    PgRepository, SharedRepository, create_pool, schema::initialize_database,
    stores::{EntryStore, lifecycle},
};
use uuid::Uuid;

/// Connects to `DATABASE_URL` and makes sure the schema exists.
async fn pg_repo() -> SharedRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a Postgres database");
    let pool = create_pool(&url).await.unwrap();
    // Running it twice checks that schema creation is idempotent.
    initialize_database(&pool).await.unwrap();
    initialize_database(&pool).await.unwrap();
    Arc::new(PgRepository::new(pool))
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres database"]
async fn test_postgres_term_one_lifecycle() {
    let repo = pg_repo().await;
    let email = format!("{}@example.com", Uuid::new_v4());
    let user = repo.create_user(&email, "not-a-real-hash").await.unwrap();
    let session = Session::new(user.id, email);

    let timetable = lifecycle::create_timetable(&repo, &session, "Term 1")
        .await
        .unwrap();

    let section = repo.list_sections(user.id).await.unwrap().remove(0);
    let mut time_slots = repo.list_time_slots(user.id).await.unwrap();
    sort_by_start(&mut time_slots);
    let teachers = repo.list_teachers(user.id).await.unwrap();

    let mut store = EntryStore::new(repo.clone(), session.clone(), timetable.id);
    store.fetch(section.class_id, section.id).await.unwrap();
    assert_eq!(store.entries().len(), 35);
    assert_eq!(store.entries().iter().filter(|e| e.is_assigned()).count(), 1);
    let monday: Vec<Uuid> = store
        .entries()
        .iter()
        .filter(|e| e.day_id == Weekday::Monday.id())
        .map(|e| e.time_slot_id)
        .collect();
    let by_start: Vec<Uuid> = time_slots.iter().map(|slot| slot.id).collect();
    assert_eq!(monday, by_start);

    // Booking the same teacher into a second class at the same cell.
    let class = repo.create_class(user.id, "Class 2").await.unwrap();
    let other = repo
        .create_section(user.id, class.id, "B")
        .await
        .unwrap()
        .unwrap();
    let conflict = store
        .check_conflict(teachers[0].id, class.id, other.id, time_slots[0].id, Weekday::Monday)
        .await
        .unwrap();
    assert!(conflict);

    let result = store
        .assign_teacher_exclusive(
            teachers[0].id,
            teachers[0].subject_id,
            class.id,
            other.id,
            time_slots[0].id,
            Weekday::Monday,
        )
        .await;
    assert!(matches!(result, Err(TimetableError::Conflict(_))));

    lifecycle::delete_timetable(&repo, &session, timetable.id)
        .await
        .unwrap();
    assert!(repo.get_settings(user.id, timetable.id).await.unwrap().is_none());
}
