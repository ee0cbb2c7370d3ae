use std::sync::Arc;

use timetable_core::{
    Session,
    models::{
        class::Section, staff::Teacher, time_slot::{TimeSlot, sort_by_start}, timetable::Timetable,
    },
};
use timetable_db::{MemoryRepository, SharedRepository, stores::lifecycle};
use uuid::Uuid;

pub fn memory_repo() -> SharedRepository {
    Arc::new(MemoryRepository::new())
}

pub fn session() -> Session {
    Session::new(Uuid::new_v4(), "teacher@example.com")
}

/// A user with a freshly created, seeded "Term 1" timetable.
pub struct Seeded {
    pub repo: SharedRepository,
    pub session: Session,
    pub timetable: Timetable,
    pub section: Section,
    pub time_slots: Vec<TimeSlot>,
    pub teachers: Vec<Teacher>,
}

pub async fn seeded() -> Seeded {
    let repo = memory_repo();
    let session = session();
    let timetable = lifecycle::create_timetable(&repo, &session, "Term 1")
        .await
        .unwrap();

    let user_id = session.user_id;
    let section = repo
        .list_sections(user_id)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    let mut time_slots = repo.list_time_slots(user_id).await.unwrap();
    sort_by_start(&mut time_slots);
    let teachers = repo.list_teachers(user_id).await.unwrap();

    Seeded {
        repo,
        session,
        timetable,
        section,
        time_slots,
        teachers,
    }
}

impl Seeded {
    /// Adds another class with one section.
    pub async fn add_class(&self, class_name: &str, section_name: &str) -> Section {
        let class = self
            .repo
            .create_class(self.session.user_id, class_name)
            .await
            .unwrap();
        self.repo
            .create_section(self.session.user_id, class.id, section_name)
            .await
            .unwrap()
            .unwrap()
    }
}
