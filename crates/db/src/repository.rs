//! The query interface the stores are written against.
//!
//! [`PgRepository`](crate::pg::PgRepository) talks to PostgreSQL,
//! [`MemoryRepository`](crate::memory::MemoryRepository) keeps everything in
//! process. Every method is scoped by the owning user's id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use mockall::automock;
use timetable_core::{
    conflict::ConflictProbe,
    models::{
        class::{Class, Section},
        entry::{NewEntry, TimetableEntry},
        settings::{DefaultSettings, SettingsPatch, TimetableSettings},
        staff::{Subject, Teacher},
        time_slot::TimeSlot,
        timetable::Timetable,
    },
};
use uuid::Uuid;

use crate::models::{DbSession, DbUser};

#[automock]
#[async_trait]
pub trait Repository: Send + Sync {
    // Users and sessions
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<DbUser>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>>;
    async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<DbSession>;
    async fn find_session(&self, token: &str) -> Result<Option<DbSession>>;
    async fn delete_session(&self, token: &str) -> Result<()>;

    // Timetables
    async fn list_timetables(&self, user_id: Uuid) -> Result<Vec<Timetable>>;
    async fn get_timetable(&self, user_id: Uuid, id: Uuid) -> Result<Option<Timetable>>;
    async fn create_timetable(&self, user_id: Uuid, name: &str) -> Result<Timetable>;
    async fn rename_timetable(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Timetable>>;
    /// Removes the timetable's entries and settings, then the timetable.
    async fn delete_timetable(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // Classes and sections
    async fn list_classes(&self, user_id: Uuid) -> Result<Vec<Class>>;
    async fn create_class(&self, user_id: Uuid, name: &str) -> Result<Class>;
    async fn rename_class(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Class>>;
    async fn delete_class(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<Section>>;
    async fn create_section(&self, user_id: Uuid, class_id: Uuid, name: &str) -> Result<Option<Section>>;
    async fn rename_section(
        &self,
        user_id: Uuid,
        class_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Section>>;
    async fn delete_section(&self, user_id: Uuid, class_id: Uuid, id: Uuid) -> Result<bool>;

    // Subjects and teachers
    async fn list_subjects(&self, user_id: Uuid) -> Result<Vec<Subject>>;
    async fn create_subject(&self, user_id: Uuid, name: &str) -> Result<Subject>;
    async fn rename_subject(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Subject>>;
    async fn delete_subject(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
    async fn list_teachers(&self, user_id: Uuid) -> Result<Vec<Teacher>>;
    async fn create_teacher(&self, user_id: Uuid, name: &str, subject_id: Uuid) -> Result<Teacher>;
    async fn update_teacher(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        subject_id: Uuid,
    ) -> Result<Option<Teacher>>;
    /// Unassigns every entry holding the teacher, then deletes the teacher.
    async fn delete_teacher(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // Time slots
    async fn list_time_slots(&self, user_id: Uuid) -> Result<Vec<TimeSlot>>;
    async fn create_time_slot(
        &self,
        user_id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: bool,
    ) -> Result<TimeSlot>;
    async fn update_time_slot(
        &self,
        user_id: Uuid,
        id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: Option<bool>,
    ) -> Result<Option<TimeSlot>>;
    /// Deletes the slot with its entries and drops it from every lunch set.
    async fn delete_time_slot(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // Timetable entries
    /// Ordered by day, then by the start time of the slot.
    async fn list_entries(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
    ) -> Result<Vec<TimetableEntry>>;
    /// Batch upsert on the cell key; all rows are written or none.
    async fn upsert_entries(&self, user_id: Uuid, entries: Vec<NewEntry>) -> Result<Vec<TimetableEntry>>;
    async fn upsert_entry(&self, user_id: Uuid, entry: NewEntry) -> Result<TimetableEntry>;
    /// Atomic conflict check plus upsert; `None` when the teacher is booked elsewhere.
    async fn assign_if_free(&self, user_id: Uuid, entry: NewEntry) -> Result<Option<TimetableEntry>>;
    async fn check_teacher_conflict(&self, user_id: Uuid, probe: ConflictProbe) -> Result<bool>;
    /// Cells in any of the user's timetables that still carry the subject.
    async fn count_subject_entries(&self, user_id: Uuid, subject_id: Uuid) -> Result<i64>;

    // Settings
    async fn get_settings(&self, user_id: Uuid, timetable_id: Uuid) -> Result<Option<TimetableSettings>>;
    /// Creates the default row, or returns the existing one untouched.
    async fn create_default_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        defaults: DefaultSettings,
    ) -> Result<TimetableSettings>;
    async fn update_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        patch: SettingsPatch,
    ) -> Result<Option<TimetableSettings>>;
}
