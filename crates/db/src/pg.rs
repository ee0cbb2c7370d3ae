use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
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

use crate::{
    DbPool,
    models::{DbSession, DbUser},
    repositories::{class, entry, settings, staff, time_slot, timetable, user},
    repository::Repository,
};

/// [`Repository`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn into_all<T, U: From<T>>(rows: Vec<T>) -> Vec<U> {
    rows.into_iter().map(U::from).collect()
}

#[async_trait]
impl Repository for PgRepository {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<DbUser> {
        user::create_user(&self.pool, email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        user::get_user_by_email(&self.pool, email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>> {
        user::get_user_by_id(&self.pool, id).await
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<DbSession> {
        user::create_session(&self.pool, user_id, token, expires_at).await
    }

    async fn find_session(&self, token: &str) -> Result<Option<DbSession>> {
        user::get_session(&self.pool, token).await
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        user::delete_session(&self.pool, token).await
    }

    async fn list_timetables(&self, user_id: Uuid) -> Result<Vec<Timetable>> {
        Ok(into_all(timetable::get_timetables_by_user(&self.pool, user_id).await?))
    }

    async fn get_timetable(&self, user_id: Uuid, id: Uuid) -> Result<Option<Timetable>> {
        Ok(timetable::get_timetable_by_id(&self.pool, user_id, id)
            .await?
            .map(Timetable::from))
    }

    async fn create_timetable(&self, user_id: Uuid, name: &str) -> Result<Timetable> {
        Ok(timetable::create_timetable(&self.pool, user_id, name).await?.into())
    }

    async fn rename_timetable(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Timetable>> {
        Ok(timetable::rename_timetable(&self.pool, user_id, id, name)
            .await?
            .map(Timetable::from))
    }

    async fn delete_timetable(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        timetable::delete_timetable_cascade(&self.pool, user_id, id).await
    }

    async fn list_classes(&self, user_id: Uuid) -> Result<Vec<Class>> {
        Ok(into_all(class::get_classes_by_user(&self.pool, user_id).await?))
    }

    async fn create_class(&self, user_id: Uuid, name: &str) -> Result<Class> {
        Ok(class::create_class(&self.pool, user_id, name).await?.into())
    }

    async fn rename_class(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Class>> {
        Ok(class::rename_class(&self.pool, user_id, id, name)
            .await?
            .map(Class::from))
    }

    async fn delete_class(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        class::delete_class(&self.pool, user_id, id).await
    }

    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<Section>> {
        Ok(into_all(class::get_sections_by_user(&self.pool, user_id).await?))
    }

    async fn create_section(&self, user_id: Uuid, class_id: Uuid, name: &str) -> Result<Option<Section>> {
        Ok(class::create_section(&self.pool, user_id, class_id, name)
            .await?
            .map(Section::from))
    }

    async fn rename_section(
        &self,
        user_id: Uuid,
        class_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Section>> {
        Ok(class::rename_section(&self.pool, user_id, class_id, id, name)
            .await?
            .map(Section::from))
    }

    async fn delete_section(&self, user_id: Uuid, class_id: Uuid, id: Uuid) -> Result<bool> {
        class::delete_section(&self.pool, user_id, class_id, id).await
    }

    async fn list_subjects(&self, user_id: Uuid) -> Result<Vec<Subject>> {
        Ok(into_all(staff::get_subjects_by_user(&self.pool, user_id).await?))
    }

    async fn create_subject(&self, user_id: Uuid, name: &str) -> Result<Subject> {
        Ok(staff::create_subject(&self.pool, user_id, name).await?.into())
    }

    async fn rename_subject(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Subject>> {
        Ok(staff::rename_subject(&self.pool, user_id, id, name)
            .await?
            .map(Subject::from))
    }

    async fn delete_subject(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        staff::delete_subject(&self.pool, user_id, id).await
    }

    async fn list_teachers(&self, user_id: Uuid) -> Result<Vec<Teacher>> {
        Ok(into_all(staff::get_teachers_by_user(&self.pool, user_id).await?))
    }

    async fn create_teacher(&self, user_id: Uuid, name: &str, subject_id: Uuid) -> Result<Teacher> {
        Ok(staff::create_teacher(&self.pool, user_id, name, subject_id)
            .await?
            .into())
    }

    async fn update_teacher(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        subject_id: Uuid,
    ) -> Result<Option<Teacher>> {
        Ok(staff::update_teacher(&self.pool, user_id, id, name, subject_id)
            .await?
            .map(Teacher::from))
    }

    async fn delete_teacher(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        staff::delete_teacher(&self.pool, user_id, id).await
    }

    async fn list_time_slots(&self, user_id: Uuid) -> Result<Vec<TimeSlot>> {
        Ok(into_all(time_slot::get_time_slots_by_user(&self.pool, user_id).await?))
    }

    async fn create_time_slot(
        &self,
        user_id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: bool,
    ) -> Result<TimeSlot> {
        Ok(time_slot::create_time_slot(&self.pool, user_id, start_time, end_time, is_lunch)
            .await?
            .into())
    }

    async fn update_time_slot(
        &self,
        user_id: Uuid,
        id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: Option<bool>,
    ) -> Result<Option<TimeSlot>> {
        Ok(
            time_slot::update_time_slot(&self.pool, user_id, id, start_time, end_time, is_lunch)
                .await?
                .map(TimeSlot::from),
        )
    }

    async fn delete_time_slot(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        time_slot::delete_time_slot(&self.pool, user_id, id).await
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
    ) -> Result<Vec<TimetableEntry>> {
        Ok(into_all(
            entry::get_entries_for_grid(&self.pool, user_id, timetable_id, class_id, section_id).await?,
        ))
    }

    async fn upsert_entries(&self, user_id: Uuid, entries: Vec<NewEntry>) -> Result<Vec<TimetableEntry>> {
        Ok(into_all(entry::upsert_entries(&self.pool, user_id, &entries).await?))
    }

    async fn upsert_entry(&self, user_id: Uuid, new_entry: NewEntry) -> Result<TimetableEntry> {
        Ok(entry::upsert_entry(&self.pool, user_id, &new_entry).await?.into())
    }

    async fn assign_if_free(&self, user_id: Uuid, new_entry: NewEntry) -> Result<Option<TimetableEntry>> {
        Ok(entry::assign_if_free(&self.pool, user_id, &new_entry)
            .await?
            .map(TimetableEntry::from))
    }

    async fn check_teacher_conflict(&self, user_id: Uuid, probe: ConflictProbe) -> Result<bool> {
        entry::check_teacher_conflict(&self.pool, user_id, &probe).await
    }

    async fn count_subject_entries(&self, user_id: Uuid, subject_id: Uuid) -> Result<i64> {
        entry::count_subject_entries(&self.pool, user_id, subject_id).await
    }

    async fn get_settings(&self, user_id: Uuid, timetable_id: Uuid) -> Result<Option<TimetableSettings>> {
        Ok(settings::get_settings(&self.pool, user_id, timetable_id)
            .await?
            .map(TimetableSettings::from))
    }

    async fn create_default_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        defaults: DefaultSettings,
    ) -> Result<TimetableSettings> {
        Ok(
            settings::create_default_settings(&self.pool, user_id, timetable_id, &defaults)
                .await?
                .into(),
        )
    }

    async fn update_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        patch: SettingsPatch,
    ) -> Result<Option<TimetableSettings>> {
        Ok(settings::update_settings(&self.pool, user_id, timetable_id, &patch)
            .await?
            .map(TimetableSettings::from))
    }
}
