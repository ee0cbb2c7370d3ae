//! In-process [`Repository`] used by tests and by `STORAGE=memory` runs.
//!
//! Mirrors the PostgreSQL schema: upserts on the entry key, the same
//! cascades on delete, and an atomic conflict check for `assign_if_free`
//! (the write lock is held across check and write).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use timetable_core::{
    conflict::{ConflictProbe, has_conflict},
    models::{
        class::{Class, Section},
        entry::{NewEntry, TimetableEntry},
        settings::{DefaultSettings, SettingsPatch, TimetableSettings},
        staff::{Subject, Teacher},
        time_slot::{TimeSlot, sort_by_start},
        timetable::Timetable,
    },
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{DbSession, DbUser},
    repository::Repository,
};

#[derive(Default)]
struct Tables {
    users: Vec<DbUser>,
    sessions: HashMap<String, DbSession>,
    timetables: Vec<Timetable>,
    settings: Vec<TimetableSettings>,
    classes: Vec<Class>,
    sections: Vec<Section>,
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    time_slots: Vec<TimeSlot>,
    entries: Vec<TimetableEntry>,
}

impl Tables {
    fn upsert_entry(&mut self, user_id: Uuid, new_entry: &NewEntry) -> TimetableEntry {
        let key = new_entry.key;
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.user_id == user_id && e.key() == key)
        {
            existing.teacher_id = new_entry.teacher_id();
            existing.subject_id = new_entry.subject_id();
            return existing.clone();
        }

        let entry = TimetableEntry {
            id: Uuid::new_v4(),
            user_id,
            timetable_id: key.timetable_id,
            class_id: key.class_id,
            section_id: key.section_id,
            day_id: key.day_id,
            time_slot_id: key.time_slot_id,
            teacher_id: new_entry.teacher_id(),
            subject_id: new_entry.subject_id(),
        };
        self.entries.push(entry.clone());
        entry
    }

    fn check_entry_refs(&self, user_id: Uuid, new_entry: &NewEntry) -> Result<()> {
        let key = new_entry.key;
        if !(1..=6).contains(&key.day_id) {
            return Err(eyre!("day_id {} violates constraint valid_day", key.day_id));
        }
        if !self
            .timetables
            .iter()
            .any(|t| t.id == key.timetable_id && t.user_id == user_id)
        {
            return Err(eyre!("timetable {} does not exist", key.timetable_id));
        }
        if !self
            .sections
            .iter()
            .any(|s| s.id == key.section_id && s.class_id == key.class_id && s.user_id == user_id)
        {
            return Err(eyre!(
                "section {} of class {} does not exist",
                key.section_id,
                key.class_id
            ));
        }
        if !self
            .time_slots
            .iter()
            .any(|s| s.id == key.time_slot_id && s.user_id == user_id)
        {
            return Err(eyre!("time slot {} does not exist", key.time_slot_id));
        }
        if let Some(assignment) = new_entry.assignment {
            if !self
                .teachers
                .iter()
                .any(|t| t.id == assignment.teacher_id && t.user_id == user_id)
            {
                return Err(eyre!("teacher {} does not exist", assignment.teacher_id));
            }
            if !self
                .subjects
                .iter()
                .any(|s| s.id == assignment.subject_id && s.user_id == user_id)
            {
                return Err(eyre!("subject {} does not exist", assignment.subject_id));
            }
        }
        Ok(())
    }

    fn user_entries(&self, user_id: Uuid) -> impl Iterator<Item = &TimetableEntry> {
        self.entries.iter().filter(move |e| e.user_id == user_id)
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<DbUser> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(eyre!("duplicate key value violates unique constraint users_email_key"));
        }
        let user = DbUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<DbSession> {
        let mut tables = self.tables.write().await;
        let session = DbSession {
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
            expires_at,
        };
        tables.sessions.insert(token.to_string(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> Result<Option<DbSession>> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }

    async fn list_timetables(&self, user_id: Uuid) -> Result<Vec<Timetable>> {
        let tables = self.tables.read().await;
        let mut timetables: Vec<Timetable> = tables
            .timetables
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        timetables.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(timetables)
    }

    async fn get_timetable(&self, user_id: Uuid, id: Uuid) -> Result<Option<Timetable>> {
        let tables = self.tables.read().await;
        Ok(tables
            .timetables
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn create_timetable(&self, user_id: Uuid, name: &str) -> Result<Timetable> {
        let now = Utc::now();
        let timetable = Timetable {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.timetables.push(timetable.clone());
        Ok(timetable)
    }

    async fn rename_timetable(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Timetable>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .timetables
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|t| {
                t.name = name.to_string();
                t.updated_at = Utc::now();
                t.clone()
            }))
    }

    async fn delete_timetable(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables
            .entries
            .retain(|e| !(e.timetable_id == id && e.user_id == user_id));
        tables
            .settings
            .retain(|s| !(s.timetable_id == id && s.user_id == user_id));
        let before = tables.timetables.len();
        tables
            .timetables
            .retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(tables.timetables.len() < before)
    }

    async fn list_classes(&self, user_id: Uuid) -> Result<Vec<Class>> {
        let tables = self.tables.read().await;
        Ok(tables
            .classes
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_class(&self, user_id: Uuid, name: &str) -> Result<Class> {
        let class = Class {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.classes.push(class.clone());
        Ok(class)
    }

    async fn rename_class(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Class>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .classes
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .map(|c| {
                c.name = name.to_string();
                c.clone()
            }))
    }

    async fn delete_class(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.classes.len();
        tables.classes.retain(|c| !(c.id == id && c.user_id == user_id));
        if tables.classes.len() == before {
            return Ok(false);
        }
        tables.sections.retain(|s| s.class_id != id);
        tables.entries.retain(|e| e.class_id != id);
        Ok(true)
    }

    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<Section>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sections
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_section(&self, user_id: Uuid, class_id: Uuid, name: &str) -> Result<Option<Section>> {
        let mut tables = self.tables.write().await;
        if !tables
            .classes
            .iter()
            .any(|c| c.id == class_id && c.user_id == user_id)
        {
            return Ok(None);
        }
        let section = Section {
            id: Uuid::new_v4(),
            user_id,
            class_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.sections.push(section.clone());
        Ok(Some(section))
    }

    async fn rename_section(
        &self,
        user_id: Uuid,
        class_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Section>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .sections
            .iter_mut()
            .find(|s| s.id == id && s.class_id == class_id && s.user_id == user_id)
            .map(|s| {
                s.name = name.to_string();
                s.clone()
            }))
    }

    async fn delete_section(&self, user_id: Uuid, class_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.sections.len();
        tables
            .sections
            .retain(|s| !(s.id == id && s.class_id == class_id && s.user_id == user_id));
        if tables.sections.len() == before {
            return Ok(false);
        }
        tables.entries.retain(|e| e.section_id != id);
        Ok(true)
    }

    async fn list_subjects(&self, user_id: Uuid) -> Result<Vec<Subject>> {
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_subject(&self, user_id: Uuid, name: &str) -> Result<Subject> {
        let subject = Subject {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn rename_subject(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Option<Subject>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .subjects
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id)
            .map(|s| {
                s.name = name.to_string();
                s.clone()
            }))
    }

    async fn delete_subject(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let in_use = tables.teachers.iter().any(|t| t.subject_id == id)
            || tables.entries.iter().any(|e| e.subject_id == Some(id));
        if in_use {
            return Err(eyre!("subject {} is still referenced", id));
        }
        let before = tables.subjects.len();
        tables
            .subjects
            .retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(tables.subjects.len() < before)
    }

    async fn list_teachers(&self, user_id: Uuid) -> Result<Vec<Teacher>> {
        let tables = self.tables.read().await;
        Ok(tables
            .teachers
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_teacher(&self, user_id: Uuid, name: &str, subject_id: Uuid) -> Result<Teacher> {
        let mut tables = self.tables.write().await;
        if !tables.subjects.iter().any(|s| s.id == subject_id) {
            return Err(eyre!("subject {} does not exist", subject_id));
        }
        let teacher = Teacher {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            subject_id,
            created_at: Utc::now(),
        };
        tables.teachers.push(teacher.clone());
        Ok(teacher)
    }

    async fn update_teacher(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        subject_id: Uuid,
    ) -> Result<Option<Teacher>> {
        let mut tables = self.tables.write().await;
        if !tables.subjects.iter().any(|s| s.id == subject_id) {
            return Err(eyre!("subject {} does not exist", subject_id));
        }
        Ok(tables
            .teachers
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|t| {
                t.name = name.to_string();
                t.subject_id = subject_id;
                t.clone()
            }))
    }

    async fn delete_teacher(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.teachers.len();
        tables
            .teachers
            .retain(|t| !(t.id == id && t.user_id == user_id));
        if tables.teachers.len() == before {
            return Ok(false);
        }
        for entry in tables
            .entries
            .iter_mut()
            .filter(|e| e.teacher_id == Some(id))
        {
            entry.teacher_id = None;
            entry.subject_id = None;
        }
        Ok(true)
    }

    async fn list_time_slots(&self, user_id: Uuid) -> Result<Vec<TimeSlot>> {
        let tables = self.tables.read().await;
        Ok(tables
            .time_slots
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_time_slot(
        &self,
        user_id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: bool,
    ) -> Result<TimeSlot> {
        let slot = TimeSlot {
            id: Uuid::new_v4(),
            user_id,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            is_lunch,
            created_at: Utc::now(),
        };
        self.tables.write().await.time_slots.push(slot.clone());
        Ok(slot)
    }

    async fn update_time_slot(
        &self,
        user_id: Uuid,
        id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: Option<bool>,
    ) -> Result<Option<TimeSlot>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .time_slots
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id)
            .map(|s| {
                s.start_time = start_time.to_string();
                s.end_time = end_time.to_string();
                if let Some(is_lunch) = is_lunch {
                    s.is_lunch = is_lunch;
                }
                s.clone()
            }))
    }

    async fn delete_time_slot(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.time_slots.len();
        tables
            .time_slots
            .retain(|s| !(s.id == id && s.user_id == user_id));
        if tables.time_slots.len() == before {
            return Ok(false);
        }
        tables.entries.retain(|e| e.time_slot_id != id);
        for settings in tables.settings.iter_mut().filter(|s| s.user_id == user_id) {
            settings.lunch_slot_ids.retain(|&slot_id| slot_id != id);
        }
        Ok(true)
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
    ) -> Result<Vec<TimetableEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<TimetableEntry> = tables
            .user_entries(user_id)
            .filter(|e| {
                e.timetable_id == timetable_id && e.class_id == class_id && e.section_id == section_id
            })
            .cloned()
            .collect();
        let mut slots: Vec<TimeSlot> = tables
            .time_slots
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        sort_by_start(&mut slots);
        let position: HashMap<Uuid, usize> =
            slots.iter().enumerate().map(|(i, slot)| (slot.id, i)).collect();
        entries.sort_by_key(|e| {
            let slot = position.get(&e.time_slot_id).copied().unwrap_or(usize::MAX);
            (e.day_id, slot)
        });
        Ok(entries)
    }

    async fn upsert_entries(&self, user_id: Uuid, entries: Vec<NewEntry>) -> Result<Vec<TimetableEntry>> {
        let mut tables = self.tables.write().await;
        for entry in &entries {
            tables.check_entry_refs(user_id, entry)?;
        }
        Ok(entries
            .iter()
            .map(|entry| tables.upsert_entry(user_id, entry))
            .collect())
    }

    async fn upsert_entry(&self, user_id: Uuid, entry: NewEntry) -> Result<TimetableEntry> {
        let mut tables = self.tables.write().await;
        tables.check_entry_refs(user_id, &entry)?;
        Ok(tables.upsert_entry(user_id, &entry))
    }

    async fn assign_if_free(&self, user_id: Uuid, entry: NewEntry) -> Result<Option<TimetableEntry>> {
        let assignment = entry
            .assignment
            .ok_or_else(|| eyre!("assign_if_free requires a teacher and subject"))?;
        let mut tables = self.tables.write().await;
        tables.check_entry_refs(user_id, &entry)?;

        let probe = ConflictProbe {
            timetable_id: entry.key.timetable_id,
            teacher_id: assignment.teacher_id,
            class_id: entry.key.class_id,
            section_id: entry.key.section_id,
            time_slot_id: entry.key.time_slot_id,
            day_id: entry.key.day_id,
        };
        if has_conflict(&probe, tables.user_entries(user_id)) {
            return Ok(None);
        }
        Ok(Some(tables.upsert_entry(user_id, &entry)))
    }

    async fn check_teacher_conflict(&self, user_id: Uuid, probe: ConflictProbe) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(has_conflict(&probe, tables.user_entries(user_id)))
    }

    async fn count_subject_entries(&self, user_id: Uuid, subject_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .user_entries(user_id)
            .filter(|e| e.subject_id == Some(subject_id))
            .count();
        Ok(count as i64)
    }

    async fn get_settings(&self, user_id: Uuid, timetable_id: Uuid) -> Result<Option<TimetableSettings>> {
        let tables = self.tables.read().await;
        Ok(tables
            .settings
            .iter()
            .find(|s| s.timetable_id == timetable_id && s.user_id == user_id)
            .cloned())
    }

    async fn create_default_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        defaults: DefaultSettings,
    ) -> Result<TimetableSettings> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .settings
            .iter()
            .find(|s| s.timetable_id == timetable_id && s.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        if !tables
            .timetables
            .iter()
            .any(|t| t.id == timetable_id && t.user_id == user_id)
        {
            return Err(eyre!("timetable {} does not exist", timetable_id));
        }

        let now = Utc::now();
        let settings = TimetableSettings {
            id: Uuid::new_v4(),
            timetable_id,
            user_id,
            enabled_days: defaults.enabled_days,
            max_lunch_slots: defaults.max_lunch_slots,
            lunch_slot_ids: defaults.lunch_slot_ids,
            created_at: now,
            updated_at: now,
        };
        tables.settings.push(settings.clone());
        Ok(settings)
    }

    async fn update_settings(
        &self,
        user_id: Uuid,
        timetable_id: Uuid,
        patch: SettingsPatch,
    ) -> Result<Option<TimetableSettings>> {
        if let Some(max) = patch.max_lunch_slots {
            if max < 0 {
                return Err(eyre!("max_lunch_slots violates constraint non_negative_max_lunch"));
            }
        }
        let mut tables = self.tables.write().await;
        Ok(tables
            .settings
            .iter_mut()
            .find(|s| s.timetable_id == timetable_id && s.user_id == user_id)
            .map(|s| {
                if let Some(days) = patch.enabled_days {
                    s.enabled_days = days;
                }
                if let Some(max) = patch.max_lunch_slots {
                    s.max_lunch_slots = max;
                }
                if let Some(ids) = patch.lunch_slot_ids {
                    s.lunch_slot_ids = ids;
                }
                s.updated_at = Utc::now();
                s.clone()
            }))
    }
}
