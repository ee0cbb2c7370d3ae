use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetable_core::models::{
    class::{Class, Section},
    entry::TimetableEntry,
    settings::TimetableSettings,
    staff::{Subject, Teacher},
    time_slot::TimeSlot,
    timetable::Timetable,
    user::User,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetable {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetableSettings {
    pub id: Uuid,
    pub timetable_id: Uuid,
    pub user_id: Uuid,
    pub enabled_days: Vec<i16>,
    pub max_lunch_slots: i32,
    pub lunch_slot_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClass {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub is_lunch: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetableEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timetable_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub day_id: i16,
    pub time_slot_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

impl From<DbTimetable> for Timetable {
    fn from(row: DbTimetable) -> Self {
        Timetable {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbTimetableSettings> for TimetableSettings {
    fn from(row: DbTimetableSettings) -> Self {
        TimetableSettings {
            id: row.id,
            timetable_id: row.timetable_id,
            user_id: row.user_id,
            enabled_days: row.enabled_days,
            max_lunch_slots: row.max_lunch_slots,
            lunch_slot_ids: row.lunch_slot_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbClass> for Class {
    fn from(row: DbClass) -> Self {
        Class {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbSection> for Section {
    fn from(row: DbSection) -> Self {
        Section {
            id: row.id,
            user_id: row.user_id,
            class_id: row.class_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbSubject> for Subject {
    fn from(row: DbSubject) -> Self {
        Subject {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbTeacher> for Teacher {
    fn from(row: DbTeacher) -> Self {
        Teacher {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            subject_id: row.subject_id,
            created_at: row.created_at,
        }
    }
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_lunch: row.is_lunch,
            created_at: row.created_at,
        }
    }
}

impl From<DbTimetableEntry> for TimetableEntry {
    fn from(row: DbTimetableEntry) -> Self {
        TimetableEntry {
            id: row.id,
            user_id: row.user_id,
            timetable_id: row.timetable_id,
            class_id: row.class_id,
            section_id: row.section_id,
            day_id: row.day_id,
            time_slot_id: row.time_slot_id,
            teacher_id: row.teacher_id,
            subject_id: row.subject_id,
        }
    }
}
