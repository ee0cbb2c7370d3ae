use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::TimeSlot;
use crate::day::Weekday;

/// One cell of a timetable grid.
///
/// `teacher_id` and `subject_id` are either both set or both empty; use
/// [`TimetableEntry::assignment`] to read them as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
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

impl TimetableEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            timetable_id: self.timetable_id,
            class_id: self.class_id,
            section_id: self.section_id,
            day_id: self.day_id,
            time_slot_id: self.time_slot_id,
        }
    }

    pub fn assignment(&self) -> Option<Assignment> {
        match (self.teacher_id, self.subject_id) {
            (Some(teacher_id), Some(subject_id)) => Some(Assignment {
                teacher_id,
                subject_id,
            }),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment().is_some()
    }
}

/// The unique key of an entry within one user's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub timetable_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub day_id: i16,
    pub time_slot_id: Uuid,
}

/// A teacher together with the subject they teach in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
}

/// An entry row to be upserted on its [`EntryKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEntry {
    pub key: EntryKey,
    pub assignment: Option<Assignment>,
}

impl NewEntry {
    pub fn teacher_id(&self) -> Option<Uuid> {
        self.assignment.map(|a| a.teacher_id)
    }

    pub fn subject_id(&self) -> Option<Uuid> {
        self.assignment.map(|a| a.subject_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTeacherRequest {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub time_slot_id: Uuid,
    pub day_id: Weekday,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckRequest {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub time_slot_id: Uuid,
    pub day_id: Weekday,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub conflict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridQuery {
    pub class_id: Uuid,
    pub section_id: Uuid,
}

/// Everything needed to render the grid of one class/section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    pub timetable_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub days: Vec<Weekday>,
    pub time_slots: Vec<TimeSlot>,
    pub lunch_slot_ids: Vec<Uuid>,
    pub entries: Vec<TimetableEntry>,
}
