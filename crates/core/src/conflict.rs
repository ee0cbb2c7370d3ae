//! The cross-class teacher conflict rule.
//!
//! A teacher conflicts with a cell when they already hold an entry at the
//! same day and time slot of the same timetable under a *different*
//! class/section pair. Re-assigning the same cell is never a conflict.

use uuid::Uuid;

use crate::models::entry::TimetableEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictProbe {
    pub timetable_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub time_slot_id: Uuid,
    pub day_id: i16,
}

impl ConflictProbe {
    pub fn matches(&self, entry: &TimetableEntry) -> bool {
        entry.timetable_id == self.timetable_id
            && entry.teacher_id == Some(self.teacher_id)
            && entry.time_slot_id == self.time_slot_id
            && entry.day_id == self.day_id
            && (entry.class_id != self.class_id || entry.section_id != self.section_id)
    }
}

/// Scans `entries` (all belonging to one user) for a conflicting booking.
pub fn has_conflict<'a>(
    probe: &ConflictProbe,
    entries: impl IntoIterator<Item = &'a TimetableEntry>,
) -> bool {
    entries.into_iter().any(|entry| probe.matches(entry))
}
