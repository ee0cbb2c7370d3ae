//! Grid planning and the in-memory grid state of one class/section.

use std::collections::HashMap;

use uuid::Uuid;

use crate::day::Weekday;
use crate::models::entry::{Assignment, EntryKey, NewEntry, TimetableEntry};
use crate::models::time_slot::TimeSlot;

/// Builds one row per (day, slot) for a class/section, keeping any
/// assignment already present in `existing` for the exact same cell.
pub fn plan_initialization(
    timetable_id: Uuid,
    class_id: Uuid,
    section_id: Uuid,
    days: &[Weekday],
    time_slots: &[TimeSlot],
    existing: &[TimetableEntry],
) -> Vec<NewEntry> {
    let assigned: HashMap<(i16, Uuid), Assignment> = existing
        .iter()
        .filter(|e| {
            e.timetable_id == timetable_id && e.class_id == class_id && e.section_id == section_id
        })
        .filter_map(|e| e.assignment().map(|a| ((e.day_id, e.time_slot_id), a)))
        .collect();

    days.iter()
        .flat_map(|day| {
            let assigned = &assigned;
            time_slots.iter().map(move |slot| NewEntry {
                key: EntryKey {
                    timetable_id,
                    class_id,
                    section_id,
                    day_id: day.id(),
                    time_slot_id: slot.id,
                },
                assignment: assigned.get(&(day.id(), slot.id)).copied(),
            })
        })
        .collect()
}

/// Looks up the entry at a day/slot.
pub fn find_cell(entries: &[TimetableEntry], day: Weekday, time_slot_id: Uuid) -> Option<&TimetableEntry> {
    entries
        .iter()
        .find(|e| e.day_id == day.id() && e.time_slot_id == time_slot_id)
}

/// The grid held by an entry store.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GridState {
    /// No class/section selected, or just cleared.
    #[default]
    Empty,
    Loaded {
        class_id: Uuid,
        section_id: Uuid,
        entries: Vec<TimetableEntry>,
    },
}

impl GridState {
    pub fn entries(&self) -> &[TimetableEntry] {
        match self {
            GridState::Empty => &[],
            GridState::Loaded { entries, .. } => entries,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, GridState::Loaded { .. })
    }

    /// The class/section the grid is loaded for.
    pub fn selection(&self) -> Option<(Uuid, Uuid)> {
        match self {
            GridState::Empty => None,
            GridState::Loaded {
                class_id,
                section_id,
                ..
            } => Some((*class_id, *section_id)),
        }
    }
}
