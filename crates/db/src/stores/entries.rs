use timetable_core::{
    Session, TimetableError, TimetableResult, Weekday,
    conflict::ConflictProbe,
    grid::{GridState, plan_initialization},
    models::{
        entry::{Assignment, EntryKey, NewEntry, TimetableEntry},
        time_slot::TimeSlot,
    },
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::logged;
use crate::SharedRepository;

/// The grid of entries for one class/section of a timetable.
pub struct EntryStore {
    repo: SharedRepository,
    session: Session,
    timetable_id: Uuid,
    grid: GridState,
}

impl EntryStore {
    pub fn new(repo: SharedRepository, session: Session, timetable_id: Uuid) -> Self {
        Self {
            repo,
            session,
            timetable_id,
            grid: GridState::Empty,
        }
    }

    pub fn timetable_id(&self) -> Uuid {
        self.timetable_id
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        self.grid.entries()
    }

    pub fn into_entries(self) -> Vec<TimetableEntry> {
        match self.grid {
            GridState::Empty => Vec::new(),
            GridState::Loaded { entries, .. } => entries,
        }
    }

    /// Makes sure every (day, slot) cell of the class/section has an entry.
    ///
    /// Existing assignments are kept, new cells are unassigned. All rows go
    /// out in a single batch upsert and the result becomes the grid.
    pub async fn initialize(
        &mut self,
        class_id: Uuid,
        section_id: Uuid,
        days: &[Weekday],
        time_slots: &[TimeSlot],
    ) -> TimetableResult<()> {
        if days.is_empty() || time_slots.is_empty() {
            warn!(
                "Not initializing grid for class {} section {}: {} days, {} time slots",
                class_id,
                section_id,
                days.len(),
                time_slots.len()
            );
            self.grid = GridState::Empty;
            return Ok(());
        }

        let existing = self
            .repo
            .list_entries(self.session.user_id, self.timetable_id, class_id, section_id)
            .await
            .map_err(logged("Loading entries before initialization"))?;

        let plan = plan_initialization(
            self.timetable_id,
            class_id,
            section_id,
            days,
            time_slots,
            &existing,
        );
        debug!(
            "Initializing {} cells for timetable {} class {} section {}",
            plan.len(),
            self.timetable_id,
            class_id,
            section_id
        );

        let entries = self
            .repo
            .upsert_entries(self.session.user_id, plan)
            .await
            .map_err(logged("Initializing timetable entries"))?;

        self.grid = GridState::Loaded {
            class_id,
            section_id,
            entries,
        };
        Ok(())
    }

    /// Reloads the grid for a class/section from storage.
    pub async fn fetch(&mut self, class_id: Uuid, section_id: Uuid) -> TimetableResult<()> {
        let entries = self
            .repo
            .list_entries(self.session.user_id, self.timetable_id, class_id, section_id)
            .await
            .map_err(logged("Fetching timetable entries"))?;

        self.grid = GridState::Loaded {
            class_id,
            section_id,
            entries,
        };
        Ok(())
    }

    /// Writes one assignment and re-reads the whole grid.
    ///
    /// Does not look for conflicts; see [`EntryStore::check_conflict`] and
    /// [`EntryStore::assign_teacher_exclusive`].
    #[allow(clippy::too_many_arguments)]
    pub async fn assign_teacher(
        &mut self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
        time_slot_id: Uuid,
        day: Weekday,
    ) -> TimetableResult<()> {
        let entry = self.new_entry(teacher_id, subject_id, class_id, section_id, time_slot_id, day);
        self.repo
            .upsert_entry(self.session.user_id, entry)
            .await
            .map_err(logged("Assigning teacher"))?;

        self.fetch(class_id, section_id).await
    }

    /// Like [`EntryStore::assign_teacher`], but the conflict check and the
    /// write happen atomically. Fails with [`TimetableError::Conflict`] when
    /// the teacher is already booked in another class/section.
    #[allow(clippy::too_many_arguments)]
    pub async fn assign_teacher_exclusive(
        &mut self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
        time_slot_id: Uuid,
        day: Weekday,
    ) -> TimetableResult<()> {
        let entry = self.new_entry(teacher_id, subject_id, class_id, section_id, time_slot_id, day);
        let written = self
            .repo
            .assign_if_free(self.session.user_id, entry)
            .await
            .map_err(logged("Assigning teacher"))?;

        if written.is_none() {
            warn!(
                "Teacher {} is already booked on {} in time slot {}",
                teacher_id, day, time_slot_id
            );
            return Err(TimetableError::Conflict(format!(
                "Teacher is already assigned to another class on {} in this time slot",
                day
            )));
        }

        self.fetch(class_id, section_id).await
    }

    /// True when the teacher already holds this day/slot under a different
    /// class or section of the same timetable.
    pub async fn check_conflict(
        &self,
        teacher_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
        time_slot_id: Uuid,
        day: Weekday,
    ) -> TimetableResult<bool> {
        let probe = ConflictProbe {
            timetable_id: self.timetable_id,
            teacher_id,
            class_id,
            section_id,
            time_slot_id,
            day_id: day.id(),
        };
        self.repo
            .check_teacher_conflict(self.session.user_id, probe)
            .await
            .map_err(logged("Checking teacher conflict"))
    }

    pub fn clear(&mut self) {
        self.grid = GridState::Empty;
    }

    fn new_entry(
        &self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Uuid,
        section_id: Uuid,
        time_slot_id: Uuid,
        day: Weekday,
    ) -> NewEntry {
        NewEntry {
            key: EntryKey {
                timetable_id: self.timetable_id,
                class_id,
                section_id,
                day_id: day.id(),
                time_slot_id,
            },
            assignment: Some(Assignment {
                teacher_id,
                subject_id,
            }),
        }
    }
}
