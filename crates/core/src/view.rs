//! Dashboard view state: which overlay is open and which class/section the
//! grid shows. Only one overlay can be open at a time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TimetableError, TimetableResult};
use crate::models::entry::EntryKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    #[default]
    None,
    CreateTimetable,
    Rename { timetable_id: Uuid },
    Delete { timetable_id: Uuid },
    ManageClasses,
    ManageTimeSlots,
    ManageTeachersSubjects,
    Settings,
    AssignTeacher { cell: EntryKey },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    overlay: Overlay,
    class_id: Option<Uuid>,
    section_id: Option<Uuid>,
}

impl ViewState {
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn selection(&self) -> Option<(Uuid, Uuid)> {
        self.class_id.zip(self.section_id)
    }

    pub fn open(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn close(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Selecting a class drops the section, and with it the grid and any
    /// pending cell assignment. Returns true when the grid must be cleared.
    pub fn select_class(&mut self, class_id: Uuid) -> bool {
        let changed = self.class_id != Some(class_id) || self.section_id.is_some();
        self.class_id = Some(class_id);
        self.section_id = None;
        if matches!(self.overlay, Overlay::AssignTeacher { .. }) {
            self.overlay = Overlay::None;
        }
        changed
    }

    pub fn select_section(&mut self, section_id: Uuid) -> TimetableResult<(Uuid, Uuid)> {
        let class_id = self
            .class_id
            .ok_or_else(|| TimetableError::Validation("Select a class first".to_string()))?;
        self.section_id = Some(section_id);
        Ok((class_id, section_id))
    }

    /// Opens the assign dialog for a cell of the selected class/section.
    pub fn open_cell(&mut self, cell: EntryKey) -> TimetableResult<()> {
        if self.selection() != Some((cell.class_id, cell.section_id)) {
            return Err(TimetableError::Validation(
                "Cell does not belong to the selected class and section".to_string(),
            ));
        }
        self.overlay = Overlay::AssignTeacher { cell };
        Ok(())
    }
}
