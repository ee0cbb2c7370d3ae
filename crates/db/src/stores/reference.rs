//! Classes with sections, subjects, teachers, time slots and timetables.

use timetable_core::{
    Session, TimetableError, TimetableResult,
    models::{
        class::{Class, ClassWithSections, Section},
        staff::{Subject, Teacher},
        time_slot::{TimeSlot, sort_by_start},
        timetable::{Timetable, normalize_timetable_name},
    },
    time_format::normalize_time,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::logged;
use crate::SharedRepository;

fn required_name(kind: &str, name: &str) -> TimetableResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TimetableError::Validation(format!("{} name cannot be empty", kind)));
    }
    Ok(name.to_string())
}

fn not_found(kind: &str, id: Uuid) -> TimetableError {
    TimetableError::NotFound(format!("{} {}", kind, id))
}

/// User-scoped CRUD over the reference lists.
///
/// Each `load_*` call replaces the matching cached list; writes keep the
/// cache in step with what was stored.
pub struct ReferenceStore {
    repo: SharedRepository,
    session: Session,
    classes: Vec<ClassWithSections>,
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    time_slots: Vec<TimeSlot>,
}

impl ReferenceStore {
    pub fn new(repo: SharedRepository, session: Session) -> Self {
        Self {
            repo,
            session,
            classes: Vec::new(),
            subjects: Vec::new(),
            teachers: Vec::new(),
            time_slots: Vec::new(),
        }
    }

    fn user_id(&self) -> Uuid {
        self.session.user_id
    }

    pub fn classes(&self) -> &[ClassWithSections] {
        &self.classes
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Time slots ordered by start time.
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    // Timetables

    pub async fn list_timetables(&self) -> TimetableResult<Vec<Timetable>> {
        self.repo
            .list_timetables(self.user_id())
            .await
            .map_err(logged("Listing timetables"))
    }

    pub async fn get_timetable(&self, id: Uuid) -> TimetableResult<Timetable> {
        self.repo
            .get_timetable(self.user_id(), id)
            .await
            .map_err(logged("Fetching timetable"))?
            .ok_or_else(|| not_found("Timetable", id))
    }

    pub async fn rename_timetable(&self, id: Uuid, name: &str) -> TimetableResult<Timetable> {
        let name = normalize_timetable_name(name);
        self.repo
            .rename_timetable(self.user_id(), id, &name)
            .await
            .map_err(logged("Renaming timetable"))?
            .ok_or_else(|| not_found("Timetable", id))
    }

    // Classes and sections

    pub async fn load_classes(&mut self) -> TimetableResult<&[ClassWithSections]> {
        let classes = self
            .repo
            .list_classes(self.user_id())
            .await
            .map_err(logged("Listing classes"))?;
        let sections = self
            .repo
            .list_sections(self.user_id())
            .await
            .map_err(logged("Listing sections"))?;

        self.classes = ClassWithSections::group(classes, sections);
        Ok(&self.classes)
    }

    pub async fn create_class(&mut self, name: &str) -> TimetableResult<Class> {
        let name = required_name("Class", name)?;
        let class = self
            .repo
            .create_class(self.user_id(), &name)
            .await
            .map_err(logged("Creating class"))?;

        self.classes.push(ClassWithSections {
            class: class.clone(),
            sections: Vec::new(),
        });
        Ok(class)
    }

    pub async fn rename_class(&mut self, id: Uuid, name: &str) -> TimetableResult<Class> {
        let name = required_name("Class", name)?;
        let class = self
            .repo
            .rename_class(self.user_id(), id, &name)
            .await
            .map_err(logged("Renaming class"))?
            .ok_or_else(|| not_found("Class", id))?;

        if let Some(cached) = self.classes.iter_mut().find(|c| c.class.id == id) {
            cached.class = class.clone();
        }
        Ok(class)
    }

    /// Deletes a class together with its sections and their entries.
    pub async fn delete_class(&mut self, id: Uuid) -> TimetableResult<()> {
        let deleted = self
            .repo
            .delete_class(self.user_id(), id)
            .await
            .map_err(logged("Deleting class"))?;
        if !deleted {
            return Err(not_found("Class", id));
        }

        self.classes.retain(|c| c.class.id != id);
        Ok(())
    }

    pub async fn create_section(&mut self, class_id: Uuid, name: &str) -> TimetableResult<Section> {
        let name = required_name("Section", name)?;
        let section = self
            .repo
            .create_section(self.user_id(), class_id, &name)
            .await
            .map_err(logged("Creating section"))?
            .ok_or_else(|| not_found("Class", class_id))?;

        if let Some(cached) = self.classes.iter_mut().find(|c| c.class.id == class_id) {
            cached.sections.push(section.clone());
        }
        Ok(section)
    }

    pub async fn rename_section(
        &mut self,
        class_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> TimetableResult<Section> {
        let name = required_name("Section", name)?;
        let section = self
            .repo
            .rename_section(self.user_id(), class_id, id, &name)
            .await
            .map_err(logged("Renaming section"))?
            .ok_or_else(|| not_found("Section", id))?;

        if let Some(cached) = self
            .classes
            .iter_mut()
            .flat_map(|c| c.sections.iter_mut())
            .find(|s| s.id == id)
        {
            *cached = section.clone();
        }
        Ok(section)
    }

    pub async fn delete_section(&mut self, class_id: Uuid, id: Uuid) -> TimetableResult<()> {
        let deleted = self
            .repo
            .delete_section(self.user_id(), class_id, id)
            .await
            .map_err(logged("Deleting section"))?;
        if !deleted {
            return Err(not_found("Section", id));
        }

        for class in &mut self.classes {
            class.sections.retain(|s| s.id != id);
        }
        Ok(())
    }

    // Subjects

    pub async fn load_subjects(&mut self) -> TimetableResult<&[Subject]> {
        self.subjects = self
            .repo
            .list_subjects(self.user_id())
            .await
            .map_err(logged("Listing subjects"))?;
        Ok(&self.subjects)
    }

    pub async fn create_subject(&mut self, name: &str) -> TimetableResult<Subject> {
        let name = required_name("Subject", name)?;
        let subject = self
            .repo
            .create_subject(self.user_id(), &name)
            .await
            .map_err(logged("Creating subject"))?;

        self.subjects.push(subject.clone());
        Ok(subject)
    }

    pub async fn rename_subject(&mut self, id: Uuid, name: &str) -> TimetableResult<Subject> {
        let name = required_name("Subject", name)?;
        let subject = self
            .repo
            .rename_subject(self.user_id(), id, &name)
            .await
            .map_err(logged("Renaming subject"))?
            .ok_or_else(|| not_found("Subject", id))?;

        if let Some(cached) = self.subjects.iter_mut().find(|s| s.id == id) {
            *cached = subject.clone();
        }
        Ok(subject)
    }

    /// Deletes a subject that no teacher and no timetable cell still uses.
    pub async fn delete_subject(&mut self, id: Uuid) -> TimetableResult<()> {
        let teachers = self
            .repo
            .list_teachers(self.user_id())
            .await
            .map_err(logged("Listing teachers"))?;
        if let Some(teacher) = teachers.iter().find(|t| t.subject_id == id) {
            warn!("Refusing to delete subject {} taught by {}", id, teacher.name);
            return Err(TimetableError::Validation(format!(
                "Subject is still taught by {}",
                teacher.name
            )));
        }

        let cells = self
            .repo
            .count_subject_entries(self.user_id(), id)
            .await
            .map_err(logged("Counting subject entries"))?;
        if cells > 0 {
            warn!("Refusing to delete subject {} used in {} cell(s)", id, cells);
            return Err(TimetableError::Validation(format!(
                "Subject is still assigned in {} timetable cell(s)",
                cells
            )));
        }

        let deleted = self
            .repo
            .delete_subject(self.user_id(), id)
            .await
            .map_err(logged("Deleting subject"))?;
        if !deleted {
            return Err(not_found("Subject", id));
        }

        self.subjects.retain(|s| s.id != id);
        Ok(())
    }

    // Teachers

    pub async fn load_teachers(&mut self) -> TimetableResult<&[Teacher]> {
        self.teachers = self
            .repo
            .list_teachers(self.user_id())
            .await
            .map_err(logged("Listing teachers"))?;
        Ok(&self.teachers)
    }

    /// Looks up one of the user's teachers.
    pub async fn get_teacher(&self, id: Uuid) -> TimetableResult<Teacher> {
        self.repo
            .list_teachers(self.user_id())
            .await
            .map_err(logged("Listing teachers"))?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Teacher", id))
    }

    async fn require_subject(&self, subject_id: Uuid) -> TimetableResult<()> {
        let subjects = self
            .repo
            .list_subjects(self.user_id())
            .await
            .map_err(logged("Listing subjects"))?;
        if subjects.iter().any(|s| s.id == subject_id) {
            Ok(())
        } else {
            Err(TimetableError::Validation(format!(
                "Unknown subject {}",
                subject_id
            )))
        }
    }

    pub async fn create_teacher(&mut self, name: &str, subject_id: Uuid) -> TimetableResult<Teacher> {
        let name = required_name("Teacher", name)?;
        self.require_subject(subject_id).await?;
        let teacher = self
            .repo
            .create_teacher(self.user_id(), &name, subject_id)
            .await
            .map_err(logged("Creating teacher"))?;

        self.teachers.push(teacher.clone());
        Ok(teacher)
    }

    pub async fn update_teacher(
        &mut self,
        id: Uuid,
        name: &str,
        subject_id: Uuid,
    ) -> TimetableResult<Teacher> {
        let name = required_name("Teacher", name)?;
        self.require_subject(subject_id).await?;
        let teacher = self
            .repo
            .update_teacher(self.user_id(), id, &name, subject_id)
            .await
            .map_err(logged("Updating teacher"))?
            .ok_or_else(|| not_found("Teacher", id))?;

        if let Some(cached) = self.teachers.iter_mut().find(|t| t.id == id) {
            *cached = teacher.clone();
        }
        Ok(teacher)
    }

    /// Deletes a teacher; their entries stay in place, unassigned.
    pub async fn delete_teacher(&mut self, id: Uuid) -> TimetableResult<()> {
        let deleted = self
            .repo
            .delete_teacher(self.user_id(), id)
            .await
            .map_err(logged("Deleting teacher"))?;
        if !deleted {
            return Err(not_found("Teacher", id));
        }

        self.teachers.retain(|t| t.id != id);
        Ok(())
    }

    // Time slots

    pub async fn load_time_slots(&mut self) -> TimetableResult<&[TimeSlot]> {
        let mut slots = self
            .repo
            .list_time_slots(self.user_id())
            .await
            .map_err(logged("Listing time slots"))?;
        sort_by_start(&mut slots);

        self.time_slots = slots;
        Ok(&self.time_slots)
    }

    /// Creates a time slot; both times are stored as "h:mm AM/PM".
    pub async fn create_time_slot(
        &mut self,
        start_time: &str,
        end_time: &str,
        is_lunch: bool,
    ) -> TimetableResult<TimeSlot> {
        let start_time = normalize_time(start_time)?;
        let end_time = normalize_time(end_time)?;
        let slot = self
            .repo
            .create_time_slot(self.user_id(), &start_time, &end_time, is_lunch)
            .await
            .map_err(logged("Creating time slot"))?;
        info!("Created time slot {} - {}", slot.start_time, slot.end_time);

        self.time_slots.push(slot.clone());
        sort_by_start(&mut self.time_slots);
        Ok(slot)
    }

    pub async fn update_time_slot(
        &mut self,
        id: Uuid,
        start_time: &str,
        end_time: &str,
        is_lunch: Option<bool>,
    ) -> TimetableResult<TimeSlot> {
        let start_time = normalize_time(start_time)?;
        let end_time = normalize_time(end_time)?;
        let slot = self
            .repo
            .update_time_slot(self.user_id(), id, &start_time, &end_time, is_lunch)
            .await
            .map_err(logged("Updating time slot"))?
            .ok_or_else(|| not_found("Time slot", id))?;

        if let Some(cached) = self.time_slots.iter_mut().find(|s| s.id == id) {
            *cached = slot.clone();
        }
        sort_by_start(&mut self.time_slots);
        Ok(slot)
    }

    /// Deletes a time slot with its entries and removes it from lunch sets.
    pub async fn delete_time_slot(&mut self, id: Uuid) -> TimetableResult<()> {
        let deleted = self
            .repo
            .delete_time_slot(self.user_id(), id)
            .await
            .map_err(logged("Deleting time slot"))?;
        if !deleted {
            return Err(not_found("Time slot", id));
        }

        self.time_slots.retain(|s| s.id != id);
        Ok(())
    }
}
