//! Creating and deleting whole timetables.

use timetable_core::{
    Session, TimetableError, TimetableResult,
    defaults::{
        DEFAULT_CLASS_NAME, DEFAULT_SECTION_NAME, DEFAULT_SUBJECTS, DEFAULT_TEACHERS,
        DEFAULT_TIME_SLOTS, missing,
    },
    models::{
        class::Section,
        settings::DefaultSettings,
        time_slot::sort_by_start,
        timetable::{Timetable, normalize_timetable_name},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{EntryStore, logged};
use crate::SharedRepository;

/// Creates a timetable and seeds the user's account so it can be used
/// straight away.
///
/// Missing starter data is topped up: a class with a section, subjects,
/// one teacher per subject, seven time slots and default settings. The
/// first class/section then gets a full grid of empty entries, with the
/// first day's earliest non-lunch slot given to the first teacher.
///
/// If seeding fails the new timetable is deleted again, so callers never
/// see one without settings or a grid. Seeded reference data is kept.
pub async fn create_timetable(
    repo: &SharedRepository,
    session: &Session,
    name: &str,
) -> TimetableResult<Timetable> {
    let user_id = session.user_id;
    let name = normalize_timetable_name(name);
    let timetable = repo
        .create_timetable(user_id, &name)
        .await
        .map_err(logged("Creating timetable"))?;
    info!("Created timetable {} ({}) for user {}", timetable.name, timetable.id, user_id);

    if let Err(err) = seed_timetable(repo, session, &timetable).await {
        error!("Seeding timetable {} failed, removing it: {}", timetable.id, err);
        if let Err(cleanup) = repo.delete_timetable(user_id, timetable.id).await {
            error!("Removing half-created timetable {} failed: {:?}", timetable.id, cleanup);
        }
        return Err(err);
    }

    Ok(timetable)
}

async fn seed_timetable(
    repo: &SharedRepository,
    session: &Session,
    timetable: &Timetable,
) -> TimetableResult<()> {
    let user_id = session.user_id;
    let section = seed_class(repo, user_id).await?;
    seed_staff(repo, user_id).await?;
    seed_time_slots(repo, user_id).await?;

    let settings = repo
        .create_default_settings(user_id, timetable.id, DefaultSettings::default())
        .await
        .map_err(logged("Creating timetable settings"))?;

    let mut time_slots = repo
        .list_time_slots(user_id)
        .await
        .map_err(logged("Listing time slots"))?;
    sort_by_start(&mut time_slots);
    let days = settings.enabled_weekdays();

    let mut entries = EntryStore::new(repo.clone(), session.clone(), timetable.id);
    entries
        .initialize(section.class_id, section.id, &days, &time_slots)
        .await?;

    let teachers = repo
        .list_teachers(user_id)
        .await
        .map_err(logged("Listing teachers"))?;
    let first_slot = time_slots
        .iter()
        .find(|slot| !slot.is_lunch && !settings.is_lunch_slot(slot.id));
    match (teachers.first(), days.first(), first_slot) {
        (Some(teacher), Some(&day), Some(slot)) => {
            entries
                .assign_teacher(
                    teacher.id,
                    teacher.subject_id,
                    section.class_id,
                    section.id,
                    slot.id,
                    day,
                )
                .await?;
        }
        _ => warn!("Timetable {} seeded without a first assignment", timetable.id),
    }

    Ok(())
}

/// Deletes a timetable with its entries and settings.
pub async fn delete_timetable(
    repo: &SharedRepository,
    session: &Session,
    id: Uuid,
) -> TimetableResult<()> {
    let deleted = repo
        .delete_timetable(session.user_id, id)
        .await
        .map_err(logged("Deleting timetable"))?;
    if !deleted {
        return Err(TimetableError::NotFound(format!("Timetable {}", id)));
    }

    info!("Deleted timetable {} for user {}", id, session.user_id);
    Ok(())
}

/// Returns the first section of the first class, creating either if absent.
async fn seed_class(repo: &SharedRepository, user_id: Uuid) -> TimetableResult<Section> {
    let classes = repo
        .list_classes(user_id)
        .await
        .map_err(logged("Listing classes"))?;
    let class = match classes.into_iter().next() {
        Some(class) => class,
        None => repo
            .create_class(user_id, DEFAULT_CLASS_NAME)
            .await
            .map_err(logged("Creating default class"))?,
    };

    let sections = repo
        .list_sections(user_id)
        .await
        .map_err(logged("Listing sections"))?;
    if let Some(section) = sections.into_iter().find(|s| s.class_id == class.id) {
        return Ok(section);
    }

    repo.create_section(user_id, class.id, DEFAULT_SECTION_NAME)
        .await
        .map_err(logged("Creating default section"))?
        .ok_or_else(|| TimetableError::NotFound(format!("Class {}", class.id)))
}

async fn seed_staff(repo: &SharedRepository, user_id: Uuid) -> TimetableResult<()> {
    let mut subjects = repo
        .list_subjects(user_id)
        .await
        .map_err(logged("Listing subjects"))?;
    for name in missing(&DEFAULT_SUBJECTS, subjects.len()) {
        let subject = repo
            .create_subject(user_id, name)
            .await
            .map_err(logged("Creating default subject"))?;
        subjects.push(subject);
    }

    let teachers = repo
        .list_teachers(user_id)
        .await
        .map_err(logged("Listing teachers"))?;
    for (name, subject_name) in missing(&DEFAULT_TEACHERS, teachers.len()) {
        let subject = subjects
            .iter()
            .find(|s| s.name == *subject_name)
            .or_else(|| subjects.first())
            .ok_or_else(|| TimetableError::NotFound("Subject for default teacher".to_string()))?;
        repo.create_teacher(user_id, name, subject.id)
            .await
            .map_err(logged("Creating default teacher"))?;
    }

    Ok(())
}

async fn seed_time_slots(repo: &SharedRepository, user_id: Uuid) -> TimetableResult<()> {
    let slots = repo
        .list_time_slots(user_id)
        .await
        .map_err(logged("Listing time slots"))?;
    for (start, end) in missing(&DEFAULT_TIME_SLOTS, slots.len()) {
        repo.create_time_slot(user_id, start, end, false)
            .await
            .map_err(logged("Creating default time slot"))?;
    }

    Ok(())
}
