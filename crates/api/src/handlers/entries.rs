use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use timetable_core::{
    Session,
    errors::TimetableError,
    models::entry::{
        AssignTeacherRequest, ConflictCheckRequest, ConflictCheckResponse, GridQuery, GridResponse,
        TimetableEntry,
    },
};
use timetable_db::stores::{EntryStore, ReferenceStore, SettingsStore};
use tracing::info;
use uuid::Uuid;

use super::require_timetable;
use crate::{
    ApiState,
    middleware::{auth::AuthSession, error_handling::AppError},
};

async fn require_section(
    state: &ApiState,
    session: &Session,
    class_id: Uuid,
    section_id: Uuid,
) -> Result<(), AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), session.clone());
    let known = store
        .load_classes()
        .await?
        .iter()
        .filter(|c| c.class.id == class_id)
        .flat_map(|c| c.sections.iter())
        .any(|s| s.id == section_id);
    if !known {
        return Err(AppError(TimetableError::NotFound(format!(
            "Section {} of class {}",
            section_id, class_id
        ))));
    }
    Ok(())
}

/// Ensures every enabled day × time slot cell exists for the class/section,
/// then returns the grid with what is needed to render it.
#[axum::debug_handler]
pub async fn get_grid(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Query(query): Query<GridQuery>,
) -> Result<Json<GridResponse>, AppError> {
    let session = auth.session;
    require_timetable(&state, &session, timetable_id).await?;
    require_section(&state, &session, query.class_id, query.section_id).await?;

    let mut settings = SettingsStore::new(state.repo.clone(), session.clone(), timetable_id);
    settings.fetch_or_create().await?;
    let days = settings.enabled_days();

    let mut reference = ReferenceStore::new(state.repo.clone(), session.clone());
    let time_slots = reference.load_time_slots().await?.to_vec();

    let mut entries = EntryStore::new(state.repo.clone(), session, timetable_id);
    entries
        .initialize(query.class_id, query.section_id, &days, &time_slots)
        .await?;
    entries.fetch(query.class_id, query.section_id).await?;

    Ok(Json(GridResponse {
        timetable_id,
        class_id: query.class_id,
        section_id: query.section_id,
        days,
        time_slots,
        lunch_slot_ids: settings.lunch_slot_ids().to_vec(),
        entries: entries.into_entries(),
    }))
}

#[axum::debug_handler]
pub async fn check_conflict(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Json(payload): Json<ConflictCheckRequest>,
) -> Result<Json<ConflictCheckResponse>, AppError> {
    require_timetable(&state, &auth.session, timetable_id).await?;

    let store = EntryStore::new(state.repo.clone(), auth.session, timetable_id);
    let conflict = store
        .check_conflict(
            payload.teacher_id,
            payload.class_id,
            payload.section_id,
            payload.time_slot_id,
            payload.day_id,
        )
        .await?;

    Ok(Json(ConflictCheckResponse { conflict }))
}

/// Puts a teacher, with their own subject, into one cell.
///
/// Lunch slots and disabled days are refused. A teacher already booked in
/// another class/section at the same day and slot is refused with 409, and
/// the write itself re-checks atomically.
#[axum::debug_handler]
pub async fn assign_teacher(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Json(payload): Json<AssignTeacherRequest>,
) -> Result<Json<Vec<TimetableEntry>>, AppError> {
    let session = auth.session;
    require_timetable(&state, &session, timetable_id).await?;
    require_section(&state, &session, payload.class_id, payload.section_id).await?;

    let mut reference = ReferenceStore::new(state.repo.clone(), session.clone());
    let teacher = reference.get_teacher(payload.teacher_id).await?;
    let slot = reference
        .load_time_slots()
        .await?
        .iter()
        .find(|s| s.id == payload.time_slot_id)
        .cloned()
        .ok_or_else(|| TimetableError::NotFound(format!("Time slot {}", payload.time_slot_id)))?;

    let mut settings = SettingsStore::new(state.repo.clone(), session.clone(), timetable_id);
    let current = settings.fetch_or_create().await?;
    if slot.is_lunch || current.is_lunch_slot(slot.id) {
        return Err(AppError(TimetableError::Validation(
            "Lunch slots cannot be assigned".to_string(),
        )));
    }
    if !current.enabled_weekdays().contains(&payload.day_id) {
        return Err(AppError(TimetableError::Validation(format!(
            "{} is not enabled for this timetable",
            payload.day_id
        ))));
    }

    let mut entries = EntryStore::new(state.repo.clone(), session, timetable_id);
    let conflict = entries
        .check_conflict(
            teacher.id,
            payload.class_id,
            payload.section_id,
            slot.id,
            payload.day_id,
        )
        .await?;
    if conflict {
        return Err(AppError(TimetableError::Conflict(format!(
            "{} is already assigned to another class on {} at {}",
            teacher.name, payload.day_id, slot.start_time
        ))));
    }

    entries
        .assign_teacher_exclusive(
            teacher.id,
            teacher.subject_id,
            payload.class_id,
            payload.section_id,
            slot.id,
            payload.day_id,
        )
        .await?;
    info!(
        "Assigned teacher {} on {} at {} in timetable {}",
        teacher.id, payload.day_id, slot.start_time, timetable_id
    );

    Ok(Json(entries.into_entries()))
}
