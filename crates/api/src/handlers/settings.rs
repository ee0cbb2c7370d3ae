use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use timetable_core::{
    Session,
    errors::TimetableError,
    models::settings::{
        TimetableSettings, ToggleLunchSlotRequest, UpdateEnabledDaysRequest,
        UpdateLunchSlotsRequest, UpdateMaxLunchSlotsRequest,
    },
};
use timetable_db::stores::{ReferenceStore, SettingsStore};
use uuid::Uuid;

use super::require_timetable;
use crate::{
    ApiState,
    middleware::{auth::AuthSession, error_handling::AppError},
};

async fn settings_store(
    state: &ApiState,
    session: Session,
    timetable_id: Uuid,
) -> Result<SettingsStore, AppError> {
    require_timetable(state, &session, timetable_id).await?;
    Ok(SettingsStore::new(state.repo.clone(), session, timetable_id))
}

async fn require_time_slots(
    state: &ApiState,
    session: &Session,
    ids: &[Uuid],
) -> Result<(), AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), session.clone());
    let slots = store.load_time_slots().await?;
    if let Some(unknown) = ids.iter().find(|id| !slots.iter().any(|s| s.id == **id)) {
        return Err(AppError(TimetableError::NotFound(format!("Time slot {}", unknown))));
    }
    Ok(())
}

fn too_many_lunch_slots(max: i32) -> AppError {
    AppError(TimetableError::Validation(format!(
        "At most {} lunch slot(s) allowed",
        max
    )))
}

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
) -> Result<Json<TimetableSettings>, AppError> {
    let mut store = settings_store(&state, auth.session, timetable_id).await?;
    Ok(Json(store.fetch_or_create().await?.clone()))
}

#[axum::debug_handler]
pub async fn update_enabled_days(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Json(payload): Json<UpdateEnabledDaysRequest>,
) -> Result<Json<TimetableSettings>, AppError> {
    let mut store = settings_store(&state, auth.session, timetable_id).await?;
    Ok(Json(store.update_enabled_days(&payload.enabled_days).await?.clone()))
}

#[axum::debug_handler]
pub async fn update_max_lunch_slots(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Json(payload): Json<UpdateMaxLunchSlotsRequest>,
) -> Result<Json<TimetableSettings>, AppError> {
    let mut store = settings_store(&state, auth.session, timetable_id).await?;
    Ok(Json(store.update_max_lunch_slots(payload.max_lunch_slots).await?.clone()))
}

/// Replaces the whole lunch set.
#[axum::debug_handler]
pub async fn update_lunch_slots(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(timetable_id): Path<Uuid>,
    Json(payload): Json<UpdateLunchSlotsRequest>,
) -> Result<Json<TimetableSettings>, AppError> {
    require_time_slots(&state, &auth.session, &payload.lunch_slot_ids).await?;
    let mut store = settings_store(&state, auth.session, timetable_id).await?;

    let max = store.fetch_or_create().await?.max_lunch_slots;
    let mut requested = payload.lunch_slot_ids.clone();
    requested.sort();
    requested.dedup();
    if requested.len() as i64 > i64::from(max) {
        return Err(too_many_lunch_slots(max));
    }

    Ok(Json(store.update_lunch_slot_ids(payload.lunch_slot_ids).await?.clone()))
}

/// Marks or unmarks one slot as lunch, within the configured maximum.
#[axum::debug_handler]
pub async fn toggle_lunch_slot(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path((timetable_id, time_slot_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ToggleLunchSlotRequest>,
) -> Result<Json<TimetableSettings>, AppError> {
    require_time_slots(&state, &auth.session, &[time_slot_id]).await?;
    let mut store = settings_store(&state, auth.session, timetable_id).await?;

    let current = store.fetch_or_create().await?;
    if payload.is_lunch && !current.can_add_lunch_slot(time_slot_id) {
        return Err(too_many_lunch_slots(current.max_lunch_slots));
    }

    Ok(Json(store.toggle_lunch_slot(time_slot_id, payload.is_lunch).await?.clone()))
}
