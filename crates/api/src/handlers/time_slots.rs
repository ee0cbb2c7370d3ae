use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use timetable_core::models::time_slot::{CreateTimeSlotRequest, TimeSlot, UpdateTimeSlotRequest};
use timetable_db::stores::ReferenceStore;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthSession, error_handling::AppError},
};

/// Time slots ordered by start time.
#[axum::debug_handler]
pub async fn list_time_slots(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), auth.session);
    Ok(Json(store.load_time_slots().await?.to_vec()))
}

#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlot>), AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), auth.session);
    let slot = store
        .create_time_slot(&payload.start_time, &payload.end_time, payload.is_lunch)
        .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn update_time_slot(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTimeSlotRequest>,
) -> Result<Json<TimeSlot>, AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), auth.session);
    let slot = store
        .update_time_slot(id, &payload.start_time, &payload.end_time, payload.is_lunch)
        .await?;
    Ok(Json(slot))
}

/// Also removes the slot's entries and drops it from every lunch set.
#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut store = ReferenceStore::new(state.repo.clone(), auth.session);
    store.delete_time_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
