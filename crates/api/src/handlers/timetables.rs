use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use timetable_core::models::timetable::{CreateTimetableRequest, RenameTimetableRequest, Timetable};
use timetable_db::stores::{ReferenceStore, lifecycle};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthSession, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn list_timetables(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<Vec<Timetable>>, AppError> {
    let store = ReferenceStore::new(state.repo.clone(), auth.session);
    Ok(Json(store.list_timetables().await?))
}

/// Creates a timetable and seeds the starter data it needs.
#[axum::debug_handler]
pub async fn create_timetable(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Json(payload): Json<CreateTimetableRequest>,
) -> Result<(StatusCode, Json<Timetable>), AppError> {
    let timetable = lifecycle::create_timetable(&state.repo, &auth.session, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(timetable)))
}

#[axum::debug_handler]
pub async fn get_timetable(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Timetable>, AppError> {
    let store = ReferenceStore::new(state.repo.clone(), auth.session);
    Ok(Json(store.get_timetable(id).await?))
}

#[axum::debug_handler]
pub async fn rename_timetable(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameTimetableRequest>,
) -> Result<Json<Timetable>, AppError> {
    let store = ReferenceStore::new(state.repo.clone(), auth.session);
    Ok(Json(store.rename_timetable(id, &payload.name).await?))
}

#[axum::debug_handler]
pub async fn delete_timetable(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    lifecycle::delete_timetable(&state.repo, &auth.session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
