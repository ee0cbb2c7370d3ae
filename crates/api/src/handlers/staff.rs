use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use timetable_core::models::staff::{
    CreateSubjectRequest, CreateTeacherRequest, Subject, Teacher, UpdateSubjectRequest,
    UpdateTeacherRequest,
};
use timetable_db::stores::ReferenceStore;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthSession, error_handling::AppError},
};

fn store(state: &ApiState, auth: AuthSession) -> ReferenceStore {
    ReferenceStore::new(state.repo.clone(), auth.session)
}

// Subjects

#[axum::debug_handler]
pub async fn list_subjects(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<Vec<Subject>>, AppError> {
    let mut store = store(&state, auth);
    Ok(Json(store.load_subjects().await?.to_vec()))
}

#[axum::debug_handler]
pub async fn create_subject(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = store(&state, auth).create_subject(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[axum::debug_handler]
pub async fn rename_subject(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(store(&state, auth).rename_subject(id, &payload.name).await?))
}

/// Refused with 400 while a teacher still teaches the subject.
#[axum::debug_handler]
pub async fn delete_subject(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store(&state, auth).delete_subject(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Teachers

#[axum::debug_handler]
pub async fn list_teachers(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let mut store = store(&state, auth);
    Ok(Json(store.load_teachers().await?.to_vec()))
}

#[axum::debug_handler]
pub async fn create_teacher(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = store(&state, auth)
        .create_teacher(&payload.name, payload.subject_id)
        .await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[axum::debug_handler]
pub async fn update_teacher(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeacherRequest>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(
        store(&state, auth)
            .update_teacher(id, &payload.name, payload.subject_id)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn delete_teacher(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store(&state, auth).delete_teacher(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
