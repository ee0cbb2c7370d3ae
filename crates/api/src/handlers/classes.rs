use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use timetable_core::models::class::{
    Class, ClassWithSections, CreateClassRequest, CreateSectionRequest, Section,
    UpdateClassRequest, UpdateSectionRequest,
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

#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<Vec<ClassWithSections>>, AppError> {
    let mut store = store(&state, auth);
    Ok(Json(store.load_classes().await?.to_vec()))
}

#[axum::debug_handler]
pub async fn create_class(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Json(payload): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = store(&state, auth).create_class(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[axum::debug_handler]
pub async fn rename_class(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClassRequest>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(store(&state, auth).rename_class(id, &payload.name).await?))
}

#[axum::debug_handler]
pub async fn delete_class(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store(&state, auth).delete_class(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn create_section(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<(StatusCode, Json<Section>), AppError> {
    let section = store(&state, auth)
        .create_section(class_id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[axum::debug_handler]
pub async fn rename_section(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path((class_id, section_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<Json<Section>, AppError> {
    Ok(Json(
        store(&state, auth)
            .rename_section(class_id, section_id, &payload.name)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn delete_section(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
    Path((class_id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    store(&state, auth).delete_section(class_id, section_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
