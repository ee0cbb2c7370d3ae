use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use std::sync::Arc;
use timetable_core::{
    errors::TimetableError,
    models::user::{LoginRequest, SessionResponse, SignupRequest, User},
};
use tracing::info;

use crate::{
    ApiState,
    middleware::{
        auth::{
            AuthSession, generate_session_token, hash_password, normalize_email,
            validate_password, verify_password,
        },
        error_handling::AppError,
    },
};

async fn issue_session(state: &ApiState, user: User) -> Result<SessionResponse, AppError> {
    let token = generate_session_token();
    let expires_at = Utc::now() + state.session_ttl;
    state
        .repo
        .create_session(user.id, &token, expires_at)
        .await
        .map_err(TimetableError::Database)?;

    Ok(SessionResponse {
        token,
        expires_at,
        user,
    })
}

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let email = normalize_email(&payload.email)?;
    validate_password(&payload.password)?;

    let existing = state
        .repo
        .find_user_by_email(&email)
        .await
        .map_err(TimetableError::Database)?;
    if existing.is_some() {
        return Err(AppError(TimetableError::Conflict(
            "An account with this email already exists".to_string(),
        )));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .repo
        .create_user(&email, &password_hash)
        .await
        .map_err(TimetableError::Database)?;
    info!("Registered user {}", user.id);

    let response = issue_session(&state, user.into()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let invalid = || AppError(TimetableError::Authentication("Invalid email or password".to_string()));

    let email = normalize_email(&payload.email).map_err(|_| invalid())?;
    let user = state
        .repo
        .find_user_by_email(&email)
        .await
        .map_err(TimetableError::Database)?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(Json(issue_session(&state, user.into()).await?))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<StatusCode, AppError> {
    state
        .repo
        .delete_session(&auth.token)
        .await
        .map_err(TimetableError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    auth: AuthSession,
) -> Result<Json<User>, AppError> {
    let user = state
        .repo
        .find_user_by_id(auth.session.user_id)
        .await
        .map_err(TimetableError::Database)?
        .ok_or_else(|| TimetableError::NotFound("User".to_string()))?;

    Ok(Json(user.into()))
}
