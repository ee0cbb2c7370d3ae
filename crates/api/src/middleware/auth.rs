//! # Authentication
//!
//! Password hashing with Argon2, opaque bearer tokens for sessions, and the
//! [`AuthSession`] extractor that turns an `Authorization: Bearer <token>`
//! header into the caller's [`Session`].

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use eyre::Result;
use rand::{Rng, distributions::Alphanumeric};
use timetable_core::{Session, TimetableError};
use tracing::debug;

use crate::{ApiState, middleware::error_handling::AppError};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const TOKEN_LENGTH: usize = 48;

/// Hashes a password with a fresh random salt.
///
/// The result is a PHC string (algorithm, parameters, salt and hash), ready
/// to be stored as is.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks a password against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is invalid: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A random alphanumeric bearer token.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Lower-cases and trims an email, rejecting values without an `@`.
pub fn normalize_email(email: &str) -> Result<String, TimetableError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(TimetableError::Validation("Invalid email address".to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<(), TimetableError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(TimetableError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session: Session,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let unauthenticated = || AppError(TimetableError::Authentication("Not signed in".to_string()));

        let token = bearer_token(parts).ok_or_else(unauthenticated)?.to_string();
        let stored = state
            .repo
            .find_session(&token)
            .await?
            .ok_or_else(unauthenticated)?;

        if stored.expires_at <= Utc::now() {
            debug!("Rejecting expired session for user {}", stored.user_id);
            state.repo.delete_session(&token).await?;
            return Err(AppError(TimetableError::Authentication(
                "Session expired".to_string(),
            )));
        }

        let user = state
            .repo
            .find_user_by_id(stored.user_id)
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(AuthSession {
            session: Session::new(user.id, user.email),
            token,
        })
    }
}
