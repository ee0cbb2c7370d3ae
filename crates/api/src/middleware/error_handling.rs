//! # Error Handling
//!
//! Maps [`TimetableError`] onto HTTP status codes with a JSON body of the
//! form `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use timetable_core::errors::TimetableError;
use tracing::error;

/// Wraps a [`TimetableError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct AppError(pub TimetableError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimetableError::NotFound(_) => StatusCode::NOT_FOUND,
            TimetableError::Validation(_) => StatusCode::BAD_REQUEST,
            TimetableError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TimetableError::Authorization(_) => StatusCode::FORBIDDEN,
            TimetableError::Conflict(_) => StatusCode::CONFLICT,
            TimetableError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimetableError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<TimetableError> for AppError {
    fn from(err: TimetableError) -> Self {
        AppError(err)
    }
}

/// Repository errors surface as [`TimetableError::Database`].
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimetableError::Database(err))
    }
}

/// Maps a [`TimetableError`] straight to a response.
pub fn map_error(err: TimetableError) -> Response {
    AppError(err).into_response()
}
