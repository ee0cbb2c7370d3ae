use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::staff};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/subjects",
            get(staff::list_subjects).post(staff::create_subject),
        )
        .route(
            "/api/subjects/:id",
            put(staff::rename_subject).delete(staff::delete_subject),
        )
        .route(
            "/api/teachers",
            get(staff::list_teachers).post(staff::create_teacher),
        )
        .route(
            "/api/teachers/:id",
            put(staff::update_teacher).delete(staff::delete_teacher),
        )
}
