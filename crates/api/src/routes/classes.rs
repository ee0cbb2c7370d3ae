use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::classes};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route(
            "/api/classes/:id",
            put(classes::rename_class).delete(classes::delete_class),
        )
        .route("/api/classes/:id/sections", post(classes::create_section))
        .route(
            "/api/classes/:id/sections/:section_id",
            put(classes::rename_section).delete(classes::delete_section),
        )
}
