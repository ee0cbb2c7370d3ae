use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::time_slots};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slots",
            get(time_slots::list_time_slots).post(time_slots::create_time_slot),
        )
        .route(
            "/api/time-slots/:id",
            put(time_slots::update_time_slot).delete(time_slots::delete_time_slot),
        )
}
