use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{
    ApiState,
    handlers::{entries, settings, timetables},
};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/timetables",
            get(timetables::list_timetables).post(timetables::create_timetable),
        )
        .route(
            "/api/timetables/:id",
            get(timetables::get_timetable)
                .put(timetables::rename_timetable)
                .delete(timetables::delete_timetable),
        )
        // Grid and entries
        .route("/api/timetables/:id/grid", get(entries::get_grid))
        .route("/api/timetables/:id/entries", put(entries::assign_teacher))
        .route(
            "/api/timetables/:id/entries/conflict",
            post(entries::check_conflict),
        )
        // Settings
        .route("/api/timetables/:id/settings", get(settings::get_settings))
        .route(
            "/api/timetables/:id/settings/days",
            put(settings::update_enabled_days),
        )
        .route(
            "/api/timetables/:id/settings/max-lunch",
            put(settings::update_max_lunch_slots),
        )
        .route(
            "/api/timetables/:id/settings/lunch-slots",
            put(settings::update_lunch_slots),
        )
        .route(
            "/api/timetables/:id/settings/lunch-slots/:slot_id",
            post(settings::toggle_lunch_slot),
        )
}
