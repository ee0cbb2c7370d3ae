pub mod auth;
pub mod classes;
pub mod entries;
pub mod settings;
pub mod staff;
pub mod time_slots;
pub mod timetables;

use timetable_core::{Session, models::timetable::Timetable};
use timetable_db::stores::ReferenceStore;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Resolves a timetable owned by the caller, or 404.
pub(crate) async fn require_timetable(
    state: &ApiState,
    session: &Session,
    timetable_id: Uuid,
) -> Result<Timetable, AppError> {
    let store = ReferenceStore::new(state.repo.clone(), session.clone());
    Ok(store.get_timetable(timetable_id).await?)
}
