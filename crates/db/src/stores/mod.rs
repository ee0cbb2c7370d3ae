//! Stateful stores the API drives per request.
//!
//! Each store owns its in-memory view (the grid, the settings row, the
//! reference lists) and talks to a [`SharedRepository`](crate::SharedRepository)
//! on behalf of one [`Session`](timetable_core::Session). A failed call is
//! logged and returned; the in-memory view is left as it was.

pub mod entries;
pub mod lifecycle;
pub mod reference;
pub mod settings;

pub use entries::EntryStore;
pub use reference::ReferenceStore;
pub use settings::SettingsStore;

use timetable_core::TimetableError;
use tracing::error;

/// Converts a repository failure into [`TimetableError::Database`], logging it.
pub(crate) fn logged(operation: &'static str) -> impl FnOnce(eyre::Report) -> TimetableError {
    move |err| {
        error!("{} failed: {:?}", operation, err);
        TimetableError::Database(err)
    }
}
