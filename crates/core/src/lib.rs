//! # Timetable Core
//!
//! Domain types and rules shared by the storage layer and the HTTP API:
//! entities, days of the week, 12-hour time formatting, the teacher
//! conflict rule, grid planning, default seed data and dashboard view state.
//!
//! Nothing in this crate performs I/O.

pub mod conflict;
pub mod day;
pub mod defaults;
pub mod errors;
pub mod grid;
pub mod models;
pub mod session;
pub mod time_format;
pub mod view;

pub use day::Weekday;
pub use errors::{TimetableError, TimetableResult};
pub use session::Session;
