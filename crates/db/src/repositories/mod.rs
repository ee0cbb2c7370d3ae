//! SQL access, one free function per query, each taking the connection pool.

pub mod class;
pub mod entry;
pub mod settings;
pub mod staff;
pub mod time_slot;
pub mod timetable;
pub mod user;
