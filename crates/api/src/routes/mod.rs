pub mod auth;
pub mod classes;
pub mod health;
pub mod staff;
pub mod time_slots;
pub mod timetables;
