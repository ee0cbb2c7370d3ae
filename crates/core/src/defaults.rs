//! Starter data placed into a user's account when a timetable is created.
//!
//! Seeding only tops up what is missing: a user who already has a class with
//! a section, enough subjects, teachers and time slots gets nothing new.

pub const DEFAULT_CLASS_NAME: &str = "Class 1";
pub const DEFAULT_SECTION_NAME: &str = "A";

/// Subjects, in seeding order.
pub const DEFAULT_SUBJECTS: [&str; 3] = ["Mathematics", "English", "Science"];

/// Teachers and the subject (from [`DEFAULT_SUBJECTS`]) each one teaches.
pub const DEFAULT_TEACHERS: [(&str, &str); 3] = [
    ("Teacher 1", "Mathematics"),
    ("Teacher 2", "English"),
    ("Teacher 3", "Science"),
];

/// Seven one-hour periods starting at 8:00 AM.
pub const DEFAULT_TIME_SLOTS: [(&str, &str); 7] = [
    ("8:00 AM", "9:00 AM"),
    ("9:00 AM", "10:00 AM"),
    ("10:00 AM", "11:00 AM"),
    ("11:00 AM", "12:00 PM"),
    ("12:00 PM", "1:00 PM"),
    ("1:00 PM", "2:00 PM"),
    ("2:00 PM", "3:00 PM"),
];

/// How many items of a default list still need to be created when the user
/// already owns `existing` of them.
pub fn missing<T>(defaults: &[T], existing: usize) -> &[T] {
    &defaults[existing.min(defaults.len())..]
}
