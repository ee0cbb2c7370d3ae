//! Canonical "h:mm AM/PM" representation for time-slot boundaries.
//!
//! Time slots are stored as display strings. Every write goes through
//! [`normalize_time`] so that values coming from 24-hour inputs ("14:30"),
//! inputs with seconds ("14:30:00") or padded 12-hour inputs ("09:15 am")
//! all end up as the same canonical string.

use chrono::{NaiveTime, Timelike};

use crate::errors::{TimetableError, TimetableResult};

/// Returns true for strings already in canonical form, e.g. "9:15 AM" or "12:00 PM".
/// A leading zero on the hour is tolerated ("09:15 AM").
pub fn is_canonical(time: &str) -> bool {
    let Some((clock, meridiem)) = time.split_once(' ') else {
        return false;
    };
    if meridiem != "AM" && meridiem != "PM" {
        return false;
    }
    let Some((hours, minutes)) = clock.split_once(':') else {
        return false;
    };
    let hours_ok = matches!(hours.len(), 1 | 2)
        && hours.chars().all(|c| c.is_ascii_digit())
        && matches!(hours.parse::<u32>(), Ok(1..=12));
    let minutes_ok = minutes.len() == 2
        && minutes.chars().all(|c| c.is_ascii_digit())
        && matches!(minutes.parse::<u32>(), Ok(0..=59));
    hours_ok && minutes_ok
}

/// Formats a time of day as "h:mm AM/PM".
pub fn to_12_hour(time: NaiveTime) -> String {
    let (is_pm, hour12) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour12,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Parses either a 12-hour ("2:30 PM", "02:30 pm") or a 24-hour
/// ("14:30", "14:30:00") time of day.
pub fn parse_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    ["%I:%M %p", "%H:%M", "%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
}

/// Converts a time string to "h:mm AM/PM".
///
/// Already-canonical input is returned unchanged. Input that cannot be parsed
/// is also returned unchanged; use [`normalize_time`] to reject it instead.
pub fn format_time_12_hour(time: &str) -> String {
    if is_canonical(time) {
        return time.to_string();
    }
    match parse_time(time) {
        Some(parsed) => to_12_hour(parsed),
        None => time.to_string(),
    }
}

/// Like [`format_time_12_hour`] but fails on input that is not a time of day.
pub fn normalize_time(time: &str) -> TimetableResult<String> {
    let time = time.trim();
    if is_canonical(time) {
        return Ok(time.to_string());
    }
    parse_time(time)
        .map(to_12_hour)
        .ok_or_else(|| TimetableError::Validation(format!("Invalid time value: {:?}", time)))
}
