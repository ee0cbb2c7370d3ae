use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNTITLED_TIMETABLE: &str = "Untitled Timetable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimetableRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameTimetableRequest {
    pub name: String,
}

/// Trims a timetable name, falling back to "Untitled Timetable" when blank.
pub fn normalize_timetable_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        UNTITLED_TIMETABLE.to_string()
    } else {
        name.to_string()
    }
}
