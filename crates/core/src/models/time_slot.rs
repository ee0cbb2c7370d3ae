use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_format::parse_time;

/// A period of the school day. Boundaries are canonical "h:mm AM/PM" strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub is_lunch: bool,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn start(&self) -> Option<NaiveTime> {
        parse_time(&self.start_time)
    }
}

/// Orders slots by start time. Slots with unparseable times go last, in
/// creation order.
pub fn sort_by_start(slots: &mut [TimeSlot]) {
    slots.sort_by(|a, b| match (a.start(), b.start()) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.created_at.cmp(&b.created_at)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_lunch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeSlotRequest {
    pub start_time: String,
    pub end_time: String,
    pub is_lunch: Option<bool>,
}
