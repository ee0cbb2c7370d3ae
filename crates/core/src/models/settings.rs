use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::day::Weekday;
use crate::errors::{TimetableError, TimetableResult};

pub const DEFAULT_MAX_LUNCH_SLOTS: i32 = 1;

/// Per-timetable configuration of enabled days and the lunch-slot policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSettings {
    pub id: Uuid,
    pub timetable_id: Uuid,
    pub user_id: Uuid,
    pub enabled_days: Vec<i16>,
    pub max_lunch_slots: i32,
    pub lunch_slot_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimetableSettings {
    /// Enabled days in Monday-first order. Unknown ids are skipped.
    pub fn enabled_weekdays(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self
            .enabled_days
            .iter()
            .filter_map(|&id| Weekday::from_id(id))
            .collect();
        days.sort();
        days.dedup();
        days
    }

    pub fn is_lunch_slot(&self, time_slot_id: Uuid) -> bool {
        self.lunch_slot_ids.contains(&time_slot_id)
    }

    /// Whether `time_slot_id` may be marked as lunch without exceeding
    /// `max_lunch_slots`. A slot that is already lunch is always allowed.
    pub fn can_add_lunch_slot(&self, time_slot_id: Uuid) -> bool {
        self.is_lunch_slot(time_slot_id)
            || (self.lunch_slot_ids.len() as i64) < i64::from(self.max_lunch_slots)
    }

    /// The lunch set after marking (`make_lunch`) or unmarking a slot.
    pub fn toggled_lunch_slots(&self, time_slot_id: Uuid, make_lunch: bool) -> Vec<Uuid> {
        toggle_lunch_slot_ids(&self.lunch_slot_ids, time_slot_id, make_lunch)
    }
}

pub fn toggle_lunch_slot_ids(current: &[Uuid], time_slot_id: Uuid, make_lunch: bool) -> Vec<Uuid> {
    if make_lunch {
        let mut ids = current.to_vec();
        if !ids.contains(&time_slot_id) {
            ids.push(time_slot_id);
        }
        ids
    } else {
        current
            .iter()
            .copied()
            .filter(|&id| id != time_slot_id)
            .collect()
    }
}

/// Values for a freshly created settings row.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSettings {
    pub enabled_days: Vec<i16>,
    pub max_lunch_slots: i32,
    pub lunch_slot_ids: Vec<Uuid>,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            enabled_days: Weekday::WEEKDAYS.iter().map(|d| d.id()).collect(),
            max_lunch_slots: DEFAULT_MAX_LUNCH_SLOTS,
            lunch_slot_ids: Vec::new(),
        }
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub enabled_days: Option<Vec<i16>>,
    pub max_lunch_slots: Option<i32>,
    pub lunch_slot_ids: Option<Vec<Uuid>>,
}

impl SettingsPatch {
    pub fn enabled_days(days: &[Weekday]) -> Self {
        Self {
            enabled_days: Some(days.iter().map(|d| d.id()).collect()),
            ..Default::default()
        }
    }

    pub fn max_lunch_slots(max: i32) -> Self {
        Self {
            max_lunch_slots: Some(max),
            ..Default::default()
        }
    }

    pub fn lunch_slot_ids(ids: Vec<Uuid>) -> Self {
        Self {
            lunch_slot_ids: Some(ids),
            ..Default::default()
        }
    }
}

pub fn validate_enabled_days(ids: &[i16]) -> TimetableResult<Vec<Weekday>> {
    let days = Weekday::parse_set(ids)?;
    if days.is_empty() {
        return Err(TimetableError::Validation(
            "At least one day must be enabled".to_string(),
        ));
    }
    Ok(days)
}

pub fn validate_max_lunch_slots(max: i32) -> TimetableResult<i32> {
    if max < 0 {
        return Err(TimetableError::Validation(
            "Maximum lunch slots cannot be negative".to_string(),
        ));
    }
    Ok(max)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnabledDaysRequest {
    pub enabled_days: Vec<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMaxLunchSlotsRequest {
    pub max_lunch_slots: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLunchSlotsRequest {
    pub lunch_slot_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLunchSlotRequest {
    pub is_lunch: bool,
}
