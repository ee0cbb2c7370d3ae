use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TimetableError;

/// A school day. Stored and serialized as its numeric id (1 = Monday ... 6 = Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Monday through Friday, the default set of enabled days.
    pub const WEEKDAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Parses a list of day ids, rejecting unknown ids and dropping duplicates.
    /// The result is sorted Monday first.
    pub fn parse_set(ids: &[i16]) -> Result<Vec<Weekday>, TimetableError> {
        let mut days = ids
            .iter()
            .map(|&id| Weekday::try_from(id))
            .collect::<Result<Vec<_>, _>>()?;
        days.sort();
        days.dedup();
        Ok(days)
    }
}

impl TryFrom<i16> for Weekday {
    type Error = TimetableError;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Weekday::from_id(id)
            .ok_or_else(|| TimetableError::Validation(format!("Invalid day id {}, expected 1-6", id)))
    }
}

impl From<Weekday> for i16 {
    fn from(day: Weekday) -> Self {
        day.id()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
