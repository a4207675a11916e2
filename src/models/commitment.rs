//! Weekly recurring commitments (classes and consultations).

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::time::TimeRange;

/// What kind of commitment blocks the hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentKind {
    Class,
    Consultation,
}

/// A weekly-repeating blocked interval, independent of specific dates.
///
/// Entered by faculty; the source of truth for which hours are structurally
/// blocked on a given weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCommitment {
    /// Weekday the commitment repeats on (persisted as 0=Sunday..6=Saturday).
    #[serde(with = "weekday_from_sunday")]
    pub day_of_week: Weekday,
    /// Blocked interval on that weekday.
    pub time: TimeRange,
    pub kind: CommitmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl RecurringCommitment {
    /// Minimal constructor for the common case; descriptive fields default
    /// to empty.
    pub fn new(day_of_week: Weekday, time: TimeRange, kind: CommitmentKind) -> Self {
        RecurringCommitment {
            day_of_week,
            time,
            kind,
            subject: None,
            section: None,
            room: None,
        }
    }
}

/// Serde adapter persisting weekdays as Sunday-based ordinals (0=Sunday).
mod weekday_from_sunday {
    use chrono::Weekday;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(day.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            n => Err(de::Error::custom(format!("weekday ordinal out of range: {}", n))),
        }
    }
}
