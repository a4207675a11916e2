use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes in a full day; also the exclusive upper bound for interval ends.
const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when a clock or interval label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time label: {0:?}")]
pub struct TimeParseError(String);

impl TimeParseError {
    fn new(label: &str) -> Self {
        TimeParseError(label.to_string())
    }
}

/// Clock time as minutes since midnight.
///
/// This is the canonical internal representation for all slot and commitment
/// times; the 12-hour label (`"h:mm AM"`) is produced and consumed only at
/// serialization boundaries. Noon is `12:00 PM`, midnight is `12:00 AM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight (start of day).
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    /// Exclusive end of day (midnight of the following day).
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Create from minutes since midnight. `1440` is allowed so a window can
    /// end at midnight of the following day.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes <= MINUTES_PER_DAY {
            Some(TimeOfDay(minutes))
        } else {
            None
        }
    }

    /// Create from a 24-hour clock reading.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else if hour == 24 && minute == 0 {
            Some(TimeOfDay(MINUTES_PER_DAY))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1440 wraps to the midnight label.
        let total = self.0 % MINUTES_PER_DAY;
        let hour24 = total / 60;
        let minute = total % 60;
        let (hour12, suffix) = match hour24 {
            0 => (12, "AM"),
            1..=11 => (hour24, "AM"),
            12 => (12, "PM"),
            _ => (hour24 - 12, "PM"),
        };
        write!(f, "{}:{:02} {}", hour12, minute, suffix)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    /// Parse a 12-hour label such as `"7:00 AM"` or `"12:30 pm"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase();
        let (clock, is_pm) = if let Some(rest) = lower.strip_suffix("am") {
            (rest.trim_end(), false)
        } else if let Some(rest) = lower.strip_suffix("pm") {
            (rest.trim_end(), true)
        } else {
            return Err(TimeParseError::new(raw));
        };

        let (h, m) = clock.split_once(':').ok_or_else(|| TimeParseError::new(raw))?;
        let hour: u16 = h.trim().parse().map_err(|_| TimeParseError::new(raw))?;
        let minute: u16 = m.trim().parse().map_err(|_| TimeParseError::new(raw))?;
        if !(1..=12).contains(&hour) || minute >= 60 {
            return Err(TimeParseError::new(raw));
        }

        // Hour 12 is the start of its half-day: 12 AM = 00:xx, 12 PM = 12:xx.
        let hour24 = if is_pm { hour % 12 + 12 } else { hour % 12 };
        Ok(TimeOfDay(hour24 * 60 + minute))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open time interval `[start, end)` within a day.
///
/// The canonical label is the range form `"h:mm AM - h:mm PM"`; it is the
/// identity of a slot within a day's list and the only textual interval
/// format persisted or accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TimeRange {
    /// Create a range; `start` must be strictly before `end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        if start < end {
            Some(TimeRange { start, end })
        } else {
            None
        }
    }

    /// Create a range from raw minute offsets.
    pub fn from_minutes(start: u16, end: u16) -> Option<Self> {
        Self::new(TimeOfDay::from_minutes(start)?, TimeOfDay::from_minutes(end)?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Half-open interval overlap: `[a, b)` and `[c, d)` overlap iff
    /// `a < d && b > c`. This is the single overlap rule used everywhere.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `t` falls inside the interval.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.start <= t && t < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl FromStr for TimeRange {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (start, end) = raw.split_once(" - ").ok_or_else(|| TimeParseError::new(raw))?;
        let start: TimeOfDay = start.parse()?;
        let mut end: TimeOfDay = end.parse()?;
        // A range cannot end at the day's start, so an end label of midnight
        // means midnight of the following day (the full-day grid's last slot).
        if end == TimeOfDay::MIDNIGHT {
            end = TimeOfDay::END_OF_DAY;
        }
        TimeRange::new(start, end).ok_or_else(|| TimeParseError::new(raw))
    }
}

impl Serialize for TimeRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
