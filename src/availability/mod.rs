//! Availability generation and materialization.
//!
//! This module turns a faculty member's weekly recurring commitments into
//! concrete per-date slot lists:
//!
//! - [`grid`]: the pure time-grid generator (fixed-width intervals across an
//!   operating window)
//! - [`recurring`]: resolves weekly commitments onto a target calendar date
//!   as blocked intervals
//! - [`materializer`]: lazily creates and persists a date's slot list the
//!   first time it is requested, and regenerates it without ever downgrading
//!   a booked slot

pub mod grid;
pub mod materializer;
pub mod recurring;

pub use grid::generate_grid;
pub use materializer::{
    compute_day_slots, get_or_create_day_slots, list_open_slots, regenerate_day_slots,
};
pub use recurring::{blocked_intervals, is_weekend};

use serde::{Deserialize, Serialize};

use crate::api::{TimeOfDay, TimeRange};

/// Operating window and slot parameters used when materializing a day.
///
/// Loaded from the `[scheduling]` section of `scheduling.toml`; every field
/// has a default so a missing file or section yields the stock 7 AM - 5 PM
/// half-hour grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Start of the default open window.
    #[serde(default = "default_open_start")]
    pub open_start: TimeOfDay,
    /// End of the default open window.
    #[serde(default = "default_open_end")]
    pub open_end: TimeOfDay,
    /// Slot width in minutes.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    /// Whether weekends carry default-open hours.
    #[serde(default)]
    pub weekends_open: bool,
    /// Compare-and-swap re-check attempts before a booking gives up.
    #[serde(default = "default_booking_retries")]
    pub booking_retries: u32,
}

fn default_open_start() -> TimeOfDay {
    TimeOfDay::from_hm(7, 0).unwrap_or(TimeOfDay::MIDNIGHT)
}

fn default_open_end() -> TimeOfDay {
    TimeOfDay::from_hm(17, 0).unwrap_or(TimeOfDay::END_OF_DAY)
}

fn default_slot_minutes() -> u16 {
    30
}

fn default_booking_retries() -> u32 {
    3
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        SchedulingSettings {
            open_start: default_open_start(),
            open_end: default_open_end(),
            slot_minutes: default_slot_minutes(),
            weekends_open: false,
            booking_retries: default_booking_retries(),
        }
    }
}

impl SchedulingSettings {
    /// The operating window as a range.
    pub fn open_window(&self) -> Option<TimeRange> {
        TimeRange::new(self.open_start, self.open_end)
    }
}
