//! Time grid generation.

use crate::api::{DaySlots, Slot, TimeRange};

/// Generate the canonical slot grid for one day.
///
/// Produces contiguous, non-overlapping half-open intervals of `slot_minutes`
/// width covering `window`, each starting closed (`available = false`,
/// `booked = false`). A trailing partial interval that would cross the window
/// end is not emitted, so the slot count is `window_minutes / slot_minutes`.
///
/// Pure and deterministic for a given window and width.
pub fn generate_grid(window: TimeRange, slot_minutes: u16) -> DaySlots {
    if slot_minutes == 0 {
        return DaySlots::default();
    }

    let end = window.end().minutes();
    let mut slots = Vec::with_capacity(usize::from(window.duration_minutes() / slot_minutes));
    let mut start = window.start().minutes();
    while start + slot_minutes <= end {
        if let Some(time) = TimeRange::from_minutes(start, start + slot_minutes) {
            slots.push(Slot::closed(time));
        }
        start += slot_minutes;
    }

    DaySlots(slots)
}
