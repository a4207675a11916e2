//! Bookable slots and per-date slot lists.

use serde::{Deserialize, Serialize};

use super::time::{TimeOfDay, TimeRange};

/// One fixed-width bookable interval within a day's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Interval label; unique within a day's slot list.
    pub time: TimeRange,
    /// Whether the slot falls inside the faculty's open hours.
    pub available: bool,
    /// Whether an approved appointment occupies the slot.
    pub booked: bool,
}

impl Slot {
    /// A freshly generated grid slot: outside open hours until marked.
    pub fn closed(time: TimeRange) -> Self {
        Slot {
            time,
            available: false,
            booked: false,
        }
    }

    /// A slot a requester may choose.
    pub fn is_open(&self) -> bool {
        self.available && !self.booked
    }
}

/// Ordered slot list for one faculty member on one calendar date.
///
/// Owned exclusively by that faculty member's availability record; created
/// lazily by the materializer and mutated only through the booking
/// transactor's compare-and-swap writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySlots(pub Vec<Slot>);

impl DaySlots {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slot> {
        self.0.iter_mut()
    }

    /// Find the slot with the given interval label.
    pub fn slot(&self, time: &TimeRange) -> Option<&Slot> {
        self.0.iter().find(|s| s.time == *time)
    }

    pub fn slot_mut(&mut self, time: &TimeRange) -> Option<&mut Slot> {
        self.0.iter_mut().find(|s| s.time == *time)
    }

    /// Resolve a textual label against this list. Accepts the canonical
    /// range form, or a bare start time from a stale client view.
    pub fn resolve_label(&self, label: &str) -> Option<&Slot> {
        if let Ok(range) = label.parse::<TimeRange>() {
            return self.slot(&range);
        }
        let start: TimeOfDay = label.parse().ok()?;
        self.0.iter().find(|s| s.time.start() == start)
    }

    /// Labels a requester currently sees as choosable.
    pub fn open_labels(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|s| s.is_open())
            .map(|s| s.time.to_string())
            .collect()
    }

    pub fn booked_count(&self) -> usize {
        self.0.iter().filter(|s| s.booked).count()
    }

    /// Carry `booked` flags forward from a previous version of this list.
    ///
    /// Regeneration recomputes availability from scratch, but a booked slot
    /// must never be downgraded: the flag survives for every interval that
    /// still exists in the new grid.
    pub fn carry_bookings_from(&mut self, previous: &DaySlots) {
        for slot in self.0.iter_mut() {
            if let Some(old) = previous.slot(&slot.time) {
                if old.booked {
                    slot.booked = true;
                }
            }
        }
    }
}

impl IntoIterator for DaySlots {
    type Item = Slot;
    type IntoIter = std::vec::IntoIter<Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DaySlots {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
