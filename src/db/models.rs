//! Shared data models re-exported for database layer consumers.

pub use crate::api::{
    Appointment, AppointmentId, AppointmentStatus, DaySlots, FacultyId, RecurringCommitment, Slot,
};

use serde::{Deserialize, Serialize};

use super::checksum::slot_list_version;

/// A persisted day slot list together with its version tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedDaySlots {
    pub slots: DaySlots,
    /// Checksum of `slots` at write time; compare-and-swap writes must
    /// present it unchanged.
    pub version: String,
}

impl VersionedDaySlots {
    /// Wrap a slot list, stamping its current version tag.
    pub fn new(slots: DaySlots) -> Self {
        let version = slot_list_version(&slots);
        VersionedDaySlots { slots, version }
    }
}
