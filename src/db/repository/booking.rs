//! Booking repository trait: the coupled slot-and-appointment write.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{Appointment, DaySlots, FacultyId};

/// Repository trait for the one write that must move two records together.
///
/// Approving an appointment books a slot; cancelling an approved appointment
/// releases one. In both cases the slot list and the appointment record must
/// change as a unit, or the store ends up with a booked slot and no approved
/// appointment (or the reverse). Implementations must apply both writes
/// inside a single transaction of the underlying store.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomically replace a date's slot list (compare-and-swap on
    /// `expected_version`) and the appointment record.
    ///
    /// Either both writes apply or neither does; no partial state is ever
    /// observable.
    ///
    /// # Returns
    /// * `Ok(String)` - the slot list's new version tag
    /// * `Err(RepositoryError::VersionConflict)` - a concurrent writer won;
    ///   nothing was written
    /// * `Err(RepositoryError::NotFound)` - the slot list or the appointment
    ///   does not exist; nothing was written
    async fn commit_booking(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
        expected_version: &str,
        appointment: &Appointment,
    ) -> RepositoryResult<String>;
}
