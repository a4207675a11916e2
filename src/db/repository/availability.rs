//! Availability repository trait: recurring schedules and day slot lists.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{DaySlots, FacultyId, RecurringCommitment};
use crate::db::models::VersionedDaySlots;

/// Repository trait for a faculty member's availability records.
///
/// Slot lists are keyed by `(faculty_id, date)`; writes touch only the
/// addressed date and must never clobber a faculty member's other dates.
/// All mutations of an existing list go through [`update_day_slots`], a
/// compare-and-swap write guarded by the list's version tag, which is what
/// makes concurrent "read, check, mark booked" sequences serializable.
///
/// [`update_day_slots`]: AvailabilityRepository::update_day_slots
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Fetch the weekly recurring schedule for a faculty member.
    ///
    /// A faculty member with nothing on file yields an empty vector, not an
    /// error (no recurring schedule means no blocked intervals).
    async fn fetch_recurring_commitments(
        &self,
        faculty_id: &FacultyId,
    ) -> RepositoryResult<Vec<RecurringCommitment>>;

    /// Replace the weekly recurring schedule for a faculty member.
    async fn store_recurring_commitments(
        &self,
        faculty_id: &FacultyId,
        commitments: &[RecurringCommitment],
    ) -> RepositoryResult<()>;

    /// Fetch the persisted slot list for a date, with its version tag.
    ///
    /// # Returns
    /// * `Ok(None)` - the date has never been materialized
    async fn fetch_day_slots(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<VersionedDaySlots>>;

    /// Insert a freshly materialized slot list unless one already exists.
    ///
    /// First writer wins: when a concurrent materializer stored a list
    /// first, that stored list is returned instead of `slots`, making
    /// materialization idempotent under races.
    async fn insert_day_slots_if_absent(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
    ) -> RepositoryResult<VersionedDaySlots>;

    /// Replace a date's slot list, guarded by its version tag.
    ///
    /// # Returns
    /// * `Ok(String)` - the new version tag
    /// * `Err(RepositoryError::VersionConflict)` - a concurrent writer
    ///   committed first; re-read before retrying
    /// * `Err(RepositoryError::NotFound)` - the date was never materialized
    async fn update_day_slots(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
        expected_version: &str,
    ) -> RepositoryResult<String>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
