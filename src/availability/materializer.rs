//! Lazy materialization of per-date slot lists.
//!
//! A `(faculty, date)` pair has no slot list until the first request for that
//! date; the materializer then builds one from the time grid and the faculty
//! member's recurring commitments and persists it. Later requests return the
//! stored list untouched, so booking state always survives.

use chrono::NaiveDate;
use log::debug;

use crate::api::{DaySlots, FacultyId, RecurringCommitment};
use crate::db::repository::{AvailabilityRepository, FullRepository, RepositoryResult};

use super::{grid, recurring, SchedulingSettings};

/// Assemble a day's slot list from the grid, the default open window, and
/// the commitments blocking `date`.
///
/// Pure: persistence and commitment lookup happen in the callers. When
/// `previous` is given, `booked` flags are carried forward so regeneration
/// can never downgrade a booked slot.
pub fn compute_day_slots(
    settings: &SchedulingSettings,
    date: NaiveDate,
    commitments: &[RecurringCommitment],
    previous: Option<&DaySlots>,
) -> DaySlots {
    let mut slots = match settings.open_window() {
        Some(window) => grid::generate_grid(window, settings.slot_minutes),
        None => DaySlots::default(),
    };

    let open_day = settings.weekends_open || !recurring::is_weekend(date);
    if open_day {
        for slot in slots.iter_mut() {
            slot.available = true;
        }
        for blocked in recurring::blocked_intervals(date, commitments) {
            for slot in slots.iter_mut() {
                if slot.time.overlaps(&blocked) {
                    slot.available = false;
                }
            }
        }
    }

    if let Some(previous) = previous {
        slots.carry_bookings_from(previous);
    }

    slots
}

/// Return the persisted slot list for `(faculty_id, date)`, creating it on
/// first request.
///
/// Creation is idempotent under concurrency: the insert is first-writer-wins
/// and losers adopt the stored list, so two racing requests for a fresh date
/// converge on one persisted grid.
pub async fn get_or_create_day_slots(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    faculty_id: &FacultyId,
    date: NaiveDate,
) -> RepositoryResult<DaySlots> {
    if let Some(stored) = repo.fetch_day_slots(faculty_id, date).await? {
        return Ok(stored.slots);
    }

    debug!("materializing slots for faculty {} on {}", faculty_id, date);
    let commitments = repo.fetch_recurring_commitments(faculty_id).await?;
    let slots = compute_day_slots(settings, date, &commitments, None);
    let stored = repo.insert_day_slots_if_absent(faculty_id, date, &slots).await?;
    Ok(stored.slots)
}

/// Rebuild the slot list for a date after the recurring schedule changed.
///
/// Availability is recomputed from the current commitments while every
/// `booked` flag is preserved; the write goes through the compare-and-swap
/// path, so a booking that lands mid-regeneration wins and the caller may
/// retry.
pub async fn regenerate_day_slots(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    faculty_id: &FacultyId,
    date: NaiveDate,
) -> RepositoryResult<DaySlots> {
    let commitments = repo.fetch_recurring_commitments(faculty_id).await?;
    match repo.fetch_day_slots(faculty_id, date).await? {
        Some(stored) => {
            let rebuilt = compute_day_slots(settings, date, &commitments, Some(&stored.slots));
            repo.update_day_slots(faculty_id, date, &rebuilt, &stored.version)
                .await?;
            debug!(
                "regenerated slots for faculty {} on {} ({} booked preserved)",
                faculty_id,
                date,
                rebuilt.booked_count()
            );
            Ok(rebuilt)
        }
        None => {
            let slots = compute_day_slots(settings, date, &commitments, None);
            let stored = repo.insert_day_slots_if_absent(faculty_id, date, &slots).await?;
            Ok(stored.slots)
        }
    }
}

/// The labels a requester currently sees as choosable for `date`:
/// slots that are `available && !booked`.
pub async fn list_open_slots(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    faculty_id: &FacultyId,
    date: NaiveDate,
) -> RepositoryResult<Vec<String>> {
    let slots = get_or_create_day_slots(repo, settings, faculty_id, date).await?;
    Ok(slots.open_labels())
}
