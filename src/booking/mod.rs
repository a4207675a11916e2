//! Booking transactor and appointment lifecycle operations.
//!
//! This module owns the only code paths allowed to flip a slot between open
//! and booked, and the only path that moves an appointment into `Approved`.
//! Slot state and appointment status always change through the repository's
//! atomic [`commit_booking`] write, guarded by the slot list's version tag,
//! so the two records cannot drift apart: for every approved appointment
//! there is exactly one booked slot, and releasing is symmetric with
//! booking.
//!
//! Concurrent attempts against the same slot are serialized by the
//! compare-and-swap check. The loser re-reads, finds the slot taken, and
//! observes [`BookingError::SlotUnavailable`] without mutating anything;
//! retries are safe because the availability check is idempotent.
//!
//! [`commit_booking`]: crate::db::repository::BookingRepository::commit_booking

pub mod error;

pub use error::{BookingError, BookingResult};

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::api::{
    Appointment, AppointmentId, AppointmentStatus, FacultyId, MeetingType, TimeRange,
};
use crate::availability::{self, SchedulingSettings};
use crate::db::repository::{
    AppointmentRepository, AvailabilityRepository, BookingRepository, FullRepository,
    RepositoryError,
};

/// Payload for creating a new appointment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub faculty_id: FacultyId,
    pub date: NaiveDate,
    pub time_slot: TimeRange,
    pub purpose: String,
    pub meeting_type: MeetingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Lifecycle change request for [`set_appointment_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
    /// Proposed new date when rescheduling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_date: Option<NaiveDate>,
    /// Proposed new slot when rescheduling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_time_slot: Option<TimeRange>,
}

impl StatusChange {
    pub fn cancel() -> Self {
        StatusChange {
            status: AppointmentStatus::Cancelled,
            new_date: None,
            new_time_slot: None,
        }
    }

    pub fn reschedule(new_date: Option<NaiveDate>, new_time_slot: Option<TimeRange>) -> Self {
        StatusChange {
            status: AppointmentStatus::Reschedule,
            new_date,
            new_time_slot,
        }
    }
}

/// Create a `Pending` appointment for a currently open slot.
///
/// The open check here is advisory (the booking commit is the authority);
/// it rejects requests against slots the requester could never have been
/// shown as choosable.
pub async fn request_appointment(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    request: AppointmentRequest,
) -> BookingResult<Appointment> {
    let slots =
        availability::get_or_create_day_slots(repo, settings, &request.faculty_id, request.date)
            .await?;

    let slot = slots.slot(&request.time_slot).ok_or(BookingError::SlotNotFound {
        faculty_id: request.faculty_id.clone(),
        date: request.date,
        time_slot: request.time_slot,
    })?;
    if !slot.is_open() {
        return Err(BookingError::SlotUnavailable {
            faculty_id: request.faculty_id.clone(),
            date: request.date,
            time_slot: request.time_slot,
        });
    }

    let appointment = Appointment {
        id: AppointmentId::generate(),
        faculty_id: request.faculty_id,
        date: request.date,
        time_slot: request.time_slot,
        purpose: request.purpose,
        meeting_type: request.meeting_type,
        details: request.details,
        participants: request.participants,
        status: AppointmentStatus::Pending,
    };
    repo.insert_appointment(&appointment).await?;
    info!(
        "appointment {} requested with faculty {} on {} at {}",
        appointment.id, appointment.faculty_id, appointment.date, appointment.time_slot
    );
    Ok(appointment)
}

/// Book a slot for an appointment: the `Pending → Approved` transition.
///
/// The only writer permitted to flip a slot from open to booked and the only
/// writer permitted to approve an appointment. Exactly one of any set of
/// concurrent attempts on the same slot succeeds; every loser observes
/// [`BookingError::SlotUnavailable`] or, if retries run out mid-race,
/// [`BookingError::TransactionConflict`], and mutates nothing.
pub async fn book_slot(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    faculty_id: &FacultyId,
    date: NaiveDate,
    time_slot: &TimeRange,
    appointment_id: &AppointmentId,
) -> BookingResult<()> {
    let appointment = repo
        .fetch_appointment(appointment_id)
        .await?
        .ok_or_else(|| BookingError::AppointmentNotFound(appointment_id.clone()))?;

    if !appointment
        .status
        .can_transition_to(AppointmentStatus::Approved)
    {
        return Err(BookingError::InvalidTransition {
            id: appointment_id.clone(),
            from: appointment.status,
            to: AppointmentStatus::Approved,
        });
    }
    if appointment.faculty_id != *faculty_id
        || appointment.date != date
        || appointment.time_slot != *time_slot
    {
        return Err(BookingError::AppointmentMismatch {
            id: appointment_id.clone(),
            date,
            time_slot: *time_slot,
        });
    }

    let approved = Appointment {
        status: AppointmentStatus::Approved,
        ..appointment
    };

    let mut attempts = 0;
    loop {
        let stored = repo
            .fetch_day_slots(faculty_id, date)
            .await?
            .ok_or(BookingError::SlotNotFound {
                faculty_id: faculty_id.clone(),
                date,
                time_slot: *time_slot,
            })?;

        let mut slots = stored.slots;
        let slot = slots.slot_mut(time_slot).ok_or(BookingError::SlotNotFound {
            faculty_id: faculty_id.clone(),
            date,
            time_slot: *time_slot,
        })?;
        if !slot.is_open() {
            return Err(BookingError::SlotUnavailable {
                faculty_id: faculty_id.clone(),
                date,
                time_slot: *time_slot,
            });
        }
        slot.booked = true;

        match repo
            .commit_booking(faculty_id, date, &slots, &stored.version, &approved)
            .await
        {
            Ok(_) => {
                info!(
                    "appointment {} approved; booked {} on {} for faculty {}",
                    appointment_id, time_slot, date, faculty_id
                );
                return Ok(());
            }
            Err(RepositoryError::VersionConflict { .. }) if attempts < settings.booking_retries => {
                attempts += 1;
                debug!(
                    "booking conflict for {} on {} at {} (attempt {}), re-checking",
                    faculty_id, date, time_slot, attempts
                );
            }
            Err(RepositoryError::VersionConflict { .. }) => {
                return Err(BookingError::TransactionConflict {
                    faculty_id: faculty_id.clone(),
                    date,
                    time_slot: *time_slot,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Release a previously booked slot: set `booked = false`.
///
/// Releasing a slot that is not booked is a no-op. The symmetric counterpart
/// of [`book_slot`], used when an approved appointment is cancelled or
/// rescheduled.
pub async fn release_slot(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    faculty_id: &FacultyId,
    date: NaiveDate,
    time_slot: &TimeRange,
) -> BookingResult<()> {
    let mut attempts = 0;
    loop {
        let stored = repo
            .fetch_day_slots(faculty_id, date)
            .await?
            .ok_or(BookingError::SlotNotFound {
                faculty_id: faculty_id.clone(),
                date,
                time_slot: *time_slot,
            })?;

        let mut slots = stored.slots;
        let slot = slots.slot_mut(time_slot).ok_or(BookingError::SlotNotFound {
            faculty_id: faculty_id.clone(),
            date,
            time_slot: *time_slot,
        })?;
        if !slot.booked {
            return Ok(());
        }
        slot.booked = false;

        match repo
            .update_day_slots(faculty_id, date, &slots, &stored.version)
            .await
        {
            Ok(_) => {
                info!("released {} on {} for faculty {}", time_slot, date, faculty_id);
                return Ok(());
            }
            Err(RepositoryError::VersionConflict { .. }) if attempts < settings.booking_retries => {
                attempts += 1;
            }
            Err(RepositoryError::VersionConflict { .. }) => {
                return Err(BookingError::TransactionConflict {
                    faculty_id: faculty_id.clone(),
                    date,
                    time_slot: *time_slot,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Drive a non-approval lifecycle transition.
///
/// `Approved` is rejected here: approval books a slot and must go through
/// [`book_slot`]. Cancelling or rescheduling an approved appointment
/// releases its slot atomically with the status write, so the slot cannot
/// stay blocked with no live appointment behind it.
pub async fn set_appointment_status(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    appointment_id: &AppointmentId,
    change: StatusChange,
) -> BookingResult<Appointment> {
    let appointment = repo
        .fetch_appointment(appointment_id)
        .await?
        .ok_or_else(|| BookingError::AppointmentNotFound(appointment_id.clone()))?;

    let from = appointment.status;
    if change.status == AppointmentStatus::Approved || !from.can_transition_to(change.status) {
        return Err(BookingError::InvalidTransition {
            id: appointment_id.clone(),
            from,
            to: change.status,
        });
    }

    let mut updated = appointment.clone();
    updated.status = change.status;
    if change.status == AppointmentStatus::Reschedule {
        if let Some(new_date) = change.new_date {
            updated.date = new_date;
        }
        if let Some(new_time_slot) = change.new_time_slot {
            updated.time_slot = new_time_slot;
        }
    }

    if from == AppointmentStatus::Approved {
        // The slot booked at approval time must come free together with the
        // status write; the coordinates are the pre-reschedule ones.
        release_with_status(repo, settings, &appointment, &updated).await?;
    } else {
        repo.store_appointment(&updated).await.map_err(|e| match e {
            RepositoryError::NotFound { .. } => {
                BookingError::AppointmentNotFound(appointment_id.clone())
            }
            other => BookingError::Repository(other),
        })?;
    }

    info!(
        "appointment {} moved from {} to {}",
        appointment_id, from, updated.status
    );
    Ok(updated)
}

/// Atomically release the slot an approved appointment held and write its
/// new record, through the same coupled commit used for booking.
async fn release_with_status(
    repo: &dyn FullRepository,
    settings: &SchedulingSettings,
    previous: &Appointment,
    updated: &Appointment,
) -> BookingResult<()> {
    let faculty_id = &previous.faculty_id;
    let date = previous.date;
    let time_slot = previous.time_slot;

    let mut attempts = 0;
    loop {
        let stored = match repo.fetch_day_slots(faculty_id, date).await? {
            Some(stored) => stored,
            None => {
                // Slot list vanished (regeneration edge); the status write
                // still has to land.
                repo.store_appointment(updated).await?;
                return Ok(());
            }
        };

        let mut slots = stored.slots;
        match slots.slot_mut(&time_slot) {
            Some(slot) if slot.booked => slot.booked = false,
            _ => {
                repo.store_appointment(updated).await?;
                return Ok(());
            }
        }

        match repo
            .commit_booking(faculty_id, date, &slots, &stored.version, updated)
            .await
        {
            Ok(_) => return Ok(()),
            Err(RepositoryError::VersionConflict { .. }) if attempts < settings.booking_retries => {
                attempts += 1;
            }
            Err(RepositoryError::VersionConflict { .. }) => {
                return Err(BookingError::TransactionConflict {
                    faculty_id: faculty_id.clone(),
                    date,
                    time_slot,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
}
