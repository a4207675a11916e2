//! Booking error taxonomy.

use chrono::NaiveDate;

use crate::api::{AppointmentId, AppointmentStatus, FacultyId, TimeRange};
use crate::db::repository::RepositoryError;

/// Result type for booking and lifecycle operations.
pub type BookingResult<T> = Result<T, BookingError>;

/// Errors surfaced by the booking transactor and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The requested interval label does not exist in the day's grid (or the
    /// day was never materialized). Signals a stale client view; not
    /// retryable.
    #[error("slot {time_slot} not found for faculty {faculty_id} on {date}")]
    SlotNotFound {
        faculty_id: FacultyId,
        date: NaiveDate,
        time_slot: TimeRange,
    },

    /// The slot exists but is closed or already booked. Not retryable
    /// without re-fetching fresh availability.
    #[error("slot {time_slot} is not available for faculty {faculty_id} on {date}")]
    SlotUnavailable {
        faculty_id: FacultyId,
        date: NaiveDate,
        time_slot: TimeRange,
    },

    /// A concurrent writer kept winning the compare-and-swap race.
    /// Retryable after re-reading current availability.
    #[error("booking conflict for faculty {faculty_id} on {date} at {time_slot}")]
    TransactionConflict {
        faculty_id: FacultyId,
        date: NaiveDate,
        time_slot: TimeRange,
    },

    /// No appointment record with this ID.
    #[error("appointment {0} not found")]
    AppointmentNotFound(AppointmentId),

    /// The appointment's stored coordinates do not match the requested slot.
    #[error("appointment {id} does not reference {time_slot} on {date}")]
    AppointmentMismatch {
        id: AppointmentId,
        date: NaiveDate,
        time_slot: TimeRange,
    },

    /// The requested status change violates the lifecycle state machine.
    #[error("cannot move appointment {id} from {from} to {to}")]
    InvalidTransition {
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BookingError {
    /// Whether retrying the operation (after a re-read) can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::TransactionConflict { .. } => true,
            BookingError::Repository(e) => e.is_retryable(),
            _ => false,
        }
    }
}
