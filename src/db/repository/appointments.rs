//! Appointment repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Appointment, AppointmentId, AppointmentStatus, FacultyId};

/// Repository trait for appointment records.
///
/// Appointments are single-owner documents; they need no cross-request
/// locking beyond the coupling the booking commit enforces. Queries are
/// pull-based: callers re-read instead of subscribing to live updates.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment record.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - the ID already exists
    async fn insert_appointment(&self, appointment: &Appointment) -> RepositoryResult<()>;

    /// Fetch an appointment by ID.
    async fn fetch_appointment(
        &self,
        id: &AppointmentId,
    ) -> RepositoryResult<Option<Appointment>>;

    /// Replace an existing appointment record.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - no record with that ID
    async fn store_appointment(&self, appointment: &Appointment) -> RepositoryResult<()>;

    /// Write only the status field of an existing appointment.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - no record with that ID
    async fn update_appointment_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<()>;

    /// All appointments addressed to a faculty member, ordered by date and
    /// slot start.
    async fn list_appointments_for_faculty(
        &self,
        faculty_id: &FacultyId,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// All appointments a participant is involved in, ordered by date and
    /// slot start.
    async fn list_appointments_for_participant(
        &self,
        participant: &str,
    ) -> RepositoryResult<Vec<Appointment>>;
}
