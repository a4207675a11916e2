//! In-memory repository backend.
//!
//! `LocalRepository` keeps the whole store behind a single
//! `parking_lot::RwLock`, which makes every compare-and-swap check and the
//! coupled booking commit linearizable: a write observes the version tags
//! and applies its mutations without any interleaving writer. That is the
//! same guarantee a transactional document store provides, which is exactly
//! what the unit and integration tests need to exercise booking races.
//!
//! Intended for unit testing and local development; production deployments
//! plug a durable backend into the same traits through the factory.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::api::{
    Appointment, AppointmentId, AppointmentStatus, DaySlots, FacultyId, RecurringCommitment,
};
use crate::db::models::VersionedDaySlots;
use crate::db::repository::{
    AppointmentRepository, AvailabilityRepository, BookingRepository, ErrorContext,
    RepositoryError, RepositoryResult,
};

#[derive(Default)]
struct Store {
    commitments: HashMap<FacultyId, Vec<RecurringCommitment>>,
    /// Per-faculty availability records; one entry per materialized date.
    availability: HashMap<FacultyId, BTreeMap<NaiveDate, VersionedDaySlots>>,
    appointments: HashMap<AppointmentId, Appointment>,
}

/// In-memory implementation of the full repository surface.
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        LocalRepository {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn slots_key(faculty_id: &FacultyId, date: NaiveDate) -> String {
    format!("{}/{}", faculty_id, date)
}

fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| (a.date, a.time_slot.start()));
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn fetch_recurring_commitments(
        &self,
        faculty_id: &FacultyId,
    ) -> RepositoryResult<Vec<RecurringCommitment>> {
        let store = self.store.read();
        Ok(store.commitments.get(faculty_id).cloned().unwrap_or_default())
    }

    async fn store_recurring_commitments(
        &self,
        faculty_id: &FacultyId,
        commitments: &[RecurringCommitment],
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store
            .commitments
            .insert(faculty_id.clone(), commitments.to_vec());
        Ok(())
    }

    async fn fetch_day_slots(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<VersionedDaySlots>> {
        let store = self.store.read();
        Ok(store
            .availability
            .get(faculty_id)
            .and_then(|dates| dates.get(&date))
            .cloned())
    }

    async fn insert_day_slots_if_absent(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
    ) -> RepositoryResult<VersionedDaySlots> {
        let mut store = self.store.write();
        let dates = store.availability.entry(faculty_id.clone()).or_default();
        let stored = dates
            .entry(date)
            .or_insert_with(|| VersionedDaySlots::new(slots.clone()));
        Ok(stored.clone())
    }

    async fn update_day_slots(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
        expected_version: &str,
    ) -> RepositoryResult<String> {
        let mut store = self.store.write();
        let stored = store
            .availability
            .get_mut(faculty_id)
            .and_then(|dates| dates.get_mut(&date))
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "day slot list not materialized",
                    ErrorContext::new("update_day_slots")
                        .with_entity("day_slots")
                        .with_entity_id(slots_key(faculty_id, date)),
                )
            })?;

        if stored.version != expected_version {
            return Err(RepositoryError::conflict_with_context(
                "slot list changed since read",
                ErrorContext::new("update_day_slots")
                    .with_entity("day_slots")
                    .with_entity_id(slots_key(faculty_id, date)),
            ));
        }

        *stored = VersionedDaySlots::new(slots.clone());
        Ok(stored.version.clone())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl AppointmentRepository for LocalRepository {
    async fn insert_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store.appointments.contains_key(&appointment.id) {
            return Err(RepositoryError::validation_with_context(
                "appointment id already exists",
                ErrorContext::new("insert_appointment")
                    .with_entity("appointment")
                    .with_entity_id(&appointment.id),
            ));
        }
        store
            .appointments
            .insert(appointment.id.clone(), appointment.clone());
        Ok(())
    }

    async fn fetch_appointment(
        &self,
        id: &AppointmentId,
    ) -> RepositoryResult<Option<Appointment>> {
        let store = self.store.read();
        Ok(store.appointments.get(id).cloned())
    }

    async fn store_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let existing = store.appointments.get_mut(&appointment.id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "appointment not found",
                ErrorContext::new("store_appointment")
                    .with_entity("appointment")
                    .with_entity_id(&appointment.id),
            )
        })?;
        *existing = appointment.clone();
        Ok(())
    }

    async fn update_appointment_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let existing = store.appointments.get_mut(id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "appointment not found",
                ErrorContext::new("update_appointment_status")
                    .with_entity("appointment")
                    .with_entity_id(id),
            )
        })?;
        existing.status = status;
        Ok(())
    }

    async fn list_appointments_for_faculty(
        &self,
        faculty_id: &FacultyId,
    ) -> RepositoryResult<Vec<Appointment>> {
        let store = self.store.read();
        let mut appointments: Vec<Appointment> = store
            .appointments
            .values()
            .filter(|a| a.faculty_id == *faculty_id)
            .cloned()
            .collect();
        sort_appointments(&mut appointments);
        Ok(appointments)
    }

    async fn list_appointments_for_participant(
        &self,
        participant: &str,
    ) -> RepositoryResult<Vec<Appointment>> {
        let store = self.store.read();
        let mut appointments: Vec<Appointment> = store
            .appointments
            .values()
            .filter(|a| a.participants.iter().any(|p| p == participant))
            .cloned()
            .collect();
        sort_appointments(&mut appointments);
        Ok(appointments)
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn commit_booking(
        &self,
        faculty_id: &FacultyId,
        date: NaiveDate,
        slots: &DaySlots,
        expected_version: &str,
        appointment: &Appointment,
    ) -> RepositoryResult<String> {
        let mut store = self.store.write();

        // Validate everything before mutating anything, so a failed commit
        // leaves the store exactly as it was.
        let stored_version = store
            .availability
            .get(faculty_id)
            .and_then(|dates| dates.get(&date))
            .map(|v| v.version.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "day slot list not materialized",
                    ErrorContext::new("commit_booking")
                        .with_entity("day_slots")
                        .with_entity_id(slots_key(faculty_id, date)),
                )
            })?;

        if stored_version != expected_version {
            return Err(RepositoryError::conflict_with_context(
                "slot list changed since read",
                ErrorContext::new("commit_booking")
                    .with_entity("day_slots")
                    .with_entity_id(slots_key(faculty_id, date)),
            ));
        }

        if !store.appointments.contains_key(&appointment.id) {
            return Err(RepositoryError::not_found_with_context(
                "appointment not found",
                ErrorContext::new("commit_booking")
                    .with_entity("appointment")
                    .with_entity_id(&appointment.id),
            ));
        }

        let replacement = VersionedDaySlots::new(slots.clone());
        let version = replacement.version.clone();
        if let Some(dates) = store.availability.get_mut(faculty_id) {
            dates.insert(date, replacement);
        }
        store
            .appointments
            .insert(appointment.id.clone(), appointment.clone());

        Ok(version)
    }
}
