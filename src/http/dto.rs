//! Request and response types for the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{Appointment, RecurringCommitment, Slot, TimeRange};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Date selector for slot queries.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// One slot as presented to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDto {
    /// Canonical interval label, e.g. `"2:00 PM - 2:30 PM"`
    pub time: String,
    pub available: bool,
    pub booked: bool,
}

impl From<&Slot> for SlotDto {
    fn from(slot: &Slot) -> Self {
        SlotDto {
            time: slot.time.to_string(),
            available: slot.available,
            booked: slot.booked,
        }
    }
}

/// Full materialized slot list for a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub faculty_id: String,
    pub date: NaiveDate,
    pub slots: Vec<SlotDto>,
}

/// Labels a requester may currently choose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlotsResponse {
    pub faculty_id: String,
    pub date: NaiveDate,
    pub slots: Vec<String>,
}

/// Weekly schedule upload/readback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentsPayload {
    pub commitments: Vec<RecurringCommitment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentsResponse {
    pub faculty_id: String,
    pub commitments: Vec<RecurringCommitment>,
    pub total: usize,
}

/// Appointment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
    pub total: usize,
}

/// Proposed new coordinates for a reschedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RescheduleRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_slot: Option<TimeRange>,
}
