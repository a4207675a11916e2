//! Appointment records and their lifecycle state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{AppointmentId, FacultyId};

use super::time::TimeRange;

/// How the meeting takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    F2f,
    Online,
}

/// Appointment lifecycle status.
///
/// Created as `Pending`; `Approved` is reachable only through the booking
/// transactor, which couples the status write to the slot booking.
/// `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
    Reschedule,
}

impl AppointmentStatus {
    /// Whether no transition leaves this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }

    /// Lifecycle transition matrix.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, next) {
            (Pending, Approved | Cancelled | Reschedule) => true,
            (Approved, Cancelled | Reschedule) => true,
            // A rescheduled appointment may be re-proposed before confirmation.
            (Reschedule, Approved | Cancelled | Reschedule) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Reschedule => "reschedule",
        };
        write!(f, "{}", s)
    }
}

/// One appointment request between a student and a faculty member.
///
/// Owned jointly by the requester and the faculty member; mutated only via
/// lifecycle transitions and never silently deleted (cancellation is a
/// status change).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub faculty_id: FacultyId,
    pub date: NaiveDate,
    pub time_slot: TimeRange,
    pub purpose: String,
    pub meeting_type: MeetingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub status: AppointmentStatus,
}
