//! Public API surface for the scheduling backend.
//!
//! This file consolidates the identifier newtypes and re-exports the domain
//! types used across the repository and HTTP layers. All types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::models::appointment::Appointment;
pub use crate::models::appointment::AppointmentStatus;
pub use crate::models::appointment::MeetingType;
pub use crate::models::commitment::CommitmentKind;
pub use crate::models::commitment::RecurringCommitment;
pub use crate::models::slots::DaySlots;
pub use crate::models::slots::Slot;
pub use crate::models::time::TimeOfDay;
pub use crate::models::time::TimeParseError;
pub use crate::models::time::TimeRange;

use serde::{Deserialize, Serialize};

/// Faculty member identifier (document key in the account store).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacultyId(pub String);

/// Appointment identifier (generated UUID).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

impl FacultyId {
    pub fn new(value: impl Into<String>) -> Self {
        FacultyId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl AppointmentId {
    pub fn new(value: impl Into<String>) -> Self {
        AppointmentId(value.into())
    }

    /// Mint a fresh identifier for a new appointment record.
    pub fn generate() -> Self {
        AppointmentId(uuid::Uuid::new_v4().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FacultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FacultyId {
    fn from(value: &str) -> Self {
        FacultyId(value.to_string())
    }
}

impl From<FacultyId> for String {
    fn from(id: FacultyId) -> Self {
        id.0
    }
}
