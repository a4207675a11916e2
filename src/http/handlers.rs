//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! availability and booking service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AppointmentListResponse, CommitmentsPayload, CommitmentsResponse, DateQuery, DaySlotsResponse,
    HealthResponse, OpenSlotsResponse, RescheduleRequest, SlotDto,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Appointment, AppointmentId, FacultyId};
use crate::availability;
use crate::booking::{self, AppointmentRequest, StatusChange};
use crate::db::repository::{AppointmentRepository, AvailabilityRepository};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/faculty/{faculty_id}/slots?date=YYYY-MM-DD
///
/// Full slot list for a date, materializing it on first request.
pub async fn get_day_slots(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> HandlerResult<DaySlotsResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    let slots = availability::get_or_create_day_slots(
        state.repository.as_ref(),
        &state.settings,
        &faculty_id,
        query.date,
    )
    .await?;

    Ok(Json(DaySlotsResponse {
        faculty_id: faculty_id.into(),
        date: query.date,
        slots: slots.iter().map(SlotDto::from).collect(),
    }))
}

/// GET /v1/faculty/{faculty_id}/slots/open?date=YYYY-MM-DD
///
/// Labels the requester may currently choose (`available && !booked`).
pub async fn get_open_slots(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> HandlerResult<OpenSlotsResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    let slots = availability::list_open_slots(
        state.repository.as_ref(),
        &state.settings,
        &faculty_id,
        query.date,
    )
    .await?;

    Ok(Json(OpenSlotsResponse {
        faculty_id: faculty_id.into(),
        date: query.date,
        slots,
    }))
}

/// POST /v1/faculty/{faculty_id}/slots/regenerate?date=YYYY-MM-DD
///
/// Rebuild a date's availability after the recurring schedule changed.
/// Booked slots survive regeneration.
pub async fn regenerate_day_slots(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> HandlerResult<DaySlotsResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    let slots = availability::regenerate_day_slots(
        state.repository.as_ref(),
        &state.settings,
        &faculty_id,
        query.date,
    )
    .await?;

    Ok(Json(DaySlotsResponse {
        faculty_id: faculty_id.into(),
        date: query.date,
        slots: slots.iter().map(SlotDto::from).collect(),
    }))
}

// =============================================================================
// Recurring Commitments
// =============================================================================

/// GET /v1/faculty/{faculty_id}/commitments
pub async fn get_commitments(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> HandlerResult<CommitmentsResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    let commitments = state
        .repository
        .fetch_recurring_commitments(&faculty_id)
        .await?;
    let total = commitments.len();

    Ok(Json(CommitmentsResponse {
        faculty_id: faculty_id.into(),
        commitments,
        total,
    }))
}

/// PUT /v1/faculty/{faculty_id}/commitments
///
/// Replace the weekly schedule. Already-materialized dates keep their
/// availability until regenerated.
pub async fn put_commitments(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Json(payload): Json<CommitmentsPayload>,
) -> HandlerResult<CommitmentsResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    state
        .repository
        .store_recurring_commitments(&faculty_id, &payload.commitments)
        .await?;
    let total = payload.commitments.len();

    Ok(Json(CommitmentsResponse {
        faculty_id: faculty_id.into(),
        commitments: payload.commitments,
        total,
    }))
}

// =============================================================================
// Appointments
// =============================================================================

/// POST /v1/appointments
///
/// Create a pending appointment for a currently open slot.
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment =
        booking::request_appointment(state.repository.as_ref(), &state.settings, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /v1/appointments/{appointment_id}
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> HandlerResult<Appointment> {
    let id = AppointmentId::new(appointment_id);
    let appointment = state
        .repository
        .fetch_appointment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
    Ok(Json(appointment))
}

/// GET /v1/faculty/{faculty_id}/appointments
pub async fn list_faculty_appointments(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> HandlerResult<AppointmentListResponse> {
    let faculty_id = FacultyId::new(faculty_id);
    let appointments = state
        .repository
        .list_appointments_for_faculty(&faculty_id)
        .await?;
    let total = appointments.len();

    Ok(Json(AppointmentListResponse {
        appointments,
        total,
    }))
}

/// POST /v1/appointments/{appointment_id}/approve
///
/// The booking transactor: books the slot and approves the appointment as
/// one unit. A lost race surfaces as 409 with current availability intact.
pub async fn approve_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> HandlerResult<Appointment> {
    let id = AppointmentId::new(appointment_id);
    let appointment = state
        .repository
        .fetch_appointment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

    booking::book_slot(
        state.repository.as_ref(),
        &state.settings,
        &appointment.faculty_id,
        appointment.date,
        &appointment.time_slot,
        &id,
    )
    .await?;

    let approved = state
        .repository
        .fetch_appointment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
    Ok(Json(approved))
}

/// POST /v1/appointments/{appointment_id}/cancel
///
/// Cancel the appointment; an approved one releases its booked slot.
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> HandlerResult<Appointment> {
    let id = AppointmentId::new(appointment_id);
    let appointment = booking::set_appointment_status(
        state.repository.as_ref(),
        &state.settings,
        &id,
        StatusChange::cancel(),
    )
    .await?;
    Ok(Json(appointment))
}

/// POST /v1/appointments/{appointment_id}/reschedule
///
/// Propose a new date/time. The new slot is not booked until a subsequent
/// approval.
pub async fn reschedule_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> HandlerResult<Appointment> {
    let id = AppointmentId::new(appointment_id);
    let appointment = booking::set_appointment_status(
        state.repository.as_ref(),
        &state.settings,
        &id,
        StatusChange::reschedule(request.date, request.time_slot),
    )
    .await?;
    Ok(Json(appointment))
}
