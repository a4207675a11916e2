//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Availability
        .route("/faculty/{faculty_id}/slots", get(handlers::get_day_slots))
        .route("/faculty/{faculty_id}/slots/open", get(handlers::get_open_slots))
        .route(
            "/faculty/{faculty_id}/slots/regenerate",
            post(handlers::regenerate_day_slots),
        )
        // Recurring commitments
        .route(
            "/faculty/{faculty_id}/commitments",
            get(handlers::get_commitments).put(handlers::put_commitments),
        )
        // Appointments
        .route("/faculty/{faculty_id}/appointments", get(handlers::list_faculty_appointments))
        .route("/appointments", post(handlers::create_appointment))
        .route("/appointments/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/appointments/{appointment_id}/approve",
            post(handlers::approve_appointment),
        )
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .route(
            "/appointments/{appointment_id}/reschedule",
            post(handlers::reschedule_appointment),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
