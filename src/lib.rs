//! # FAS Rust Backend
//!
//! Faculty appointment scheduling engine.
//!
//! This crate provides the availability and booking core of the FAS (Faculty
//! Appointment Scheduling) system: generating a faculty member's bookable
//! calendar from weekly recurring commitments, materializing per-date slot
//! lists on demand, and performing race-free slot booking coupled to the
//! appointment lifecycle. The backend exposes a REST API via Axum for the
//! web frontend.
//!
//! ## Features
//!
//! - **Time Grid**: fixed-width slot generation across an operating window
//! - **Recurring Commitments**: weekly classes/consultations resolved onto
//!   concrete calendar dates as blocked intervals
//! - **Availability Materialization**: lazy, idempotent creation of per-date
//!   slot lists that never clobbers existing bookings
//! - **Booking Transactor**: atomic slot-and-appointment writes guarded by
//!   optimistic concurrency, so a slot can never be double-booked
//! - **Appointment Lifecycle**: pending / approved / cancelled / reschedule
//!   state machine with symmetric slot release on cancellation
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: public identifier newtypes and domain DTO re-exports
//! - [`models`]: time-of-day arithmetic, slots, commitments, appointments
//! - [`availability`]: grid generation and slot-list materialization
//! - [`booking`]: the booking transactor and lifecycle operations
//! - [`db`]: repository pattern, error model, and persistence backends
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod availability;
pub mod booking;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
