//! Database module for availability and appointment storage.
//!
//! This module provides abstractions over the persistence layer via the
//! Repository pattern, allowing different storage backends to be swapped
//! easily. The store itself is treated as a generic durable document
//! database reached through read/write operations; nothing in the core
//! depends on a live-push mechanism.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, frontend)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (availability, booking) - Business Logic  │
//! │  - Slot materialization                                   │
//! │  - Booking transactor / lifecycle enforcement             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use fas_rust::availability;
//! use fas_rust::db::{RepositoryFactory, RepositoryType};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::create(RepositoryType::Local).await?;
//!     let settings = Default::default();
//!     let slots = availability::get_or_create_day_slots(
//!         repo.as_ref(),
//!         &settings,
//!         &"faculty-1".into(),
//!         "2026-03-02".parse()?,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use checksum::{calculate_checksum, slot_list_version};
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use models::VersionedDaySlots;
pub use repo_config::RepositoryConfig;
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{
    AppointmentRepository, AvailabilityRepository, BookingRepository, ErrorContext,
    FullRepository, RepositoryError, RepositoryResult,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Resolve the configured backend: `scheduling.toml` from the standard
/// locations when present, otherwise the environment selection.
#[cfg(feature = "local-repo")]
fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    let repo_type = match RepositoryConfig::from_default_location() {
        Ok(config) => config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?,
        Err(_) => RepositoryType::from_env(),
    };

    match repo_type {
        RepositoryType::Local => Ok(RepositoryFactory::create_local()),
    }
}

/// Initialize the global repository singleton for the selected backend.
#[cfg(feature = "local-repo")]
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
#[cfg(feature = "local-repo")]
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
