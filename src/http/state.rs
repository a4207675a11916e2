//! Application state for the HTTP server.

use std::sync::Arc;

use crate::availability::SchedulingSettings;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for persistence operations
    pub repository: Arc<dyn FullRepository>,
    /// Operating window and booking parameters
    pub settings: SchedulingSettings,
}

impl AppState {
    /// Create a new application state with the given repository and settings.
    pub fn new(repository: Arc<dyn FullRepository>, settings: SchedulingSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }
}
