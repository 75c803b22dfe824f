//! Application state for the API server

use crate::{Config, JobManager};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the job manager and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The job manager owning the registry and executors
    pub manager: Arc<JobManager>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(manager: Arc<JobManager>, config: Arc<Config>) -> Self {
        Self { manager, config }
    }
}
