//! Application state shared across handlers

use std::sync::Arc;

use application::WorkItemService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Work item listing, classification and updates
    pub work_items: Arc<WorkItemService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("work_items", &self.work_items)
            .field("environment", &self.config.environment())
            .finish()
    }
}
