//! Shared application state.

use std::sync::Arc;

use crate::service::AnalyzerService;

/// State shared by all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The analyzer behind every endpoint.
    pub service: Arc<AnalyzerService>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(service: AnalyzerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .finish()
    }
}
