//! Shared application state.

use questline_registry::application::handle::RegistryHandle;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the registry worker.
    pub handle: RegistryHandle,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(handle: RegistryHandle) -> Self {
        Self { handle }
    }
}
