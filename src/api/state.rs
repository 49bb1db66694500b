//! Application state for the reconciliation API.

use std::sync::Arc;

use crate::config::{ConfigLoader, ReconcileConfig};

/// Shared application state.
///
/// Holds the server's reconciliation configuration. Requests never mutate
/// it; per-request options are applied to a copy.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ReconcileConfig>,
}

impl AppState {
    /// Creates a new application state from a configuration.
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new application state from a loaded configuration file.
    pub fn from_loader(loader: ConfigLoader) -> Self {
        Self::new(loader.into_config())
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}
