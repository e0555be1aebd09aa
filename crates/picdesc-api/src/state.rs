//! Application state.

use std::sync::Arc;

use picdesc_vision::VisionClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub vision: Arc<VisionClient>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Fails when the vision client cannot be constructed (missing API key),
    /// so a misconfigured server dies at startup instead of per request.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let vision = VisionClient::from_env()?;
        Ok(Self {
            config,
            vision: Arc::new(vision),
        })
    }

    /// Create state around an existing vision client (used by tests).
    pub fn with_vision(config: ApiConfig, vision: VisionClient) -> Self {
        Self {
            config,
            vision: Arc::new(vision),
        }
    }
}
