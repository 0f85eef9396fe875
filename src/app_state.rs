//! Shared application state wiring the client units together.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::event_bus::EventBus;
use crate::fetch::Fetcher;

/// Application context built once at startup and passed by reference to
/// every unit. Replaces hidden process-wide state with explicit wiring.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded client configuration.
    pub config: ClientConfig,
    /// Event bus shared by the ticker and the WebSocket read loop.
    pub bus: EventBus,
    /// HTTP fetch wrapper.
    pub fetcher: Fetcher,
}

impl AppState {
    /// Builds the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let bus = EventBus::new(config.event_bus_capacity);
        let fetcher = Fetcher::new(&config)?;
        Ok(Self {
            config,
            bus,
            fetcher,
        })
    }
}
