//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The bearer credential is injected
//! here and never embedded in source.

use reqwest::Url;

use crate::error::ClientError;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`], or constructed
/// directly (tests do this to point the client at an in-process server).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative request paths are resolved against
    /// (e.g. `http://127.0.0.1:1323`).
    pub base_url: Url,

    /// Bearer credential for authenticated GETs. `None` means all
    /// requests go out unauthenticated.
    pub bearer_token: Option<String>,

    /// Relative WebSocket path on the server (e.g. `ws/msg`).
    pub ws_path: String,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    /// Capacity of the event bus broadcast channel.
    pub event_bus_capacity: usize,

    /// Ticker period in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for ClientConfig {
    // The base URL literal is known valid, so the parse cannot fail.
    #[allow(clippy::unwrap_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:1323").unwrap(),
            bearer_token: None,
            ws_path: "ws/msg".to_string(),
            request_timeout_secs: 30,
            event_bus_capacity: 1024,
            tick_interval_ms: 1000,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `RELAY_BASE_URL` is set but
    /// cannot be parsed as an absolute URL.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let base_url = match std::env::var("RELAY_BASE_URL") {
            Ok(raw) => Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(e.to_string()))?,
            Err(_) => defaults.base_url,
        };

        let bearer_token = std::env::var("RELAY_BEARER_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let ws_path = std::env::var("RELAY_WS_PATH").unwrap_or(defaults.ws_path);

        let request_timeout_secs =
            parse_env("RELAY_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs);
        let event_bus_capacity = parse_env("RELAY_EVENT_BUS_CAPACITY", defaults.event_bus_capacity);
        let tick_interval_ms = parse_env("RELAY_TICK_INTERVAL_MS", defaults.tick_interval_ms);

        Ok(Self {
            base_url,
            bearer_token,
            ws_path,
            request_timeout_secs,
            event_bus_capacity,
            tick_interval_ms,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_and_ws_path() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:1323/");
        assert_eq!(config.ws_path, "ws/msg");
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("RELAY_TEST_KEY_THAT_IS_NEVER_SET", 42);
        assert_eq!(value, 42);
    }
}
