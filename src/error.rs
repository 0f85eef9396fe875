//! Client error types.
//!
//! [`ClientError`] is the central error type for the crate. Every fallible
//! operation returns it explicitly; transport failures are never swallowed
//! into a missing value, so callers can always distinguish "request failed"
//! from "request succeeded with an empty body".

use reqwest::StatusCode;

/// Client-side error enum covering configuration, HTTP, and WebSocket
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A URL could not be parsed, or a relative path could not be joined
    /// against the configured base URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Transport-level HTTP failure: DNS resolution, connection refused,
    /// TLS, timeout.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status when a decoded body
    /// was requested.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code returned by the server.
        status: StatusCode,
        /// The resolved request URL.
        url: String,
    },

    /// The response body could not be decoded in the requested shape.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// WebSocket protocol or transport failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The WebSocket connection is closed, or its read half was already
    /// taken.
    #[error("websocket connection closed")]
    Closed,
}
