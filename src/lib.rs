//! # relay-client
//!
//! Async client glue for the relay message server: an HTTP fetch wrapper
//! with optional bearer authentication, a WebSocket accessor for the
//! server's `ws/msg` endpoint, a broadcast event bus for named messages,
//! and a periodic ticker. A demo binary wires the units together.
//!
//! ## Architecture
//!
//! ```text
//! demo binary (main)
//!     │
//!     ├── Fetcher (fetch/)      GET + get_json + get_text
//!     ├── WsClient (ws/)        send / read loop
//!     │        │
//!     ├── Ticker (ticker/) ─────┤
//!     │        │                │
//!     └── EventBus (event_bus/) ┴── subscribers (TopicFilter)
//! ```
//!
//! All failures surface as [`error::ClientError`]; nothing is silently
//! dropped at the transport layer.

pub mod app_state;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod fetch;
pub mod ticker;
pub mod ws;

pub use app_state::AppState;
pub use config::ClientConfig;
pub use error::ClientError;
pub use event_bus::{Event, EventBus, TopicFilter};
pub use fetch::Fetcher;
pub use ticker::{TICK_TOPIC, Ticker, TickerHandle};
pub use ws::{WsClient, WsReader};
