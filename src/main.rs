//! relay-client demo entry point.
//!
//! Wires the units together: a one-second ticker, the `ws/msg` echo
//! connection with a delayed greeting, a public JSON API fetch, and a
//! bearer-authenticated fetch against the local server. Results go to
//! the log.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use relay_client::app_state::AppState;
use relay_client::config::ClientConfig;
use relay_client::event_bus::TopicFilter;
use relay_client::ticker::{TICK_TOPIC, Ticker};
use relay_client::ws::WsClient;

/// Response shape of the public yes/no example API.
#[derive(Debug, Deserialize)]
struct YesNoResponse {
    answer: String,
    image: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ClientConfig::from_env().context("loading configuration")?;
    tracing::info!(base_url = %config.base_url, "starting relay-client");

    // Build application context
    let state = AppState::new(config).context("building application state")?;

    // Consumer: log every event on the topics the demo cares about
    spawn_consumer(&state);

    // Ticker, labelled with the first CLI argument if given
    let label = std::env::args().nth(1).unwrap_or_else(|| "relay".to_string());
    let ticker = Ticker::new(
        state.bus.clone(),
        Duration::from_millis(state.config.tick_interval_ms),
        TICK_TOPIC,
    )
    .spawn(label);

    // WebSocket: connect, run the read loop, send the delayed greeting
    let ws = start_websocket(&state).await;

    // Public API fetch example
    fire_yes_no(&state).await;

    // Bearer-authenticated local API fetch example
    fire_local_api(&state).await;

    tracing::info!("running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;

    ticker.stop();
    if let Some(client) = ws
        && let Err(e) = client.close().await
    {
        tracing::warn!(error = %e, "error closing websocket");
    }

    Ok(())
}

/// Subscribes to the bus and logs tick and WebSocket events.
fn spawn_consumer(state: &AppState) {
    let mut rx = state.bus.subscribe();
    let mut filter = TopicFilter::new();
    filter.subscribe(&[TICK_TOPIC, state.config.ws_path.as_str()]);

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if filter.matches(&event.topic) {
                        tracing::info!(topic = %event.topic, payload = %event.payload, "event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "consumer lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Connects the WebSocket, spawns its read loop, and sends the greeting
/// after a short delay so the server has registered the connection.
///
/// A connection failure is logged and the demo continues without the
/// WebSocket section.
async fn start_websocket(state: &AppState) -> Option<WsClient> {
    let mut client = match WsClient::connect(&state.config).await {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "websocket unavailable, skipping");
            return None;
        }
    };
    tracing::info!("ws connected");

    match client.take_reader() {
        Ok(reader) => {
            let bus = state.bus.clone();
            let topic = state.config.ws_path.clone();
            tokio::spawn(async move {
                if let Err(e) = reader.forward_to(bus, &topic).await {
                    tracing::error!(error = %e, "ws read loop failed");
                }
            });
        }
        Err(e) => tracing::error!(error = %e, "ws reader unavailable"),
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    if let Err(e) = client.send("hello from relay-client").await {
        tracing::warn!(error = %e, "failed to send ws greeting");
    }

    Some(client)
}

/// Fetches the public yes/no API and logs the decoded answer.
async fn fire_yes_no(state: &AppState) {
    match state
        .fetcher
        .get_json::<YesNoResponse>("https://yesno.wtf/api", None)
        .await
    {
        Ok(data) => tracing::info!(answer = %data.answer, image = %data.image, "yes/no API"),
        Err(e) => tracing::warn!(error = %e, "yes/no API fetch failed"),
    }
}

/// Fetches the authenticated local API when a bearer token is configured.
async fn fire_local_api(state: &AppState) {
    let Some(token) = state.config.bearer_token.clone() else {
        tracing::info!("no bearer token configured, skipping local API example");
        return;
    };

    match state
        .fetcher
        .get_text("api/admin/users", Some(&token))
        .await
    {
        Ok(body) => tracing::info!(%body, "local API response"),
        Err(e) => tracing::warn!(error = %e, "local API fetch failed"),
    }
}
