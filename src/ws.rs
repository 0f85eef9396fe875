//! WebSocket accessor.
//!
//! [`WsClient`] opens a single connection to the server's message endpoint
//! at a relative path (default `ws/msg`), derived from the HTTP base URL by
//! scheme mapping (`http` → `ws`, `https` → `wss`). The write half sends
//! text frames; the read half is taken once and run as a loop that
//! republishes incoming text frames onto the [`EventBus`].
//!
//! There is no reconnection or lifecycle management beyond [`WsClient::close`].

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::event_bus::EventBus;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A single client WebSocket connection.
#[derive(Debug)]
pub struct WsClient {
    writer: SplitSink<WsStream, Message>,
    reader: Option<WsReader>,
}

impl WsClient {
    /// Opens a connection to the configured WebSocket path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the WebSocket URL cannot be
    /// derived from the base URL, or [`ClientError::WebSocket`] if the
    /// handshake fails.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let url = ws_url(&config.base_url, &config.ws_path)?;
        tracing::info!(%url, "connecting websocket");

        let (stream, _response) = connect_async(url.as_str()).await?;
        let (writer, reader) = stream.split();

        Ok(Self {
            writer,
            reader: Some(WsReader { inner: reader }),
        })
    }

    /// Sends a text frame to the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the connection is gone.
    pub async fn send(&mut self, text: &str) -> Result<(), ClientError> {
        self.writer
            .send(Message::text(text))
            .await
            .map_err(ClientError::from)
    }

    /// Takes the read half of the connection. Can only be taken once.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the reader was already taken.
    pub fn take_reader(&mut self) -> Result<WsReader, ClientError> {
        self.reader.take().ok_or(ClientError::Closed)
    }

    /// Sends a close frame and drops the write half.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the close frame cannot be sent.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.writer
            .send(Message::Close(None))
            .await
            .map_err(ClientError::from)
    }
}

/// Read half of a [`WsClient`] connection.
#[derive(Debug)]
pub struct WsReader {
    inner: SplitStream<WsStream>,
}

impl WsReader {
    /// Runs the read loop, publishing each incoming text frame to `bus`
    /// under `topic`.
    ///
    /// Non-text frames are logged at debug level and skipped. The loop
    /// ends cleanly when the server closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] on a transport or protocol
    /// failure mid-stream.
    pub async fn forward_to(mut self, bus: EventBus, topic: &str) -> Result<(), ClientError> {
        while let Some(frame) = self.inner.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    tracing::debug!(%topic, "ws message received");
                    bus.publish(topic, text.as_str());
                }
                Ok(Message::Close(_)) => break,
                Ok(other) => {
                    tracing::debug!(?other, "ignoring non-text ws frame");
                }
                Err(e) => return Err(ClientError::WebSocket(e)),
            }
        }
        tracing::debug!("ws connection closed");
        Ok(())
    }
}

/// Derives the WebSocket URL from the HTTP base URL and a relative path.
fn ws_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    let mut url = base
        .join(path)
        .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(url),
        other => {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme: {other}"
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::InvalidUrl(format!("cannot rewrite scheme of {url}")))?;

    Ok(url)
}
