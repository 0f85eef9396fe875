//! Integration tests for the WebSocket accessor against an in-process
//! axum echo server.

#![allow(clippy::panic)]

use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use reqwest::Url;

use relay_client::config::ClientConfig;
use relay_client::error::ClientError;
use relay_client::event_bus::EventBus;
use relay_client::ws::WsClient;

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(echo_socket)
}

/// Echoes each text frame back with an `echo: ` prefix.
async fn echo_socket(mut socket: WebSocket) {
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Text(text) = msg {
            let reply = format!("echo: {}", text.as_str());
            if socket.send(Message::text(reply)).await.is_err() {
                break;
            }
        }
    }
}

/// Binds the echo server on an ephemeral port and returns a client
/// configuration pointing at it.
async fn spawn_echo_server() -> ClientConfig {
    let app = Router::new().route("/ws/msg", get(ws_handler));
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read test listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let Ok(base_url) = Url::parse(&format!("http://{addr}")) else {
        panic!("bad test base url");
    };
    ClientConfig {
        base_url,
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn echoed_frame_reaches_event_bus() {
    let config = spawn_echo_server().await;

    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    let Ok(mut client) = WsClient::connect(&config).await else {
        panic!("websocket connect failed");
    };

    let Ok(reader) = client.take_reader() else {
        panic!("reader should be available once");
    };
    let forward_bus = bus.clone();
    tokio::spawn(async move {
        let _ = reader.forward_to(forward_bus, "ws/msg").await;
    });

    let Ok(()) = client.send("hello, server").await else {
        panic!("send failed");
    };

    let received = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
    let Ok(Ok(event)) = received else {
        panic!("expected echoed event");
    };
    assert_eq!(event.topic, "ws/msg");
    assert_eq!(event.payload, "echo: hello, server");

    let Ok(()) = client.close().await else {
        panic!("close failed");
    };
}

#[tokio::test]
async fn reader_can_only_be_taken_once() {
    let config = spawn_echo_server().await;

    let Ok(mut client) = WsClient::connect(&config).await else {
        panic!("websocket connect failed");
    };

    assert!(client.take_reader().is_ok());
    assert!(matches!(client.take_reader(), Err(ClientError::Closed)));
}

#[tokio::test]
async fn connect_fails_against_closed_port() {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind throwaway listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read throwaway listener address");
    };
    drop(listener);

    let Ok(base_url) = Url::parse(&format!("http://{addr}")) else {
        panic!("bad test base url");
    };
    let config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };

    let result = WsClient::connect(&config).await;
    assert!(
        matches!(result, Err(ClientError::WebSocket(_))),
        "expected websocket error"
    );
}
