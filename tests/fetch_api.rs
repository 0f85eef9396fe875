//! Integration tests for the HTTP fetch wrapper against an in-process
//! axum server.

#![allow(clippy::panic)]

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::get;
use reqwest::Url;
use serde::Deserialize;

use relay_client::config::ClientConfig;
use relay_client::error::ClientError;
use relay_client::fetch::Fetcher;

#[derive(Debug, Deserialize)]
struct Answer {
    answer: String,
}

async fn answer_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "answer": "yes" }))
}

async fn text_handler() -> &'static str {
    "plain body"
}

/// Echoes the Authorization header back as the response body.
async fn auth_echo_handler(headers: HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn missing_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn test_app() -> Router {
    Router::new()
        .route("/answer", get(answer_handler))
        .route("/text", get(text_handler))
        .route("/auth", get(auth_echo_handler))
        .route("/missing", get(missing_handler))
}

/// Binds the app on an ephemeral port and returns its base URL.
async fn spawn_server() -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read test listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, test_app()).await;
    });
    format!("http://{addr}")
}

fn fetcher_for(base: &str) -> Fetcher {
    let Ok(base_url) = Url::parse(base) else {
        panic!("bad test base url");
    };
    let config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };
    let Ok(fetcher) = Fetcher::new(&config) else {
        panic!("failed to build fetcher");
    };
    fetcher
}

#[tokio::test]
async fn get_json_decodes_body() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let result = fetcher.get_json::<Answer>("answer", None).await;
    let Ok(answer) = result else {
        panic!("get_json should succeed");
    };
    assert_eq!(answer.answer, "yes");
}

#[tokio::test]
async fn get_text_returns_exact_body() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let result = fetcher.get_text("text", None).await;
    let Ok(body) = result else {
        panic!("get_text should succeed");
    };
    assert_eq!(body, "plain body");
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let Ok(body) = fetcher.get_text("auth", None).await else {
        panic!("unauthenticated get should succeed");
    };
    assert_eq!(body, "", "no Authorization header should be sent");
}

#[tokio::test]
async fn bearer_header_sent_with_token() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let Ok(body) = fetcher.get_text("auth", Some("secret")).await else {
        panic!("authenticated get should succeed");
    };
    assert_eq!(body, "Bearer secret");
}

#[tokio::test]
async fn get_returns_raw_response_for_any_status() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let Ok(response) = fetcher.get("missing", None).await else {
        panic!("get should hand back the raw response");
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_success_status_is_a_typed_error() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let result = fetcher.get_json::<Answer>("missing", None).await;
    let Err(ClientError::Status { status, .. }) = result else {
        panic!("expected status error");
    };
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transport_failure_is_a_typed_error() {
    // Bind and immediately drop a listener so the port refuses connections.
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind throwaway listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read throwaway listener address");
    };
    drop(listener);

    let fetcher = fetcher_for(&format!("http://{addr}"));
    let result = fetcher.get("answer", None).await;
    assert!(
        matches!(result, Err(ClientError::Http(_))),
        "expected transport error, got {result:?}"
    );
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() {
    let base = spawn_server().await;
    let fetcher = fetcher_for(&base);

    let result = fetcher.get_json::<Answer>("text", None).await;
    assert!(
        matches!(result, Err(ClientError::Decode(_))),
        "expected decode error, got {result:?}"
    );
}
