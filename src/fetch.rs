//! HTTP fetch wrapper.
//!
//! [`Fetcher`] issues single GET requests over a shared connection pool,
//! optionally attaching a bearer credential, and decodes responses as JSON
//! or plain text. Relative URLs are resolved against the configured base.
//!
//! Failures are typed: a transport error is [`ClientError::Http`], a
//! non-success status on a decoding call is [`ClientError::Status`], and
//! a malformed body is [`ClientError::Decode`]. Nothing is
//! logged-and-swallowed.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// GET-only HTTP client with optional bearer authentication.
///
/// Cheap to clone; all clones share the same connection pool and cookie
/// store.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl Fetcher {
    /// Builds a `Fetcher` from the client configuration.
    ///
    /// The underlying client keeps a cookie store so that authenticated
    /// requests include session cookies, mirroring `credentials: include`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be
    /// constructed (e.g. no TLS backend available).
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolves `url` to an absolute URL.
    ///
    /// Absolute URLs pass through unchanged; relative paths are joined
    /// against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `url` is neither a valid
    /// absolute URL nor joinable against the base.
    pub fn resolve(&self, url: &str) -> Result<Url, ClientError> {
        Url::parse(url)
            .or_else(|_| self.base_url.join(url))
            .map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))
    }

    /// Issues a single GET request and returns the undecoded response.
    ///
    /// When `token` is `Some`, the request carries
    /// `Authorization: Bearer <token>` and `Content-Type: application/json`
    /// headers. When `token` is `None`, no `Authorization` header is sent.
    ///
    /// The response is returned regardless of its status code; decoding
    /// entry points ([`Self::get_json`], [`Self::get_text`]) reject
    /// non-success statuses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] for an unresolvable URL, or
    /// [`ClientError::Http`] for a transport-level failure.
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Response, ClientError> {
        let target = self.resolve(url)?;
        tracing::debug!(url = %target, authenticated = token.is_some(), "GET");

        let mut request = self.client.get(target);
        if let Some(token) = token {
            request = request
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .header(CONTENT_TYPE, "application/json");
        }

        Ok(request.send().await?)
    }

    /// GETs `url` and decodes the response body as JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get`] errors; additionally returns
    /// [`ClientError::Status`] on a non-success status and
    /// [`ClientError::Decode`] if the body is not valid JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let response = self.get(url, token).await?;
        let response = check_status(response)?;
        response.json().await.map_err(into_decode_error)
    }

    /// GETs `url` and decodes the response body as plain text.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get`] errors; additionally returns
    /// [`ClientError::Status`] on a non-success status and
    /// [`ClientError::Decode`] if the body is not valid UTF-8.
    pub async fn get_text(&self, url: &str, token: Option<&str>) -> Result<String, ClientError> {
        let response = self.get(url, token).await?;
        let response = check_status(response)?;
        response.text().await.map_err(into_decode_error)
    }
}

/// Rejects non-success responses with [`ClientError::Status`].
fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

/// Maps a body-reading failure to [`ClientError::Decode`], keeping
/// transport errors as [`ClientError::Http`].
fn into_decode_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Http(err)
    }
}
