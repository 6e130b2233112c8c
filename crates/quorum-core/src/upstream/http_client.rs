use reqwest::{Client, ClientBuilder};
use std::{sync::Arc, time::Duration};
use tokio::sync::Semaphore;

use crate::upstream::UpstreamError;

/// Maximum number of response body bytes kept in an [`UpstreamError::HttpError`].
const MAX_ERROR_BODY_LEN: usize = 256;

/// Transport settings shared by every node query.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound on simultaneous HTTP requests
    pub concurrent_limit: usize,
    /// How long a request may wait for a free slot, in milliseconds
    pub permit_timeout_ms: u64,
    /// TCP connect timeout in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { concurrent_limit: 256, permit_timeout_ms: 5_000, connect_timeout_seconds: 5 }
    }
}

/// Single-attempt JSON POST transport with a cap on in-flight requests.
///
/// Node queries are never retried within a round, so there is no retry or
/// backoff logic here.
pub struct HttpClient {
    client: Client,
    in_flight: Arc<Semaphore>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Builds a client with [`HttpClientConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, UpstreamError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_idle_timeout(Duration::from_secs(30))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("slot-quorum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                UpstreamError::InvalidRequest(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self {
            client,
            in_flight: Arc::new(Semaphore::new(config.concurrent_limit.max(1))),
            config,
        })
    }

    /// Sends a JSON POST body and returns the raw response body.
    ///
    /// `timeout` bounds the whole request; `None` leaves it unbounded.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] if no slot frees up in time or the request times out
    /// - [`UpstreamError::ConnectionFailed`] if the node cannot be reached
    /// - [`UpstreamError::HttpError`] for non-success HTTP status codes
    /// - [`UpstreamError::Network`] for other transport failures
    pub async fn post_json(
        &self,
        url: &str,
        body: bytes::Bytes,
        timeout: Option<Duration>,
    ) -> Result<bytes::Bytes, UpstreamError> {
        let wait = Duration::from_millis(self.config.permit_timeout_ms);
        let _permit = tokio::time::timeout(wait, Arc::clone(&self.in_flight).acquire_owned())
            .await
            .map_err(|_| {
                tracing::warn!(
                    available = self.in_flight.available_permits(),
                    "timed out waiting for an http request slot"
                );
                UpstreamError::Timeout
            })?
            .map_err(|_| UpstreamError::ConcurrencyLimit(url.to_string()))?;

        let mut request =
            self.client.post(url).header("content-type", "application/json").body(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::HttpError(status.as_u16(), truncate_error_body(text)));
        }

        response.bytes().await.map_err(|e| classify_transport_error(&e))
    }
}

/// Maps a reqwest failure onto the upstream taxonomy.
///
/// Messages are fixed strings: reqwest errors may embed the request URL, and
/// node URLs can carry credentials.
fn classify_transport_error(error: &reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else if error.is_connect() {
        UpstreamError::ConnectionFailed("connection refused or unreachable".to_string())
    } else {
        let what = if error.is_body() || error.is_decode() {
            "response body error"
        } else if error.is_redirect() {
            "unexpected redirect"
        } else {
            "request failed"
        };
        UpstreamError::Network(what.to_string())
    }
}

fn truncate_error_body(text: String) -> String {
    if text.len() <= MAX_ERROR_BODY_LEN {
        return text;
    }
    let cut = (0..=MAX_ERROR_BODY_LEN).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
    format!("{}... (truncated)", &text[..cut])
}
