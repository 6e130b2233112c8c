use thiserror::Error;

/// Errors that can occur when querying a single ledger node.
///
/// Every variant is recovered locally by the fan-out executor: the endpoint
/// that produced it is dropped from the round it occurred in and nothing is
/// retried.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UpstreamError {
    /// Request exceeded the configured per-query timeout.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the node.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the (truncated) body.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// JSON-RPC error object returned by the node.
    ///
    /// First field is the RPC error code, second is the error message.
    #[error("RPC error {0}: {1}")]
    RpcError(i64, String),

    /// Network-level error from the underlying HTTP client, already sanitized.
    #[error("Network error: {0}")]
    Network(String),

    /// Response could not be parsed or was missing its result.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be encoded, or the HTTP client could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The local concurrency limiter was closed before a permit was granted.
    #[error("Concurrency limit reached: {0}")]
    ConcurrencyLimit(String),

    /// The task running the query panicked or was cancelled.
    #[error("Query task failed: {0}")]
    TaskFailed(String),
}

impl UpstreamError {
    /// Returns a static string representation for structured log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::HttpError(..) => "http_error",
            Self::RpcError(..) => "rpc_error",
            Self::Network(_) => "network",
            Self::InvalidResponse(_) => "invalid_response",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ConcurrencyLimit(_) => "concurrency_limit",
            Self::TaskFailed(_) => "task_failed",
        }
    }
}
