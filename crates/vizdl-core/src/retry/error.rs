//! Errors produced by a single attempt and by an exhausted retry loop.

use super::operation::Operation;

/// Failure of a single fetch or download attempt. Every variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection reset, DNS, HTTP >= 400 via fail-on-error).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Response completed with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Destination file could not be created or written.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
    /// Catalog page body was not the expected JSON shape.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Page URL could not be built from the configured endpoint.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Returned by [`run_with_retry`](super::run_with_retry) once the policy allows no more attempts.
/// Carries the last attempt's error as its source.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed after {attempts} attempt(s)")]
pub struct RetryExhausted {
    pub operation: Operation,
    pub attempts: u32,
    #[source]
    pub source: FetchError,
}
