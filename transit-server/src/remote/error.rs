//! Remote fetch error types.

use std::sync::Arc;

/// Errors from fetching remote JSON.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Client could not be configured
    #[error("not configured: {0}")]
    Config(String),

    /// Every attempt failed
    #[error("request to {url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    /// A failure shared by concurrent callers of one cached request
    #[error(transparent)]
    Shared(Arc<FetchError>),
}

impl FetchError {
    /// Whether another attempt could succeed.
    ///
    /// Client errors (4xx) are not retried, except 408 Request Timeout and
    /// 429 Too Many Requests. Server errors, timeouts and connection
    /// failures are.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => !e.is_builder() && !e.is_decode(),
            FetchError::Status { status, .. } => match *status {
                408 | 429 => true,
                400..=499 => false,
                _ => true,
            },
            FetchError::Json { .. } => true,
            FetchError::Config(_) => false,
            FetchError::RetriesExhausted { .. } => false,
            FetchError::Shared(_) => false,
        }
    }

    /// HTTP status of the underlying failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            FetchError::RetriesExhausted { source, .. } => source.status(),
            FetchError::Shared(inner) => inner.status(),
            _ => None,
        }
    }

    /// The error itself, or the one it shares with other callers.
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// Take back sole ownership of a shared error where possible.
    pub(crate) fn from_shared(shared: Arc<FetchError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(FetchError::Shared)
    }
}
