//! Backend error types.

use thiserror::Error;

/// Errors from the text-generation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    /// Response body was not in the expected shape.
    #[error("failed to parse backend response: {0}")]
    ParseError(String),

    /// Request timed out.
    #[error("generation request timed out after {0}ms")]
    Timeout(u64),

    /// No backend is configured or reachable.
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(0)
        } else if err.is_connect() {
            BackendError::Unavailable(err.to_string())
        } else {
            BackendError::RequestFailed(err.to_string())
        }
    }
}
