use super::IsRetryable;
use axum::http::StatusCode;
use thiserror::Error as ThisError;

/// Failures of a single completion call. Never leaves the relay: callers get text.
#[derive(Debug, ThisError)]
pub enum RelayError {
    #[error("completion router key is not configured")]
    MissingApiKey,

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl IsRetryable for RelayError {
    fn is_retryable(&self) -> bool {
        match self {
            RelayError::Request(e) => !e.is_decode(),
            RelayError::UpstreamStatus(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            RelayError::MissingApiKey => false,
        }
    }
}
