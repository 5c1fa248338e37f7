use super::IsRetryable;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error as ThisError;

/// Failures of a Google Workspace call.
///
/// Routes never surface these as HTTP errors; they are rendered as an [`ErrorBanner`] next to an
/// empty result.
#[derive(Debug, ThisError)]
pub enum WorkspaceError {
    #[error("Google account is not connected")]
    MissingCredential,

    #[error("Google credential expired; reconnect required")]
    CredentialExpired,

    #[error("Google rejected the credential; reconnect required")]
    CredentialRejected,

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("HTTP request error: {0}")]
    Request(reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),
}

impl From<reqwest::Error> for WorkspaceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WorkspaceError::Timeout
        } else {
            WorkspaceError::Request(e)
        }
    }
}

impl IsRetryable for WorkspaceError {
    fn is_retryable(&self) -> bool {
        match self {
            WorkspaceError::Timeout => true,
            WorkspaceError::Request(e) => !e.is_decode(),
            WorkspaceError::UpstreamStatus(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

impl WorkspaceError {
    /// The user has to run the OAuth flow again before this can succeed.
    pub fn needs_reconnect(&self) -> bool {
        matches!(
            self,
            WorkspaceError::MissingCredential
                | WorkspaceError::CredentialExpired
                | WorkspaceError::CredentialRejected
        )
    }

    pub fn banner(&self) -> ErrorBanner {
        let (code, message) = match self {
            WorkspaceError::MissingCredential => {
                ("NOT_CONNECTED", "Connect your Google account to load this.")
            }
            WorkspaceError::CredentialExpired | WorkspaceError::CredentialRejected => (
                "RECONNECT_REQUIRED",
                "Your Google session has ended. Reconnect to continue.",
            ),
            WorkspaceError::UpstreamStatus(StatusCode::TOO_MANY_REQUESTS) => {
                ("RATE_LIMIT", "Google rate limit exceeded. Try again shortly.")
            }
            WorkspaceError::UpstreamStatus(StatusCode::FORBIDDEN) => {
                ("FORBIDDEN", "Google denied access to this resource.")
            }
            WorkspaceError::UpstreamStatus(StatusCode::NOT_FOUND) => {
                ("NOT_FOUND", "Google could not find this resource.")
            }
            WorkspaceError::UpstreamStatus(_) => ("UPSTREAM_ERROR", "Google returned an error."),
            WorkspaceError::Timeout => ("TIMEOUT", "Google did not answer in time. Try again."),
            WorkspaceError::Request(e) if e.is_decode() => (
                "BAD_UPSTREAM_PAYLOAD",
                "Failed to parse the response from Google.",
            ),
            WorkspaceError::Request(_) => ("UPSTREAM_UNREACHABLE", "Could not reach Google."),
            WorkspaceError::InvalidPath(_) => ("BAD_REQUEST", "Invalid resource identifier."),
        };

        ErrorBanner {
            code,
            message: message.to_string(),
            retryable: self.is_retryable(),
            reconnect: self.needs_reconnect(),
        }
    }
}

/// User-facing failure notice rendered next to an empty result.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBanner {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub reconnect: bool,
}
