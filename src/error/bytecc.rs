use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use super::oauth::OauthError;
use super::outbox::OutboxError;

#[derive(Debug, ThisError)]
pub enum ByteccError {
    #[error(transparent)]
    Oauth(#[from] OauthError),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown model selector: {0}")]
    UnknownModel(String),

    #[error("Console is busy with a previous message")]
    ConsoleBusy,

    #[error(transparent)]
    Outbox(#[from] OutboxError),
}

impl IntoResponse for ByteccError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            ByteccError::UrlError(_)
            | ByteccError::Oauth(OauthError::Other { .. }) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                };
                (status, body)
            }

            ByteccError::Oauth(OauthError::Flow {
                code,
                message,
                details,
            }) => {
                let status = StatusCode::FORBIDDEN;
                let body = ApiErrorObject {
                    code,
                    message,
                    details,
                };
                (status, body)
            }

            ByteccError::Oauth(OauthError::Parse { .. }) => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorObject {
                    code: "BAD_UPSTREAM_PAYLOAD".to_string(),
                    message: "Failed to parse upstream response.".to_string(),
                    details: None,
                };
                (status, body)
            }

            ByteccError::Oauth(
                OauthError::Request(_) | OauthError::ServerResponse { .. },
            ) => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorObject {
                    code: "UPSTREAM_ERROR".to_string(),
                    message: "Upstream service error.".to_string(),
                    details: None,
                };
                (status, body)
            }

            ByteccError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "INVALID_REQUEST".to_string(),
                    message,
                    details: None,
                },
            ),

            ByteccError::UnknownModel(key) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "UNKNOWN_MODEL".to_string(),
                    message: format!("Unknown model selector: {key}"),
                    details: None,
                },
            ),

            ByteccError::Outbox(OutboxError::UnknownItem(id)) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "OUTBOX_ITEM_NOT_FOUND".to_string(),
                    message: format!("No outbox item with id {id}"),
                    details: None,
                },
            ),

            ByteccError::Outbox(OutboxError::AlreadyDecided { id, status }) => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "ALREADY_DECIDED".to_string(),
                    message: format!("Outbox item {id} is no longer pending."),
                    details: Some(serde_json::json!({ "status": status })),
                },
            ),

            ByteccError::ConsoleBusy => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "CONSOLE_BUSY".to_string(),
                    message: "A previous message is still being processed.".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
