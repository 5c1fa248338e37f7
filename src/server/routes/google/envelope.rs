use crate::error::{ErrorBanner, WorkspaceError};
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

/// `{ "items": [...], "error"? }`
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBanner>,
}

/// `{ "data": ...|null, "error"? }`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBanner>,
}

/// `{ "ok": bool, "error"? }`
#[derive(Debug, Serialize)]
pub struct OkEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBanner>,
}

fn banner(op: &str, err: &WorkspaceError) -> ErrorBanner {
    if !err.needs_reconnect() {
        warn!(op, error = %err, "[Workspace] operation failed");
    }
    err.banner()
}

pub fn list<T: Serialize>(op: &str, result: Result<Vec<T>, WorkspaceError>) -> Response {
    let envelope = match result {
        Ok(items) => ListEnvelope { items, error: None },
        Err(e) => ListEnvelope {
            items: Vec::new(),
            error: Some(banner(op, &e)),
        },
    };
    Json(envelope).into_response()
}

pub fn data<T: Serialize>(op: &str, result: Result<T, WorkspaceError>) -> Response {
    let envelope = match result {
        Ok(data) => DataEnvelope {
            data: Some(data),
            error: None,
        },
        Err(e) => DataEnvelope {
            data: None,
            error: Some(banner(op, &e)),
        },
    };
    Json(envelope).into_response()
}

pub fn ok(op: &str, result: Result<(), WorkspaceError>) -> Response {
    let envelope = match result {
        Ok(()) => OkEnvelope {
            ok: true,
            error: None,
        },
        Err(e) => OkEnvelope {
            ok: false,
            error: Some(banner(op, &e)),
        },
    };
    Json(envelope).into_response()
}
