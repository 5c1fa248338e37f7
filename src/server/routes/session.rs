use crate::server::guards::session::CurrentSession;
use crate::server::router::ByteccState;
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub connected: bool,
    pub scopes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// GET /api/session
pub async fn session_status(CurrentSession(session): CurrentSession) -> Json<SessionStatus> {
    let status = match session.credential().filter(|c| !c.is_expired()) {
        Some(credential) => SessionStatus {
            connected: true,
            scopes: credential.scopes().to_vec(),
            expires_at: credential.expires_at(),
        },
        None => SessionStatus {
            connected: false,
            scopes: Vec::new(),
            expires_at: None,
        },
    };
    Json(status)
}

/// POST /google/disconnect
pub async fn disconnect(CurrentSession(session): CurrentSession) -> StatusCode {
    session.clear_credential();
    StatusCode::NO_CONTENT
}

pub fn router() -> Router<ByteccState> {
    Router::new()
        .route("/api/session", get(session_status))
        .route("/google/disconnect", post(disconnect))
}
