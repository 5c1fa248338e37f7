use crate::ByteccError;
use crate::model_catalog::{self, ModelDescriptor};
use crate::relay::{ChatTurn, ConsoleSnapshot, detect_artifacts};
use crate::server::guards::session::CurrentSession;
use crate::server::router::ByteccState;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SelectModelBody {
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
    /// Selects a model for this and later messages.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Exchange {
    pub user: ChatTurn,
    pub assistant: ChatTurn,
}

/// GET /api/console
pub async fn console_snapshot(CurrentSession(session): CurrentSession) -> Json<ConsoleSnapshot> {
    Json(session.console().snapshot())
}

/// PUT /api/console/model
pub async fn select_model(
    CurrentSession(session): CurrentSession,
    Json(body): Json<SelectModelBody>,
) -> Result<Json<ModelDescriptor>, ByteccError> {
    let model = session.console().select_model(body.model.trim())?;
    Ok(Json(*model))
}

/// POST /api/console/messages
///
/// Idle -> Sending -> Idle. Exactly one assistant turn is appended per accepted message; relay
/// failures become that turn's text, and a client that hangs up mid-relay leaves the
/// cancellation notice instead.
pub async fn send_message(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<Exchange>, ByteccError> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err(ByteccError::InvalidRequest(
            "message content must not be blank".to_string(),
        ));
    }

    let console = session.console();
    let mut guard = console.try_begin().ok_or(ByteccError::ConsoleBusy)?;

    let model = match body.model.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => console.select_model(key)?,
        _ => console.selected_model(),
    };

    let user = guard.push_user(content.to_string());
    let transcript = guard.transcript();
    info!(model = model.key, turns = transcript.len(), "[Console] relaying message");

    let reply = state.relay.complete(&transcript, model).await;
    let artifacts = detect_artifacts(content, &reply);
    let assistant = guard.finish(reply, model, artifacts);

    Ok(Json(Exchange { user, assistant }))
}

/// GET /api/models
pub async fn list_models() -> Json<Vec<ModelDescriptor>> {
    Json(model_catalog::MODEL_REGISTRY.iter().copied().collect())
}

pub fn router() -> Router<ByteccState> {
    Router::new()
        .route("/api/console", get(console_snapshot))
        .route("/api/console/model", put(select_model))
        .route("/api/console/messages", post(send_message))
        .route("/api/models", get(list_models))
}
