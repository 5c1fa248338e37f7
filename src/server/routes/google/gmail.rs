use super::envelope;
use crate::google::OutgoingMail;
use crate::server::guards::session::CurrentSession;
use crate::server::router::ByteccState;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub max: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyLabelsBody {
    #[serde(default, alias = "add")]
    pub add_label_ids: Vec<String>,
    #[serde(default, alias = "remove")]
    pub remove_label_ids: Vec<String>,
}

/// GET /api/gmail/messages
pub async fn list_messages(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<MessageListQuery>,
) -> Response {
    let q = query.q.as_deref().map_or("", str::trim);
    let max = query.max.unwrap_or(crate::google::workspace::MAIL_PAGE_CAP);
    let result = state.workspace.list_messages(&session, q, max).await;
    envelope::list("gmail.list_messages", result)
}

/// GET /api/gmail/messages/{id}
pub async fn get_message(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Response {
    let result = state.workspace.get_message(&session, &id).await;
    envelope::data("gmail.get_message", result)
}

/// GET /api/gmail/labels
pub async fn list_labels(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let result = state.workspace.list_labels(&session).await;
    envelope::list("gmail.list_labels", result)
}

/// POST /api/gmail/send
pub async fn send_message(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Json(mail): Json<OutgoingMail>,
) -> Response {
    let result = state.workspace.send_message(&session, &mail).await;
    envelope::ok("gmail.send_message", result)
}

/// POST /api/gmail/messages/{id}/modify
pub async fn modify_labels(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<ModifyLabelsBody>,
) -> Response {
    let result = state
        .workspace
        .modify_labels(&session, &id, body.add_label_ids, body.remove_label_ids)
        .await;
    envelope::ok("gmail.modify_labels", result)
}
