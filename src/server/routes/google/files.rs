use super::envelope;
use crate::google::workspace::DRIVE_PAGE_CAP;
use crate::server::guards::session::CurrentSession;
use crate::server::router::ByteccState;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FileListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub max: Option<u32>,
}

/// GET /api/docs/{id}
pub async fn get_document(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Response {
    envelope::data(
        "docs.get_document",
        state.workspace.get_document(&session, &id).await,
    )
}

/// GET /api/sheets/{id}
pub async fn get_spreadsheet(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Response {
    envelope::data(
        "sheets.get_spreadsheet",
        state.workspace.get_spreadsheet(&session, &id).await,
    )
}

/// GET /api/sheets/{id}/values/{range}
pub async fn get_values(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Path((id, range)): Path<(String, String)>,
) -> Response {
    envelope::data(
        "sheets.get_values",
        state.workspace.get_values(&session, &id, &range).await,
    )
}

/// GET /api/drive/files
pub async fn list_files(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<FileListQuery>,
) -> Response {
    let max = query.max.unwrap_or(DRIVE_PAGE_CAP);
    envelope::list(
        "drive.list_files",
        state
            .workspace
            .list_files(&session, query.q.as_deref(), max)
            .await,
    )
}
