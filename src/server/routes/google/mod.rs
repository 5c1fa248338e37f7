pub mod envelope;
pub mod files;
pub mod gmail;
pub mod oauth;

use crate::server::router::ByteccState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<ByteccState> {
    Router::new()
        .route("/google/auth", get(oauth::google_oauth_entry))
        .route("/oauth2callback", get(oauth::google_oauth_callback))
        .route("/api/gmail/messages", get(gmail::list_messages))
        .route("/api/gmail/messages/{id}", get(gmail::get_message))
        .route("/api/gmail/messages/{id}/modify", post(gmail::modify_labels))
        .route("/api/gmail/labels", get(gmail::list_labels))
        .route("/api/gmail/send", post(gmail::send_message))
        .route("/api/docs/{id}", get(files::get_document))
        .route("/api/sheets/{id}", get(files::get_spreadsheet))
        .route("/api/sheets/{id}/values/{range}", get(files::get_values))
        .route("/api/drive/files", get(files::list_files))
}
