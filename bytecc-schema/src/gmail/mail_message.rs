use serde::{Deserialize, Serialize};

use super::GmailMessage;

const UNREAD_LABEL: &str = "UNREAD";

/// Normalized mail record handed to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailMessage {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub labels: Vec<String>,
    pub snippet: String,
    pub is_unread: bool,
}

impl From<GmailMessage> for MailMessage {
    fn from(msg: GmailMessage) -> Self {
        let subject = msg.header("Subject").to_string();
        let from = msg.header("From").to_string();
        let to = msg.header("To").to_string();
        let date = msg.header("Date").to_string();
        let is_unread = msg.label_ids.iter().any(|l| l == UNREAD_LABEL);

        MailMessage {
            id: msg.id,
            thread_id: msg.thread_id,
            subject,
            from,
            to,
            date,
            labels: msg.label_ids,
            snippet: msg.snippet,
            is_unread,
        }
    }
}
