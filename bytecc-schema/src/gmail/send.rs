use serde::{Deserialize, Serialize};

/// Body of `POST users/me/messages/send`; `raw` is the base64url-encoded RFC 822 message.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendMessageRequest {
    pub raw: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub thread_id: String,

    #[serde(default)]
    pub label_ids: Vec<String>,
}
