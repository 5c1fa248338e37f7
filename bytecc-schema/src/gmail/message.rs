use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `GET users/me/messages` listing page. Only ids are returned here; details need one more call
/// per message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessageList {
    #[serde(default)]
    pub messages: Vec<GmailMessageRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessageRef {
    pub id: String,

    #[serde(default)]
    pub thread_id: String,
}

/// Gmail message resource (`format=full` or `format=metadata`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,

    #[serde(default)]
    pub thread_id: String,

    #[serde(default)]
    pub label_ids: Vec<String>,

    #[serde(default)]
    pub snippet: String,

    #[serde(default)]
    pub payload: GmailPayload,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailPayload {
    #[serde(default)]
    pub headers: Vec<GmailHeader>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GmailHeader {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub value: String,
}

impl GmailMessage {
    /// Case-insensitive header lookup; first match wins, missing headers read as "".
    pub fn header(&self, name: &str) -> &str {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .unwrap_or("")
    }
}
