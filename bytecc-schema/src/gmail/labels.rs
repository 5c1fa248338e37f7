use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GmailLabelList {
    #[serde(default)]
    pub labels: Vec<GmailLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailLabel {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// `system` or `user`.
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Body of `POST users/me/messages/{id}/modify`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyLabelsRequest {
    #[serde(default)]
    pub add_label_ids: Vec<String>,

    #[serde(default)]
    pub remove_label_ids: Vec<String>,
}
