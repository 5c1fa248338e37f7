use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Google Docs `documents.get` resource.
///
/// Only the identifiers are typed; the structural body (`body`, `namedStyles`, `lists`, ...) is
/// passed through untouched in `extra`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsDocument {
    pub document_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
