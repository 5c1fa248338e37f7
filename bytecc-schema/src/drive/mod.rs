use serde::{Deserialize, Serialize};

/// Field mask requested from `files.list`; keep in sync with [`DriveFile`].
pub const DRIVE_FILE_FIELDS: &str = "files(id,name,mimeType,modifiedTime,webViewLink)";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub modified_time: String,

    #[serde(default)]
    pub web_view_link: String,
}
