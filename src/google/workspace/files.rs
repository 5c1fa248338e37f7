use super::{DRIVE_PAGE_CAP, WorkspaceClient};
use crate::error::WorkspaceError;
use crate::session::SessionContext;
use bytecc_schema::drive::DRIVE_FILE_FIELDS;
use bytecc_schema::{DocsDocument, DriveFile, DriveFileList, Spreadsheet, ValueRange};

const DEFAULT_DRIVE_QUERY: &str = "trashed=false";

impl WorkspaceClient {
    pub async fn get_document(
        &self,
        session: &SessionContext,
        id: &str,
    ) -> Result<DocsDocument, WorkspaceError> {
        let url = Self::endpoint(&self.cfg.docs_api_url, ["documents", id])?;
        self.get_json(session, url).await
    }

    pub async fn get_spreadsheet(
        &self,
        session: &SessionContext,
        id: &str,
    ) -> Result<Spreadsheet, WorkspaceError> {
        let url = Self::endpoint(&self.cfg.sheets_api_url, ["spreadsheets", id])?;
        self.get_json(session, url).await
    }

    /// Cell values of `range` (A1 notation) in spreadsheet `id`.
    pub async fn get_values(
        &self,
        session: &SessionContext,
        id: &str,
        range: &str,
    ) -> Result<ValueRange, WorkspaceError> {
        let url = Self::endpoint(&self.cfg.sheets_api_url, ["spreadsheets", id, "values", range])?;
        self.get_json(session, url).await
    }

    /// Drive files matching `query` (non-trashed files when absent or blank).
    pub async fn list_files(
        &self,
        session: &SessionContext,
        query: Option<&str>,
        max: u32,
    ) -> Result<Vec<DriveFile>, WorkspaceError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_DRIVE_QUERY);
        let page = max.clamp(1, DRIVE_PAGE_CAP);

        let mut url = Self::endpoint(&self.cfg.drive_api_url, ["files"])?;
        url.query_pairs_mut()
            .append_pair("pageSize", &page.to_string())
            .append_pair("fields", DRIVE_FILE_FIELDS)
            .append_pair("q", query);

        let listing: DriveFileList = self.get_json(session, url).await?;
        Ok(listing.files)
    }
}
