mod files;
mod gmail;
mod mime;

pub use gmail::OutgoingMail;
pub use mime::compose_raw_message;

use crate::config::GoogleResolvedConfig;
use crate::error::WorkspaceError;
use crate::session::{Credential, SessionContext};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Listing pages never exceed these sizes, whatever the caller asks for.
pub const MAIL_PAGE_CAP: u32 = 10;
pub const DRIVE_PAGE_CAP: u32 = 20;

/// Concurrent message-detail fetches per listing.
const DETAIL_CONCURRENCY: usize = 5;

/// Authenticated Gmail / Docs / Sheets / Drive operations on behalf of one session.
///
/// Each call snapshots the session credential before doing anything else; without one it fails
/// with [`WorkspaceError::MissingCredential`] and never touches the network.
#[derive(Clone)]
pub struct WorkspaceClient {
    client: reqwest::Client,
    cfg: Arc<GoogleResolvedConfig>,
}

impl WorkspaceClient {
    pub fn new(cfg: Arc<GoogleResolvedConfig>, client: reqwest::Client) -> Self {
        Self { client, cfg }
    }

    /// `base` with `segments` appended, each percent-encoded as a single path segment.
    fn endpoint<'a>(
        base: &Url,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, WorkspaceError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| WorkspaceError::InvalidPath(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &SessionContext,
        url: Url,
    ) -> Result<T, WorkspaceError> {
        let credential = session.require_credential()?;
        let req = self.client.get(url.clone());
        let resp = self.send(session, &credential, &url, req).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        session: &SessionContext,
        url: Url,
        body: &B,
    ) -> Result<reqwest::Response, WorkspaceError> {
        let credential = session.require_credential()?;
        let req = self.client.post(url.clone()).json(body);
        self.send(session, &credential, &url, req).await
    }

    async fn send(
        &self,
        session: &SessionContext,
        credential: &Credential,
        url: &Url,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, WorkspaceError> {
        let resp = req
            .bearer_auth(credential.bearer())
            .timeout(self.cfg.request_timeout)
            .send()
            .await?;

        let status = resp.status();
        debug!(path = %url.path(), status = status.as_u16(), "[Workspace] upstream response");
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!(path = %url.path(), "[Workspace] credential rejected by Google, clearing it");
            session.clear_credential_if_current(credential);
            return Err(WorkspaceError::CredentialRejected);
        }
        warn!(path = %url.path(), status = status.as_u16(), "[Workspace] upstream error");
        Err(WorkspaceError::UpstreamStatus(status))
    }
}
