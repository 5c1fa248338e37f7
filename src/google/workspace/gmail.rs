use super::{DETAIL_CONCURRENCY, MAIL_PAGE_CAP, WorkspaceClient, compose_raw_message};
use crate::error::WorkspaceError;
use crate::session::SessionContext;
use bytecc_schema::gmail::SentMessage;
use bytecc_schema::{
    GmailLabel, GmailLabelList, GmailMessage, GmailMessageList, MailMessage, ModifyLabelsRequest,
    SendMessageRequest,
};
use futures::{StreamExt, stream};
use serde::Deserialize;
use tracing::{debug, info, warn};

const METADATA_HEADERS: [&str; 4] = ["Subject", "From", "To", "Date"];

/// A message composed in the dashboard; `body` is HTML.
#[derive(Debug, Clone, Deserialize)]
pub struct OutgoingMail {
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl WorkspaceClient {
    /// Newest messages matching `query`, at most [`MAIL_PAGE_CAP`], in listing order.
    ///
    /// Details are fetched concurrently; a message whose detail fetch fails is left out.
    pub async fn list_messages(
        &self,
        session: &SessionContext,
        query: &str,
        max: u32,
    ) -> Result<Vec<MailMessage>, WorkspaceError> {
        let page = max.clamp(1, MAIL_PAGE_CAP);
        let mut url = Self::endpoint(&self.cfg.gmail_api_url, ["users", "me", "messages"])?;
        url.query_pairs_mut()
            .append_pair("maxResults", &page.to_string())
            .append_pair("q", query);

        let listing: GmailMessageList = self.get_json(session, url).await?;
        debug!(count = listing.messages.len(), "[Gmail] listing fetched");

        // Gmail may hand back more ids than asked for.
        let details = stream::iter(listing.messages)
            .take(page as usize)
            .map(|msg_ref| async move {
                let result = self.get_message(session, &msg_ref.id).await;
                (msg_ref.id, result)
            })
            .buffered(DETAIL_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        Ok(details
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(msg) => Some(msg),
                Err(e) => {
                    warn!(message.id = %id, error = %e, "[Gmail] detail fetch failed, skipping");
                    None
                }
            })
            .collect())
    }

    /// One message in metadata format, projected to a [`MailMessage`].
    pub async fn get_message(
        &self,
        session: &SessionContext,
        id: &str,
    ) -> Result<MailMessage, WorkspaceError> {
        let mut url = Self::endpoint(&self.cfg.gmail_api_url, ["users", "me", "messages", id])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "metadata");
            for header in METADATA_HEADERS {
                pairs.append_pair("metadataHeaders", header);
            }
        }
        let msg: GmailMessage = self.get_json(session, url).await?;
        Ok(msg.into())
    }

    pub async fn list_labels(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<GmailLabel>, WorkspaceError> {
        let url = Self::endpoint(&self.cfg.gmail_api_url, ["users", "me", "labels"])?;
        let labels: GmailLabelList = self.get_json(session, url).await?;
        Ok(labels.labels)
    }

    pub async fn send_message(
        &self,
        session: &SessionContext,
        mail: &OutgoingMail,
    ) -> Result<(), WorkspaceError> {
        let url = Self::endpoint(&self.cfg.gmail_api_url, ["users", "me", "messages", "send"])?;
        let body = SendMessageRequest {
            raw: compose_raw_message(mail),
        };
        let resp = self.post_json(session, url, &body).await?;
        // The echoed message is informational only; the 2xx is the success signal.
        let sent = resp.json::<SentMessage>().await.unwrap_or_default();
        info!(message.id = %sent.id, "[Gmail] message sent");
        Ok(())
    }

    pub async fn modify_labels(
        &self,
        session: &SessionContext,
        id: &str,
        add: Vec<String>,
        remove: Vec<String>,
    ) -> Result<(), WorkspaceError> {
        let url = Self::endpoint(
            &self.cfg.gmail_api_url,
            ["users", "me", "messages", id, "modify"],
        )?;
        let body = ModifyLabelsRequest {
            add_label_ids: add,
            remove_label_ids: remove,
        };
        self.post_json(session, url, &body).await?;
        debug!(message.id = %id, "[Gmail] labels modified");
        Ok(())
    }
}
