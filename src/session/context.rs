use super::Credential;
use crate::error::WorkspaceError;
use crate::relay::console::ConsoleSession;
use tokio::sync::watch;
use tracing::{debug, info};

/// State owned by one browser session.
///
/// The credential slot is a `watch` channel: every write goes through the single sender held
/// here, readers take whole snapshots, so a reader never observes a half-replaced credential.
pub struct SessionContext {
    id: String,
    credential: watch::Sender<Option<Credential>>,
    console: ConsoleSession,
}

impl SessionContext {
    pub fn new(id: String, console: ConsoleSession) -> Self {
        let (credential, _) = watch::channel(None);
        Self {
            id,
            credential,
            console,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn console(&self) -> &ConsoleSession {
        &self.console
    }

    /// Snapshot of the current credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.credential.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.credential
            .borrow()
            .as_ref()
            .is_some_and(|c| !c.is_expired())
    }

    /// Install (or replace) the session credential. Only the OAuth callback calls this.
    pub(crate) fn install_credential(&self, credential: Credential) {
        info!(
            session = %short_id(&self.id),
            scopes = credential.scopes().len(),
            expires_at = ?credential.expires_at(),
            "Google credential installed"
        );
        self.credential.send_replace(Some(credential));
    }

    /// Drop the credential. Returns whether one was present.
    pub fn clear_credential(&self) -> bool {
        let cleared = self.credential.send_if_modified(|slot| slot.take().is_some());
        if cleared {
            info!(session = %short_id(&self.id), "Google credential cleared");
        }
        cleared
    }

    /// Drop the credential only if it is still `stale`; a newer one installed meanwhile survives.
    pub(crate) fn clear_credential_if_current(&self, stale: &Credential) -> bool {
        self.credential.send_if_modified(|slot| match slot {
            Some(current) if current.same_token(stale) => {
                *slot = None;
                true
            }
            _ => false,
        })
    }

    /// Credential for an outbound call, or why there is none. No network is involved.
    pub(crate) fn require_credential(&self) -> Result<Credential, WorkspaceError> {
        let current = self.credential().ok_or(WorkspaceError::MissingCredential)?;
        if current.is_expired() {
            debug!(session = %short_id(&self.id), "Google credential expired locally");
            self.clear_credential_if_current(&current);
            return Err(WorkspaceError::CredentialExpired);
        }
        Ok(current)
    }
}

/// Session ids are secrets; logs only carry a prefix.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
