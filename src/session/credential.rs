use chrono::{DateTime, TimeDelta, Utc};
use std::{sync::Arc, time::Duration};

/// Treat a token as expired slightly early so an in-flight call does not race the deadline.
const EXPIRY_SKEW_SECS: i64 = 30;

/// Google bearer credential for one browser session.
#[derive(Clone)]
pub struct Credential {
    access_token: Arc<str>,
    scopes: Vec<String>,
    obtained_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<Arc<str>>,
        scopes: Vec<String>,
        expires_in: Option<Duration>,
    ) -> Self {
        let obtained_at = Utc::now();
        let expires_at = expires_in
            .and_then(|d| TimeDelta::from_std(d).ok())
            .map(|d| obtained_at + d);
        Self {
            access_token: access_token.into(),
            scopes,
            obtained_at,
            expires_at,
        }
    }

    pub fn bearer(&self) -> &str {
        &self.access_token
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|deadline| now + TimeDelta::seconds(EXPIRY_SKEW_SECS) >= deadline)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same underlying token (cheap pointer check first).
    pub(crate) fn same_token(&self, other: &Credential) -> bool {
        Arc::ptr_eq(&self.access_token, &other.access_token)
            || self.access_token == other.access_token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
