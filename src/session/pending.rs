use moka::sync::Cache;
use std::{sync::Arc, time::Duration};

/// Outstanding authorization attempts expire after this long.
pub const PENDING_AUTHORIZATION_TTL: Duration = Duration::from_secs(15 * 60);

/// What the callback needs to finish an authorization started by `session_id`.
#[derive(Clone)]
pub struct PendingAuthorization {
    pub session_id: Arc<str>,
    pub pkce_verifier: Arc<str>,
}

impl std::fmt::Debug for PendingAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAuthorization")
            .field("session_id", &super::context::short_id(&self.session_id))
            .field("pkce_verifier", &"<redacted>")
            .finish()
    }
}

/// Anti-forgery tokens issued by the authorization entry point, keyed by `state`.
///
/// Entries are consumed by [`take`](Self::take): a token matches at most one callback.
#[derive(Clone)]
pub struct PendingAuthorizations {
    cache: Cache<String, PendingAuthorization>,
}

impl PendingAuthorizations {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity.max(1))
            .build();
        Self { cache }
    }

    pub fn insert(&self, state: String, pending: PendingAuthorization) {
        self.cache.insert(state, pending);
    }

    /// Remove and return the entry for `state`, if it exists and has not expired.
    pub fn take(&self, state: &str) -> Option<PendingAuthorization> {
        self.cache.remove(state)
    }
}

impl Default for PendingAuthorizations {
    fn default() -> Self {
        Self::new(PENDING_AUTHORIZATION_TTL, 10_000)
    }
}
