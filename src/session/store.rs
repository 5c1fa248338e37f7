use super::SessionContext;
use crate::relay::console::ConsoleSession;
use moka::sync::Cache;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

pub type SessionCacheStore = Cache<String, Arc<SessionContext>>;

/// In-memory session registry with idle eviction.
#[derive(Clone)]
pub struct SessionStore {
    cache: SessionCacheStore,
    welcome_message: Arc<str>,
}

impl SessionStore {
    pub fn new(idle: Duration, max_capacity: u64, welcome_message: impl Into<Arc<str>>) -> Self {
        let cache = SessionCacheStore::builder()
            .time_to_idle(idle)
            .max_capacity(max_capacity.max(1))
            .build();
        Self {
            cache,
            welcome_message: welcome_message.into(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<SessionContext>> {
        self.cache.get(id)
    }

    /// Start a fresh session with a new random id and a console holding the welcome turn.
    pub fn create(&self) -> Arc<SessionContext> {
        let id = Uuid::new_v4().simple().to_string();
        let session = Arc::new(SessionContext::new(
            id.clone(),
            ConsoleSession::new(&self.welcome_message),
        ));
        self.cache.insert(id, session.clone());
        session
    }
}
