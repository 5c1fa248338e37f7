//! Agent-proposed actions waiting for a human decision.

mod item;

pub use item::{OutboxItem, OutboxStatus, RiskLevel, Verdict};

use crate::config::OutboxConfig;
use crate::error::OutboxError;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

pub struct Outbox {
    items: Mutex<Vec<OutboxItem>>,
}

impl Outbox {
    /// Items get 1-based ids in configuration order.
    pub fn new(cfg: &OutboxConfig) -> Self {
        let items = (1..)
            .zip(&cfg.items)
            .map(|(id, seed)| OutboxItem::from_seed(id, seed))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OutboxItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Items with `status`, or all of them.
    pub fn list(&self, status: Option<OutboxStatus>) -> Vec<OutboxItem> {
        self.lock()
            .iter()
            .filter(|item| status.is_none_or(|s| item.status == s))
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|item| item.status == OutboxStatus::Pending)
            .count()
    }

    pub fn decide(&self, id: u32, verdict: Verdict) -> Result<OutboxItem, OutboxError> {
        let mut items = self.lock();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(OutboxError::UnknownItem(id))?;
        item.decide(verdict)?;
        info!(item = id, agent = item.agent_id, status = ?item.status, "[Outbox] item decided");
        Ok(item.clone())
    }
}
