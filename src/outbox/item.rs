use crate::config::OutboxSeed;
use crate::error::OutboxError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboxStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Reviewer verdict on a pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    fn outcome(self) -> OutboxStatus {
        match self {
            Verdict::Approve => OutboxStatus::Approved,
            Verdict::Reject => OutboxStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboxItem {
    pub id: u32,
    pub agent_id: u32,
    pub action: String,
    pub category: String,
    pub description: String,
    pub status: OutboxStatus,
    pub risk: RiskLevel,
}

impl OutboxItem {
    pub(crate) fn from_seed(id: u32, seed: &OutboxSeed) -> Self {
        Self {
            id,
            agent_id: seed.agent_id,
            action: seed.action.clone(),
            category: seed.category.clone(),
            description: seed.description.clone(),
            status: seed.status,
            risk: seed.risk,
        }
    }

    /// Pending -> Approved | Rejected. A decided item keeps its status.
    pub(crate) fn decide(&mut self, verdict: Verdict) -> Result<(), OutboxError> {
        if self.status != OutboxStatus::Pending {
            return Err(OutboxError::AlreadyDecided {
                id: self.id,
                status: self.status,
            });
        }
        self.status = verdict.outcome();
        Ok(())
    }
}
