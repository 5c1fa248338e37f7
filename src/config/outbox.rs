use crate::outbox::{OutboxStatus, RiskLevel};
use serde::{Deserialize, Serialize};

/// Approval outbox configuration managed by Figment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutboxConfig {
    /// Proposed actions awaiting review.
    /// TOML: `[[outbox.items]]` tables with `agent_id`, `action`, `category`, `description`,
    /// `status`, `risk`.
    #[serde(default)]
    pub items: Vec<OutboxSeed>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutboxSeed {
    /// Agent that proposed the action.
    pub agent_id: u32,

    pub action: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Default: `pending`.
    #[serde(default)]
    pub status: OutboxStatus,

    /// Default: `low`.
    #[serde(default)]
    pub risk: RiskLevel,
}
