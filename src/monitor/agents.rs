use crate::config::AgentSeed;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const PROGRESS_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub state: AgentState,
    pub progress: f64,
    pub last_run: Option<DateTime<Utc>>,
}

impl AgentStatus {
    pub(crate) fn from_seed(id: u32, seed: &AgentSeed) -> Self {
        Self {
            id,
            name: seed.name.clone(),
            category: seed.category.clone(),
            state: if seed.running {
                AgentState::Running
            } else {
                AgentState::Idle
            },
            progress: seed_progress(seed.progress),
            last_run: None,
        }
    }

    /// Put the agent (back) into the running state; a completed run starts over from zero.
    pub(crate) fn run(&mut self) {
        if self.state == AgentState::Completed {
            self.progress = 0.0;
        }
        self.state = AgentState::Running;
    }
}

fn seed_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, PROGRESS_MAX)
    } else {
        0.0
    }
}

/// One tick for one agent. Only running agents move; progress saturates at [`PROGRESS_MAX`],
/// which completes the agent.
pub fn advance(agent: &mut AgentStatus, step: f64, now: DateTime<Utc>) {
    if agent.state != AgentState::Running {
        return;
    }
    agent.progress = (agent.progress + step.max(0.0)).min(PROGRESS_MAX);
    agent.last_run = Some(now);
    if agent.progress >= PROGRESS_MAX {
        agent.state = AgentState::Completed;
    }
}
