mod agents;
mod ticker;

pub use agents::{AgentState, AgentStatus, PROGRESS_MAX, advance};
pub use ticker::Ticker;

use crate::config::MonitorConfig;
use chrono::Utc;
use rand::Rng as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

type AgentTable = Arc<Mutex<Vec<AgentStatus>>>;

fn lock(agents: &AgentTable) -> MutexGuard<'_, Vec<AgentStatus>> {
    agents.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Configured agents plus the ticker that advances their progress.
pub struct AgentMonitor {
    agents: AgentTable,
    ticker: Mutex<Option<Ticker>>,
    period: Duration,
    max_step: f64,
}

impl AgentMonitor {
    pub fn new(cfg: &MonitorConfig) -> Self {
        let agents = (1..)
            .zip(&cfg.agents)
            .map(|(id, seed)| AgentStatus::from_seed(id, seed))
            .collect();
        Self {
            agents: Arc::new(Mutex::new(agents)),
            ticker: Mutex::new(None),
            period: cfg.tick(),
            max_step: cfg.max_step,
        }
    }

    /// Start the ticker if it is not running. Requires a tokio runtime.
    pub fn start(&self) {
        let mut slot = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        let agents = self.agents.clone();
        let max_step = self.max_step;
        *slot = Some(Ticker::spawn(self.period, move || {
            tick_all(&agents, max_step);
        }));
        info!(period = ?self.period, agents = lock(&self.agents).len(), "[Monitor] ticker started");
    }

    /// Stop the ticker and wait for it to finish.
    pub async fn shutdown(&self) {
        let ticker = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ticker) = ticker {
            ticker.stop().await;
            info!("[Monitor] ticker shut down");
        }
    }

    pub fn snapshot(&self) -> Vec<AgentStatus> {
        lock(&self.agents).clone()
    }

    /// Mark agent `id` as running. `None` when no such agent exists.
    pub fn run(&self, id: u32) -> Option<AgentStatus> {
        let mut agents = lock(&self.agents);
        let agent = agents.iter_mut().find(|a| a.id == id)?;
        agent.run();
        Some(agent.clone())
    }
}

impl Drop for AgentMonitor {
    fn drop(&mut self) {
        // Dropping the ticker aborts its task.
        self.ticker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

fn tick_all(agents: &AgentTable, max_step: f64) {
    let now = Utc::now();
    let mut rng = rand::rng();
    for agent in lock(agents).iter_mut() {
        let step = if max_step.is_finite() && max_step > 0.0 {
            rng.random_range(0.0..max_step)
        } else {
            0.0
        };
        advance(agent, step, now);
    }
}
