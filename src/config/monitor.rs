use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Agent monitor configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Progress tick interval in milliseconds.
    /// TOML: `monitor.tick_ms`. Default: `2000`.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Upper bound (exclusive) of the random progress step per tick.
    /// TOML: `monitor.max_step`. Default: `15.0`.
    #[serde(default = "default_max_step")]
    pub max_step: f64,

    /// Agents shown on the monitor.
    /// TOML: `[[monitor.agents]]` tables with `name`, `category`, `running`, `progress`.
    #[serde(default)]
    pub agents: Vec<AgentSeed>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentSeed {
    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Start in the running state.
    #[serde(default)]
    pub running: bool,

    /// Initial progress, clamped to 0..=100.
    #[serde(default)]
    pub progress: f64,
}

impl MonitorConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            max_step: default_max_step(),
            agents: Vec::new(),
        }
    }
}

fn default_tick_ms() -> u64 {
    2000
}

fn default_max_step() -> f64 {
    15.0
}
