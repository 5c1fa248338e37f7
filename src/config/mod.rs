mod basic;
mod google;
mod monitor;
mod outbox;
mod relay;

pub use basic::BasicConfig;
pub use google::{GoogleConfig, GoogleResolvedConfig};
pub use monitor::{AgentSeed, MonitorConfig};
pub use outbox::{OutboxConfig, OutboxSeed};
pub use relay::{RelayConfig, RelayResolvedConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Google OAuth client and Workspace API endpoints (see `google` table).
    #[serde(default)]
    pub google: GoogleConfig,

    /// Completion router settings (see `relay` table).
    #[serde(default)]
    pub relay: RelayConfig,

    /// Agent monitor settings (see `monitor` table).
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Approval outbox contents (see `outbox` table).
    #[serde(default)]
    pub outbox: OutboxConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "BYTECC_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file, and
    /// `BYTECC_`-prefixed environment variables (`__` separates nested keys, e.g.
    /// `BYTECC_RELAY__API_KEY`).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration without validating secrets.
    pub fn from_optional_toml() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        })
    }

    /// Loads configuration and validates the fields the server cannot run without.
    pub fn from_toml() -> Self {
        let cfg = Self::from_optional_toml();
        if cfg.google.client_id.trim().is_empty() {
            panic!("google.client_id must be set and non-empty");
        }
        if cfg.google.client_secret.trim().is_empty() {
            panic!("google.client_secret must be set and non-empty");
        }
        if cfg.relay.api_key.trim().is_empty() {
            panic!("relay.api_key must be set and non-empty (it never leaves the server)");
        }
        cfg
    }

    pub fn google(&self) -> GoogleResolvedConfig {
        self.google.resolve(&self.basic)
    }

    pub fn relay(&self) -> RelayResolvedConfig {
        self.relay.resolve(&self.basic)
    }
}
