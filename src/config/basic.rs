use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};
use url::Url;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `8188`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Drop the `Secure` attribute from the session cookie (plain-HTTP local development only).
    /// TOML: `basic.insecure_cookie`. Default: `false`.
    #[serde(default)]
    pub insecure_cookie: bool,

    /// Optional upstream HTTP proxy shared by every outbound client unless overridden.
    /// TOML: `basic.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Per-request timeout for upstream calls, clamped to 10..=30 seconds.
    /// TOML: `basic.request_timeout_secs`. Default: `20`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Idle time after which a browser session (and its credential) is evicted.
    /// TOML: `basic.session_idle_secs`. Default: `86400`.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            loglevel: "info".to_string(),
            insecure_cookie: false,
            proxy: None,
            request_timeout_secs: default_request_timeout_secs(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl BasicConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.clamp(10, 30))
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.max(60))
    }
}

/// Accepts secrets that an env provider may have parsed as numbers.
pub(super) fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    8188
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_session_idle_secs() -> u64 {
    24 * 60 * 60
}
