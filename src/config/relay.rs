use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::BasicConfig;
use super::basic::deserialize_string_lax;

/// Completion router configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Chat completions endpoint.
    /// TOML: `relay.api_url`. Default: `https://openrouter.ai/api/v1/chat/completions`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Bearer key for the completion router. Server-side only; never serialized to clients.
    /// TOML: `relay.api_key` or env `BYTECC_RELAY__API_KEY`. Required by the binary.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub api_key: String,

    /// Sent as `HTTP-Referer` for attribution on the router side.
    /// TOML: `relay.app_url`. Default: `http://localhost:8188`.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Sent as `X-Title`.
    /// TOML: `relay.app_title`. Default: `Byte Command Center`.
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// System prompt prepended to every relayed transcript.
    /// TOML: `relay.system_prompt`.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// First (system) turn of every new console.
    /// TOML: `relay.welcome_message`.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// TOML: `relay.max_tokens`. Default: `2048`.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// TOML: `relay.temperature`. Default: `0.7`.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional proxy for relay calls. Falls back to `basic.proxy` when unset.
    /// TOML: `relay.proxy`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct RelayResolvedConfig {
    pub api_url: Url,
    pub api_key: String,
    pub app_url: String,
    pub app_title: String,
    pub system_prompt: String,
    pub welcome_message: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub proxy: Option<Url>,
    pub request_timeout: Duration,
}

impl RelayConfig {
    pub fn resolve(&self, basic: &BasicConfig) -> RelayResolvedConfig {
        RelayResolvedConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            app_url: self.app_url.clone(),
            app_title: self.app_title.clone(),
            system_prompt: self.system_prompt.clone(),
            welcome_message: self.welcome_message.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            proxy: self.proxy.clone().or_else(|| basic.proxy.clone()),
            request_timeout: basic.request_timeout(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            app_url: default_app_url(),
            app_title: default_app_title(),
            system_prompt: default_system_prompt(),
            welcome_message: default_welcome_message(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            proxy: None,
        }
    }
}

fn default_api_url() -> Url {
    Url::parse("https://openrouter.ai/api/v1/chat/completions")
        .expect("default relay api_url must be a valid URL")
}

fn default_app_url() -> String {
    "http://localhost:8188".to_string()
}

fn default_app_title() -> String {
    "Byte Command Center".to_string()
}

fn default_system_prompt() -> String {
    "You are Byte, an AI assistant for a multi-agent orchestration platform. Help users build \
     applications, manage agents, and automate workflows. Be concise and helpful."
        .to_string()
}

fn default_welcome_message() -> String {
    "Welcome to Byte. I can help you prototype applications, delegate to your dev team, or \
     orchestrate your multi-agent system. What would you like to build today?"
        .to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}
