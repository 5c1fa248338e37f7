use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::BasicConfig;
use super::basic::deserialize_string_lax;

/// Google OAuth client and Workspace endpoint configuration managed by Figment.
///
/// Endpoint URLs are configurable so tests (and self-hosted mocks) can point them at a local
/// server; production deployments normally only set the client credentials and redirect URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// OAuth client id of a "Web application" client.
    /// TOML: `google.client_id`. Required by the binary.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub client_id: String,

    /// OAuth client secret; used only for the server-side code exchange.
    /// TOML: `google.client_secret`. Required by the binary.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub client_secret: String,

    /// Redirect URI registered with Google; must route to `/oauth2callback`.
    /// TOML: `google.redirect_url`. Default: `http://localhost:8188/oauth2callback`.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: Url,

    /// Where the browser lands after a successful callback.
    /// TOML: `google.post_login_redirect`. Default: `/`.
    #[serde(default = "default_post_login_redirect")]
    pub post_login_redirect: String,

    /// TOML: `google.auth_url`. Default: `https://accounts.google.com/o/oauth2/v2/auth`.
    #[serde(default = "default_auth_url")]
    pub auth_url: Url,

    /// TOML: `google.token_url`. Default: `https://oauth2.googleapis.com/token`.
    #[serde(default = "default_token_url")]
    pub token_url: Url,

    /// Requested scopes, sent space-joined in this order.
    /// TOML: `google.scopes`.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// `access_type` knob on the authorization request. `online` yields no refresh token.
    /// TOML: `google.access_type`. Default: `online`.
    #[serde(default = "default_access_type")]
    pub access_type: String,

    /// TOML: `google.gmail_api_url`. Default: `https://gmail.googleapis.com/gmail/v1`.
    #[serde(default = "default_gmail_api_url")]
    pub gmail_api_url: Url,

    /// TOML: `google.docs_api_url`. Default: `https://docs.googleapis.com/v1`.
    #[serde(default = "default_docs_api_url")]
    pub docs_api_url: Url,

    /// TOML: `google.sheets_api_url`. Default: `https://sheets.googleapis.com/v4`.
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: Url,

    /// TOML: `google.drive_api_url`. Default: `https://www.googleapis.com/drive/v3`.
    #[serde(default = "default_drive_api_url")]
    pub drive_api_url: Url,

    /// Optional proxy for Google calls. Falls back to `basic.proxy` when unset.
    /// TOML: `google.proxy`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct GoogleResolvedConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: Url,
    pub post_login_redirect: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub scopes: Vec<String>,
    pub access_type: String,
    pub gmail_api_url: Url,
    pub docs_api_url: Url,
    pub sheets_api_url: Url,
    pub drive_api_url: Url,
    pub proxy: Option<Url>,
    pub request_timeout: Duration,
}

impl GoogleConfig {
    pub fn resolve(&self, basic: &BasicConfig) -> GoogleResolvedConfig {
        GoogleResolvedConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.redirect_url.clone(),
            post_login_redirect: self.post_login_redirect.clone(),
            auth_url: self.auth_url.clone(),
            token_url: self.token_url.clone(),
            scopes: self.scopes.clone(),
            access_type: self.access_type.clone(),
            gmail_api_url: self.gmail_api_url.clone(),
            docs_api_url: self.docs_api_url.clone(),
            sheets_api_url: self.sheets_api_url.clone(),
            drive_api_url: self.drive_api_url.clone(),
            proxy: self.proxy.clone().or_else(|| basic.proxy.clone()),
            request_timeout: basic.request_timeout(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: default_redirect_url(),
            post_login_redirect: default_post_login_redirect(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            scopes: default_scopes(),
            access_type: default_access_type(),
            gmail_api_url: default_gmail_api_url(),
            docs_api_url: default_docs_api_url(),
            sheets_api_url: default_sheets_api_url(),
            drive_api_url: default_drive_api_url(),
            proxy: None,
        }
    }
}

fn default_redirect_url() -> Url {
    Url::parse("http://localhost:8188/oauth2callback")
        .expect("default redirect_url must be a valid URL")
}

fn default_post_login_redirect() -> String {
    "/".to_string()
}

fn default_auth_url() -> Url {
    Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .expect("default auth_url must be a valid URL")
}

fn default_token_url() -> Url {
    Url::parse("https://oauth2.googleapis.com/token").expect("default token_url must be a valid URL")
}

fn default_access_type() -> String {
    "online".to_string()
}

fn default_gmail_api_url() -> Url {
    Url::parse("https://gmail.googleapis.com/gmail/v1")
        .expect("default gmail_api_url must be a valid URL")
}

fn default_docs_api_url() -> Url {
    Url::parse("https://docs.googleapis.com/v1").expect("default docs_api_url must be a valid URL")
}

fn default_sheets_api_url() -> Url {
    Url::parse("https://sheets.googleapis.com/v4")
        .expect("default sheets_api_url must be a valid URL")
}

fn default_drive_api_url() -> Url {
    Url::parse("https://www.googleapis.com/drive/v3")
        .expect("default drive_api_url must be a valid URL")
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/gmail.readonly".to_string(),
        "https://www.googleapis.com/auth/gmail.send".to_string(),
        "https://www.googleapis.com/auth/gmail.modify".to_string(),
        "https://www.googleapis.com/auth/drive.readonly".to_string(),
        "https://www.googleapis.com/auth/documents.readonly".to_string(),
        "https://www.googleapis.com/auth/spreadsheets.readonly".to_string(),
    ]
}
