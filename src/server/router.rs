use crate::config::{Config, GoogleResolvedConfig};
use crate::google::WorkspaceClient;
use crate::monitor::AgentMonitor;
use crate::outbox::Outbox;
use crate::relay::ChatRelay;
use crate::server::guards::session::attach_session;
use crate::server::routes::{console, google, monitor, outbox, session};
use crate::session::{PendingAuthorizations, SessionStore};

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use reqwest::header::HeaderValue;
use std::time::Instant;
use std::{sync::Arc, sync::LazyLock, time::Duration};
use tracing::{error, info, warn};

/// Process-wide key for the encrypted session cookie; sessions do not outlive the process anyway.
static COOKIE_KEY: LazyLock<Key> = LazyLock::new(Key::generate);

const BYTECC_USER_AGENT: &str = concat!("bytecc/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SESSION_CAPACITY: u64 = 10_000;

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

fn build_client(proxy: Option<&url::Url>, timeout: Duration) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(BYTECC_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout);

    if let Some(proxy_url) = proxy {
        let proxy =
            reqwest::Proxy::all(proxy_url.as_str()).expect("invalid proxy url for reqwest client");
        builder = builder.proxy(proxy);
    }

    builder.build().expect("failed to build reqwest client")
}

#[derive(Clone)]
pub struct ByteccState {
    pub sessions: SessionStore,
    pub pending: PendingAuthorizations,
    pub google_cfg: Arc<GoogleResolvedConfig>,
    /// Used for the OAuth token exchange.
    pub google_client: reqwest::Client,
    pub workspace: WorkspaceClient,
    pub relay: ChatRelay,
    pub monitor: Arc<AgentMonitor>,
    pub outbox: Arc<Outbox>,
    pub insecure_cookie: bool,
}

impl ByteccState {
    pub fn new(cfg: &Config) -> Self {
        let google_cfg = Arc::new(cfg.google());
        let relay_cfg = Arc::new(cfg.relay());

        let google_client = build_client(google_cfg.proxy.as_ref(), google_cfg.request_timeout);
        let relay_client = build_client(relay_cfg.proxy.as_ref(), relay_cfg.request_timeout);

        Self {
            sessions: SessionStore::new(
                cfg.basic.session_idle(),
                SESSION_CAPACITY,
                relay_cfg.welcome_message.as_str(),
            ),
            pending: PendingAuthorizations::default(),
            workspace: WorkspaceClient::new(google_cfg.clone(), google_client.clone()),
            google_cfg,
            google_client,
            relay: ChatRelay::new(relay_cfg, relay_client),
            monitor: Arc::new(AgentMonitor::new(&cfg.monitor)),
            outbox: Arc::new(Outbox::new(&cfg.outbox)),
            insecure_cookie: cfg.basic.insecure_cookie,
        }
    }
}

impl FromRef<ByteccState> for Key {
    fn from_ref(_: &ByteccState) -> Self {
        COOKIE_KEY.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    // Path only: callback query strings carry authorization codes.
    let path = uri.path();
    let protocol = format_http_version(version);

    macro_rules! access_line {
        ($level:ident) => {
            $level!(
                "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
                status.as_u16(),
                request_id,
                method.as_str(),
                protocol,
                path,
                latency_ms,
                user_agent
            )
        };
    }

    if status.is_server_error() {
        access_line!(error);
    } else if status.is_client_error() {
        access_line!(warn);
    } else {
        access_line!(info);
    }

    resp
}

pub fn bytecc_router(state: ByteccState) -> Router {
    let with_session = Router::new()
        .merge(google::router())
        .merge(session::router())
        .merge(console::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_session));

    Router::new()
        .merge(with_session)
        .merge(monitor::router())
        .merge(outbox::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
