use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, State},
    http::{Request, StatusCode, header},
    response::Response,
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

#[derive(Clone, Default)]
struct MockGoogle {
    hits: Arc<AtomicUsize>,
    reject_drive: Arc<AtomicBool>,
    oversized_listing: Arc<AtomicBool>,
    slow_labels: Arc<AtomicBool>,
    queries: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockGoogle {
    fn record(&self, path: &str, query: Option<&str>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let pairs = url::form_urlencoded::parse(query.unwrap_or("").as_bytes())
            .into_owned()
            .collect();
        self.queries.lock().unwrap().push((path.to_string(), pairs));
    }

    fn query_for(&self, path: &str) -> Vec<(String, String)> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .unwrap_or_else(|| panic!("no request recorded for {path}"))
    }
}

async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

async fn token_handler() -> Json<Value> {
    Json(json!({
        "access_token": "ya29.workspace",
        "token_type": "bearer",
        "expires_in": 3599
    }))
}

async fn list_messages(State(mock): State<MockGoogle>, uri: axum::http::Uri) -> Json<Value> {
    mock.record("messages", uri.query());
    if mock.oversized_listing.load(Ordering::SeqCst) {
        // Ignores maxResults and returns 13 ids.
        let ids: Vec<Value> = ["m1", "m2", "broken", "m3"]
            .into_iter()
            .map(str::to_string)
            .chain((1..=9).map(|n| format!("x{n}")))
            .map(|id| json!({ "id": id, "threadId": "t" }))
            .collect();
        return Json(json!({ "messages": ids }));
    }
    Json(json!({
        "messages": [
            { "id": "m1", "threadId": "t1" },
            { "id": "m2", "threadId": "t2" },
            { "id": "broken", "threadId": "t3" },
            { "id": "m3", "threadId": "t4" }
        ],
        "resultSizeEstimate": 4
    }))
}

async fn get_message(
    State(mock): State<MockGoogle>,
    Path(id): Path<String>,
    uri: axum::http::Uri,
) -> Result<Json<Value>, StatusCode> {
    mock.record(&format!("message:{id}"), uri.query());
    // Earlier messages answer later, so completion order differs from listing order.
    let delay = match id.as_str() {
        "m1" => 150,
        "m2" => 75,
        _ => 0,
    };
    tokio::time::sleep(Duration::from_millis(delay)).await;
    if id == "broken" {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let labels = if id == "m2" {
        json!(["INBOX", "UNREAD"])
    } else {
        json!(["INBOX"])
    };
    Ok(Json(json!({
        "id": id,
        "threadId": format!("thread-{id}"),
        "labelIds": labels,
        "snippet": format!("snippet {id}"),
        "payload": {
            "headers": [
                { "name": "Subject", "value": format!("Subject {id}") },
                { "name": "From", "value": "ops@example.com" }
            ]
        }
    })))
}

async fn send_message(State(mock): State<MockGoogle>, Json(body): Json<Value>) -> Json<Value> {
    mock.record("send", None);
    mock.bodies.lock().unwrap().push(("send".to_string(), body));
    Json(json!({ "id": "sent-1", "threadId": "t9", "labelIds": ["SENT"] }))
}

async fn modify_message(
    State(mock): State<MockGoogle>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    mock.record(&format!("modify:{id}"), None);
    mock.bodies.lock().unwrap().push((format!("modify:{id}"), body));
    Json(json!({ "id": id }))
}

async fn list_labels(State(mock): State<MockGoogle>) -> Json<Value> {
    mock.record("labels", None);
    if mock.slow_labels.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    Json(json!({
        "labels": [
            { "id": "INBOX", "name": "INBOX", "type": "system" },
            { "id": "Label_1", "name": "Receipts", "type": "user" }
        ]
    }))
}

async fn list_files(
    State(mock): State<MockGoogle>,
    uri: axum::http::Uri,
) -> Result<Json<Value>, StatusCode> {
    mock.record("files", uri.query());
    if mock.reject_drive.load(Ordering::SeqCst) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "files": [{
            "id": "f1",
            "name": "Roadmap",
            "mimeType": "application/vnd.google-apps.document",
            "modifiedTime": "2025-01-02T03:04:05Z",
            "webViewLink": "https://docs.google.com/document/d/f1"
        }]
    })))
}

async fn get_values(
    State(mock): State<MockGoogle>,
    Path((id, range)): Path<(String, String)>,
) -> Json<Value> {
    mock.record(&format!("values:{id}:{range}"), None);
    Json(json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": [["a", "b"], ["1", "2"]]
    }))
}

async fn get_document(State(mock): State<MockGoogle>, Path(id): Path<String>) -> Json<Value> {
    mock.record(&format!("document:{id}"), None);
    Json(json!({ "documentId": id, "title": "Spec", "body": { "content": [] } }))
}

async fn spawn_mock_google() -> (MockGoogle, Url) {
    let mock = MockGoogle::default();
    let app = Router::new()
        .route("/token", post(token_handler))
        .route("/gmail/v1/users/me/messages", get(list_messages))
        .route("/gmail/v1/users/me/messages/send", post(send_message))
        .route("/gmail/v1/users/me/messages/{id}", get(get_message))
        .route("/gmail/v1/users/me/messages/{id}/modify", post(modify_message))
        .route("/gmail/v1/users/me/labels", get(list_labels))
        .route("/docs/v1/documents/{id}", get(get_document))
        .route("/sheets/v4/spreadsheets/{id}/values/{range}", get(get_values))
        .route("/drive/v3/files", get(list_files))
        .with_state(mock.clone());
    let base = spawn_test_server(app).await;
    (mock, base)
}

fn build_app(base: &Url) -> Router {
    build_app_with(base, |_| {})
}

fn build_app_with(base: &Url, tweak: impl FnOnce(&mut bytecc::config::Config)) -> Router {
    let mut cfg = bytecc::config::Config::default();
    cfg.basic.insecure_cookie = true;
    cfg.google.client_id = "client-1".to_string();
    cfg.google.client_secret = "secret-1".to_string();
    cfg.google.token_url = base.join("token").unwrap();
    cfg.google.gmail_api_url = base.join("gmail/v1").unwrap();
    cfg.google.docs_api_url = base.join("docs/v1").unwrap();
    cfg.google.sheets_api_url = base.join("sheets/v4").unwrap();
    cfg.google.drive_api_url = base.join("drive/v3").unwrap();
    tweak(&mut cfg);
    bytecc::bytecc_router(bytecc::ByteccState::new(&cfg))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(req.body(body).expect("failed to build request"))
        .await
        .expect("request failed")
}

async fn json_body(resp: Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not json")
}

/// Runs the OAuth flow against the mock token endpoint; returns the session cookie.
async fn connect(app: &Router) -> String {
    let resp = send(app, "GET", "/google/auth", None, None).await;
    let cookie = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("bytecc_session="))
        .and_then(|c| c.split(';').next())
        .expect("session cookie")
        .to_string();
    let location = Url::parse(resp.headers()[header::LOCATION].to_str().unwrap()).unwrap();
    let state = location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let resp = send(
        app,
        "GET",
        &format!("/oauth2callback?code=c1&state={state}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    cookie
}

#[tokio::test]
async fn without_credential_routes_answer_banner_and_never_call_google() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);

    let resp = send(&app, "GET", "/api/gmail/messages", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["error"]["code"], "NOT_CONNECTED");
    assert_eq!(body["error"]["reconnect"], true);
    assert_eq!(body["error"]["retryable"], false);

    let body = json_body(send(&app, "GET", "/api/docs/abc", None, None).await).await;
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["error"]["code"], "NOT_CONNECTED");

    let body = json_body(
        send(
            &app,
            "POST",
            "/api/gmail/send",
            None,
            Some(json!({ "to": "a@example.com", "subject": "s", "body": "b" })),
        )
        .await,
    )
    .await;
    assert_eq!(body["ok"], false);

    assert_eq!(mock.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn message_listing_keeps_listing_order_and_skips_failed_details() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;

    let resp = send(
        &app,
        "GET",
        "/api/gmail/messages?q=is:unread&max=50",
        Some(&cookie),
        None,
    )
    .await;
    let body = json_body(resp).await;
    assert!(body.get("error").is_none(), "unexpected error: {body}");

    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["m1", "m2", "m3"]);
    assert_eq!(body["items"][0]["subject"], "Subject m1");
    assert_eq!(body["items"][0]["to"], "");
    assert_eq!(body["items"][1]["is_unread"], true);
    assert_eq!(body["items"][0]["is_unread"], false);

    let listing = mock.query_for("messages");
    assert!(listing.contains(&("maxResults".to_string(), "10".to_string())));
    assert!(listing.contains(&("q".to_string(), "is:unread".to_string())));

    let detail = mock.query_for("message:m1");
    assert!(detail.contains(&("format".to_string(), "metadata".to_string())));
    let headers: Vec<&str> = detail
        .iter()
        .filter(|(k, _)| k == "metadataHeaders")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(headers, ["Subject", "From", "To", "Date"]);
}

#[tokio::test]
async fn message_listing_never_exceeds_page_cap() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;
    mock.oversized_listing.store(true, Ordering::SeqCst);

    let body =
        json_body(send(&app, "GET", "/api/gmail/messages?max=10", Some(&cookie), None).await)
            .await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    // First ten ids, minus the one whose detail fetch fails.
    assert_eq!(ids, ["m1", "m2", "m3", "x1", "x2", "x3", "x4", "x5", "x6"]);

    let detail_fetches = mock
        .queries
        .lock()
        .unwrap()
        .iter()
        .filter(|(p, _)| p.starts_with("message:"))
        .count();
    assert_eq!(detail_fetches, 10);
}

#[tokio::test]
async fn send_composes_base64url_rfc822_message() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;

    let resp = send(
        &app,
        "POST",
        "/api/gmail/send",
        Some(&cookie),
        Some(json!({
            "to": "team@example.com",
            "subject": "Weekly sync",
            "body": "<p>Agenda?</p>"
        })),
    )
    .await;
    assert_eq!(json_body(resp).await, json!({ "ok": true }));

    let bodies = mock.bodies.lock().unwrap();
    let raw = bodies[0].1["raw"].as_str().unwrap();
    assert!(!raw.contains('='));
    let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(raw).unwrap()).unwrap();
    assert_eq!(
        decoded,
        "To: team@example.com\r\nSubject: Weekly sync\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<p>Agenda?</p>"
    );
}

#[tokio::test]
async fn labels_and_label_modification() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;

    let body = json_body(send(&app, "GET", "/api/gmail/labels", Some(&cookie), None).await).await;
    assert_eq!(body["items"][1]["name"], "Receipts");
    assert_eq!(body["items"][1]["type"], "user");

    let resp = send(
        &app,
        "POST",
        "/api/gmail/messages/m1/modify",
        Some(&cookie),
        Some(json!({ "addLabelIds": ["STARRED"], "removeLabelIds": ["UNREAD"] })),
    )
    .await;
    assert_eq!(json_body(resp).await["ok"], true);

    let bodies = mock.bodies.lock().unwrap();
    let (_, sent) = bodies.iter().find(|(k, _)| k == "modify:m1").unwrap();
    assert_eq!(
        sent,
        &json!({ "addLabelIds": ["STARRED"], "removeLabelIds": ["UNREAD"] })
    );
}

#[tokio::test]
async fn drive_listing_uses_field_mask_cap_and_default_query() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;

    let body =
        json_body(send(&app, "GET", "/api/drive/files?max=500", Some(&cookie), None).await).await;
    assert_eq!(body["items"][0]["webViewLink"], "https://docs.google.com/document/d/f1");
    assert_eq!(body["items"][0]["mimeType"], "application/vnd.google-apps.document");

    let query: HashMap<String, String> = mock.query_for("files").into_iter().collect();
    assert_eq!(query["pageSize"], "20");
    assert_eq!(query["q"], "trashed=false");
    assert_eq!(
        query["fields"],
        "files(id,name,mimeType,modifiedTime,webViewLink)"
    );
}

#[tokio::test]
async fn docs_and_sheet_values_are_fetched_by_id() {
    let (_mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;

    let body = json_body(send(&app, "GET", "/api/docs/doc-1", Some(&cookie), None).await).await;
    assert_eq!(body["data"]["documentId"], "doc-1");
    assert_eq!(body["data"]["title"], "Spec");
    assert!(body["data"]["body"].is_object());

    let body = json_body(
        send(
            &app,
            "GET",
            "/api/sheets/sheet-1/values/Sheet1!A1:B2",
            Some(&cookie),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["range"], "Sheet1!A1:B2");
    assert_eq!(body["data"]["values"][1][1], "2");
}

#[tokio::test]
async fn rejected_credential_is_cleared_and_asks_for_reconnect() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app(&base);
    let cookie = connect(&app).await;
    mock.reject_drive.store(true, Ordering::SeqCst);

    let body = json_body(send(&app, "GET", "/api/drive/files", Some(&cookie), None).await).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["error"]["code"], "RECONNECT_REQUIRED");
    assert_eq!(body["error"]["reconnect"], true);

    let status = json_body(send(&app, "GET", "/api/session", Some(&cookie), None).await).await;
    assert_eq!(status["connected"], false);

    let hits = mock.hits.load(Ordering::SeqCst);
    let body = json_body(send(&app, "GET", "/api/gmail/labels", Some(&cookie), None).await).await;
    assert_eq!(body["error"]["code"], "NOT_CONNECTED");
    assert_eq!(mock.hits.load(Ordering::SeqCst), hits);
}

#[tokio::test]
async fn slow_google_surfaces_retryable_timeout_banner() {
    let (mock, base) = spawn_mock_google().await;
    let app = build_app_with(&base, |cfg| cfg.basic.request_timeout_secs = 10);
    let cookie = connect(&app).await;
    mock.slow_labels.store(true, Ordering::SeqCst);

    let started = std::time::Instant::now();
    let resp = send(&app, "GET", "/api/gmail/labels", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(20));

    let body = json_body(resp).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["error"]["code"], "TIMEOUT");
    assert_eq!(body["error"]["retryable"], true);
    assert_eq!(body["error"]["reconnect"], false);

    // A timeout is not a credential problem.
    let status = json_body(send(&app, "GET", "/api/session", Some(&cookie), None).await).await;
    assert_eq!(status["connected"], true);
}
