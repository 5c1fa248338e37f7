use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    response::Response,
    routing::post,
};
use serde_json::{Value, json};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceExt;
use url::Url;

#[derive(Clone)]
struct MockRouter {
    reqs: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    received: Arc<Notify>,
    status: StatusCode,
    delay: Duration,
    reply: Value,
}

impl MockRouter {
    fn new(status: StatusCode, delay: Duration, reply: Value) -> Self {
        Self {
            reqs: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Notify::new()),
            status,
            delay,
            reply,
        }
    }

    fn count(&self) -> usize {
        self.reqs.lock().unwrap().len()
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

async fn completions_handler(
    State(mock): State<MockRouter>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.reqs.lock().unwrap().push((headers, body));
    mock.received.notify_one();
    tokio::time::sleep(mock.delay).await;
    (mock.status, Json(mock.reply.clone()))
}

async fn build_app(mock: &MockRouter) -> Router {
    build_app_with(mock, |_| {}).await
}

async fn build_app_with(
    mock: &MockRouter,
    tweak: impl FnOnce(&mut bytecc::config::Config),
) -> Router {
    let upstream = Router::new()
        .route("/api/v1/chat/completions", post(completions_handler))
        .with_state(mock.clone());
    let base = spawn_test_server(upstream).await;

    let mut cfg = bytecc::config::Config::default();
    cfg.basic.insecure_cookie = true;
    cfg.relay.api_url = base.join("api/v1/chat/completions").unwrap();
    cfg.relay.api_key = "relay-test-key".to_string();
    cfg.relay.app_url = "http://dashboard.test".to_string();
    cfg.relay.system_prompt = "You are Byte.".to_string();
    cfg.relay.welcome_message = "Welcome aboard.".to_string();
    tweak(&mut cfg);
    bytecc::bytecc_router(bytecc::ByteccState::new(&cfg))
}

fn reply(text: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
}

async fn call(
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

/// Opens a console; returns the session cookie and the initial snapshot.
async fn open_console(app: &Router) -> (String, Value) {
    let resp = call(app, "GET", "/api/console", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("bytecc_session="))
        .and_then(|c| c.split(';').next())
        .expect("session cookie")
        .to_string();
    (cookie, json_body(resp).await)
}

#[tokio::test]
async fn new_console_starts_with_welcome_turn_and_default_model() {
    let mock = MockRouter::new(StatusCode::OK, Duration::ZERO, reply("hi"));
    let app = build_app(&mock).await;

    let (_, snapshot) = open_console(&app).await;
    assert_eq!(snapshot["busy"], false);
    assert_eq!(snapshot["selected_model"], "orchestration");
    let turns = snapshot["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["role"], "system");
    assert_eq!(turns[0]["content"], "Welcome aboard.");

    let models = json_body(call(&app, "GET", "/api/models", None, None).await).await;
    assert_eq!(models.as_array().unwrap().len(), 5);
    assert_eq!(models[2]["key"], "coding");
}

#[tokio::test]
async fn blank_message_is_rejected_without_touching_transcript() {
    let mock = MockRouter::new(StatusCode::OK, Duration::ZERO, reply("hi"));
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "   \n\t" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"]["code"], "INVALID_REQUEST");

    let snapshot = json_body(call(&app, "GET", "/api/console", Some(&cookie), None).await).await;
    assert_eq!(snapshot["turns"].as_array().unwrap().len(), 1);
    assert_eq!(mock.count(), 0);
}

#[tokio::test]
async fn message_is_relayed_with_server_key_and_reply_appended() {
    let mock = MockRouter::new(
        StatusCode::OK,
        Duration::ZERO,
        reply("Here you go:\n```jsx\nexport default () => null;\n```"),
    );
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "Build a dashboard component", "model": "coding" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let exchange = json_body(resp).await;
    assert_eq!(exchange["user"]["role"], "user");
    assert_eq!(exchange["assistant"]["role"], "assistant");
    assert_eq!(exchange["assistant"]["model"], "Claude Sonnet 4.5");
    let artifacts: Vec<&str> = exchange["assistant"]["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(artifacts, ["GeneratedComponent.jsx", "CodeOutput.jsx"]);

    let reqs = mock.reqs.lock().unwrap();
    assert_eq!(reqs.len(), 1);
    let (headers, body) = &reqs[0];
    assert_eq!(headers[header::AUTHORIZATION], "Bearer relay-test-key");
    assert_eq!(headers["http-referer"], "http://dashboard.test");
    assert_eq!(headers["x-title"], "Byte Command Center");
    assert_eq!(body["model"], "anthropic/claude-sonnet-4.5");
    assert_eq!(body["max_tokens"], 2048);
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "You are Byte." },
            { "role": "user", "content": "Build a dashboard component" }
        ])
    );
    drop(reqs);

    let snapshot = json_body(call(&app, "GET", "/api/console", Some(&cookie), None).await).await;
    assert_eq!(snapshot["selected_model"], "coding");
    assert_eq!(snapshot["turns"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn upstream_failure_becomes_assistant_text_naming_the_model() {
    let mock = MockRouter::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        Duration::ZERO,
        json!({ "error": { "message": "boom" } }),
    );
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let resp = call(
        &app,
        "PUT",
        "/api/console/model",
        Some(&cookie),
        Some(json!({ "model": "multi_agent" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "status report" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let exchange = json_body(resp).await;
    assert_eq!(
        exchange["assistant"]["content"],
        "Error connecting to Claude Opus 4.5. Please check your connection and try again."
    );
    assert_eq!(mock.count(), 1);

    let snapshot = json_body(call(&app, "GET", "/api/console", Some(&cookie), None).await).await;
    assert_eq!(snapshot["busy"], false);
}

#[tokio::test]
async fn unknown_model_selector_is_rejected() {
    let mock = MockRouter::new(StatusCode::OK, Duration::ZERO, reply("hi"));
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let resp = call(
        &app,
        "PUT",
        "/api/console/model",
        Some(&cookie),
        Some(json!({ "model": "gpt-17" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"]["code"], "UNKNOWN_MODEL");
}

#[tokio::test]
async fn second_message_while_sending_is_refused() {
    let mock = MockRouter::new(StatusCode::OK, Duration::from_millis(300), reply("done"));
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let first = {
        let app = app.clone();
        let cookie = cookie.clone();
        tokio::spawn(async move {
            call(
                &app,
                "POST",
                "/api/console/messages",
                Some(&cookie),
                Some(json!({ "content": "first" })),
            )
            .await
        })
    };
    mock.received.notified().await;

    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "second" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["error"]["code"], "CONSOLE_BUSY");

    let first = first.await.expect("first request task");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(mock.count(), 1);

    let snapshot = json_body(call(&app, "GET", "/api/console", Some(&cookie), None).await).await;
    let contents: Vec<&str> = snapshot["turns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["Welcome aboard.", "first", "done"]);
    assert_eq!(snapshot["busy"], false);
}

#[tokio::test]
async fn client_hanging_up_mid_relay_leaves_a_cancellation_reply() {
    let mock = MockRouter::new(StatusCode::OK, Duration::from_millis(500), reply("late"));
    let app = build_app(&mock).await;
    let (cookie, _) = open_console(&app).await;

    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        call(
            &app,
            "POST",
            "/api/console/messages",
            Some(&cookie),
            Some(json!({ "content": "first" })),
        ),
    )
    .await;
    assert!(abandoned.is_err(), "relay should still be pending");

    let snapshot = json_body(call(&app, "GET", "/api/console", Some(&cookie), None).await).await;
    assert_eq!(snapshot["busy"], false);
    let turns: Vec<(&str, &str)> = snapshot["turns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["role"].as_str().unwrap(), t["content"].as_str().unwrap()))
        .collect();
    assert_eq!(
        turns,
        [
            ("system", "Welcome aboard."),
            ("user", "first"),
            ("assistant", "Request cancelled before a reply arrived."),
        ]
    );

    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "second" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let reqs = mock.reqs.lock().unwrap();
    let (_, body) = reqs.last().expect("second relay request");
    let roles: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, ["system", "user", "assistant", "user"]);
}

#[tokio::test]
async fn relay_timeout_becomes_assistant_text_naming_the_model() {
    let mock = MockRouter::new(StatusCode::OK, Duration::from_secs(30), reply("too late"));
    let app = build_app_with(&mock, |cfg| cfg.basic.request_timeout_secs = 10).await;
    let (cookie, _) = open_console(&app).await;

    let started = std::time::Instant::now();
    let resp = call(
        &app,
        "POST",
        "/api/console/messages",
        Some(&cookie),
        Some(json!({ "content": "ping", "model": "coding" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(
        json_body(resp).await["assistant"]["content"],
        "Error connecting to Claude Sonnet 4.5. Please check your connection and try again."
    );
    assert_eq!(mock.count(), 1);
}
