use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use gallery::{
    config::{Config, EngineConfig},
    infrastructure::{http::rest_gateway::USER_HEADER, memory::InMemoryInteractionStore},
    presentation::http::{routes::create_router, state::AppState},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{future::Future, sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryInteractionStore>,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        api_base_url: "http://127.0.0.1:0/api".to_string(),
        request_timeout_ms: 2_000,
        like_debounce_ms: 30,
        comment_debounce_ms: 30,
        duplicate_cooldown_ms: 5_000,
        delete_fade_ms: 10,
        notification_capacity: 16,
    }
}

pub fn fast_engine() -> EngineConfig {
    test_config().engine()
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryInteractionStore::new());
    let state = AppState {
        config: test_config(),
        social_repo: store.clone(),
    };
    TestApp {
        app: create_router(state),
        store,
    }
}

/// Serves a fresh app on an ephemeral port; returns the API base URL.
pub async fn serve() -> (String, Arc<InMemoryInteractionStore>) {
    let TestApp { app, store } = spawn_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), store)
}

pub fn unique_entity(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}

pub fn json_request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();
    if actual == expected {
        return res;
    }
    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

/// Fails the test if `fut` does not finish within two seconds.
pub async fn within<F: Future>(what: &str, fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}
