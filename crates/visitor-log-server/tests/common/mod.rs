//! Common test utilities and harness for server integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use visitor_log_server::cors::cors_layer;
use visitor_log_server::routes::app;
use visitor_log_server::{AppState, Error, IpEcho, Result};
use visitor_log_store::MemoryVisitorStore;

/// Origin used by every harness.
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Echo stub returning a fixed address.
pub struct FixedIpEcho(pub &'static str);

#[async_trait]
impl IpEcho for FixedIpEcho {
    async fn public_ip(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Echo stub that always fails.
pub struct FailingIpEcho;

#[async_trait]
impl IpEcho for FailingIpEcho {
    async fn public_ip(&self) -> Result<String> {
        Err(Error::upstream("echo service unreachable"))
    }
}

/// Test harness for integration tests.
///
/// Holds a handle to the in-memory store so tests can inspect what the
/// handlers persisted or switch it into failing mode.
pub struct TestHarness {
    /// Store shared with the router
    pub store: MemoryVisitorStore,
    /// The assembled router
    pub router: Router,
}

impl TestHarness {
    /// Harness with a working echo and hidden error details.
    pub fn new() -> Self {
        Self::with_echo(Arc::new(FixedIpEcho("203.0.113.7")), false)
    }

    /// Harness with a custom echo and error-detail setting.
    pub fn with_echo(echo: Arc<dyn IpEcho>, expose_error_details: bool) -> Self {
        let store = MemoryVisitorStore::new();
        let state = AppState::new(Arc::new(store.clone()), echo)
            .with_error_details(expose_error_details);
        let router = app(state, cors_layer(TEST_ORIGIN).unwrap());
        Self { store, router }
    }

    /// Send `request` and return the status with the body parsed as JSON.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        let value = serde_json::from_slice(&bytes).expect("response body should be JSON");
        (status, value)
    }

    /// Send `request` and return the status with the raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// `POST /visitors` with `name`.
    pub async fn add(&self, name: &str) -> StatusCode {
        let (status, _) = self
            .send(post_json("/visitors", &serde_json::json!({ "name": name })))
            .await;
        status
    }

    /// `GET /visitors`, names only.
    pub async fn names(&self) -> Vec<String> {
        let (status, body) = self.send_json(get("/visitors")).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A bodiless GET.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// A POST with a JSON body.
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, "application/json", body.to_string())
}

/// A POST with an arbitrary body and content type.
pub fn post_raw(uri: &str, content_type: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap()
}
