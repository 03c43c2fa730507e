//! Integration tests for `GET /`.

use axum::http::StatusCode;

use crate::common::{TestHarness, get};

#[tokio::test]
async fn test_health_ok() {
    let harness = TestHarness::new();
    let (status, body) = harness.send(get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Backend is running!");
}

#[tokio::test]
async fn test_health_ignores_storage() {
    let harness = TestHarness::new();
    harness.store.set_failing(true);
    let (status, body) = harness.send(get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Backend is running!");
}

#[tokio::test]
async fn test_unknown_route_404() {
    let harness = TestHarness::new();
    let (status, _) = harness.send(get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
