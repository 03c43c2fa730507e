//! Integration tests for `GET /check-ip`.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{FailingIpEcho, FixedIpEcho, TestHarness, get};

#[tokio::test]
async fn test_check_ip_success() {
    let harness = TestHarness::with_echo(Arc::new(FixedIpEcho("198.51.100.4")), false);
    let (status, body) = harness.send_json(get("/check-ip")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Outbound call successful! This is the public IP of the server.",
            "ip": "198.51.100.4",
        })
    );
}

#[tokio::test]
async fn test_check_ip_failure() {
    let harness = TestHarness::with_echo(Arc::new(FailingIpEcho), false);
    let (status, body) = harness.send_json(get("/check-ip")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to make outbound call" }));
}

#[tokio::test]
async fn test_check_ip_failure_with_details() {
    let harness = TestHarness::with_echo(Arc::new(FailingIpEcho), true);
    let (_, body) = harness.send_json(get("/check-ip")).await;
    assert_eq!(body["error"], "Failed to make outbound call");
    assert!(body["details"].as_str().unwrap().contains("unreachable"));
}

#[tokio::test]
async fn test_check_ip_does_not_touch_storage() {
    let harness = TestHarness::new();
    harness.store.set_failing(true);
    let (status, _) = harness.send_json(get("/check-ip")).await;
    assert_eq!(status, StatusCode::OK);
}
