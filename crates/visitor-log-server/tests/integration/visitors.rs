//! Integration tests for `GET /visitors` and `POST /visitors`.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{FixedIpEcho, TestHarness, get, post_json, post_raw};

#[tokio::test]
async fn test_empty_table_lists_nothing() {
    let harness = TestHarness::new();
    let (status, body) = harness.send_json(get("/visitors")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_add_returns_created() {
    let harness = TestHarness::new();
    let (status, body) = harness
        .send_json(post_json("/visitors", &json!({ "name": "Alice" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Visitor added successfully" }));
    assert_eq!(harness.store.len(), 1);
}

#[tokio::test]
async fn test_newest_first() {
    let harness = TestHarness::new();
    assert_eq!(harness.add("Alice").await, StatusCode::CREATED);
    assert_eq!(harness.add("Bob").await, StatusCode::CREATED);
    assert_eq!(harness.names().await, ["Bob", "Alice"]);
}

#[tokio::test]
async fn test_added_name_precedes_older_ones() {
    let harness = TestHarness::new();
    for name in ["Ann", "Ben", "Cy"] {
        harness.add(name).await;
    }
    harness.add("Dee").await;
    let names = harness.names().await;
    assert_eq!(names.first().map(String::as_str), Some("Dee"));
    assert_eq!(names.len(), 4);
}

#[tokio::test]
async fn test_list_entries_carry_only_name() {
    let harness = TestHarness::new();
    harness.add("Alice").await;
    let (_, body) = harness.send_json(get("/visitors")).await;
    assert_eq!(body, json!([{ "name": "Alice" }]));
}

#[tokio::test]
async fn test_missing_or_empty_name_rejected() {
    let harness = TestHarness::new();
    for body in [
        json!({}),
        json!({ "name": "" }),
        json!({ "name": null }),
        json!({ "name": 7 }),
    ] {
        let (status, resp) = harness.send_json(post_json("/visitors", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(resp, json!({ "error": "Name is required" }));
    }
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let harness = TestHarness::new();

    let (status, resp) = harness
        .send_json(post_raw("/visitors", "application/json", "{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Name is required");

    let (status, _) = harness
        .send_json(post_raw("/visitors", "text/plain", "Alice"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_overlong_name_rejected() {
    let harness = TestHarness::new();
    let (status, resp) = harness
        .send_json(post_json("/visitors", &json!({ "name": "x".repeat(256) })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("255"));
    assert!(harness.store.is_empty());

    assert_eq!(harness.add(&"x".repeat(255)).await, StatusCode::CREATED);
}

#[tokio::test]
async fn test_concurrent_adds_all_stored_once() {
    let harness = TestHarness::new();
    let n = 25;

    let requests = (0..n).map(|i| {
        let router = harness.router.clone();
        async move {
            use tower::ServiceExt;
            router
                .oneshot(post_json("/visitors", &json!({ "name": format!("visitor-{i}") })))
                .await
                .unwrap()
                .status()
        }
    });
    let statuses = futures::future::join_all(requests).await;
    assert!(statuses.iter().all(|s| *s == StatusCode::CREATED));

    let mut names = harness.names().await;
    names.sort();
    let mut expected: Vec<String> = (0..n).map(|i| format!("visitor-{i}")).collect();
    expected.sort();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_storage_failure_hides_details_by_default() {
    let harness = TestHarness::new();
    harness.store.set_failing(true);

    let (status, body) = harness.send_json(get("/visitors")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));

    let (status, body) = harness
        .send_json(post_json("/visitors", &json!({ "name": "Alice" })))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_storage_failure_with_details() {
    let harness = TestHarness::with_echo(Arc::new(FixedIpEcho("203.0.113.7")), true);
    harness.store.set_failing(true);

    let (status, body) = harness.send_json(get("/visitors")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["details"].as_str().unwrap().contains("failing mode"));
}

#[tokio::test]
async fn test_cors_header_on_list() {
    let harness = TestHarness::new();
    let request = axum::http::Request::builder()
        .uri("/visitors")
        .header("origin", crate::common::TEST_ORIGIN)
        .body(axum::body::Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = harness.router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        crate::common::TEST_ORIGIN
    );
}
