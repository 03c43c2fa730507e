//! Integration tests for the startup stages.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use visitor_log_secrets::StaticSecretProvider;
use visitor_log_server::{ServerConfig, StartupStage, bootstrap, launch};
use visitor_log_store::MemoryVisitorStore;

use crate::common::{FixedIpEcho, TEST_ORIGIN};

fn local_config() -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_launch_binds_after_schema() {
    let store = MemoryVisitorStore::new();
    let app = launch(
        &local_config(),
        Arc::new(store.clone()),
        Arc::new(FixedIpEcho("203.0.113.7")),
        TEST_ORIGIN,
    )
    .await
    .unwrap();

    assert!(store.is_initialized());
    let addr = app.local_addr().unwrap();
    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
}

#[tokio::test]
async fn test_launch_schema_failure_stops_before_listener() {
    let store = MemoryVisitorStore::new();
    store.set_failing(true);

    let err = launch(
        &local_config(),
        Arc::new(store.clone()),
        Arc::new(FixedIpEcho("203.0.113.7")),
        TEST_ORIGIN,
    )
    .await
    .unwrap_err();

    assert_eq!(err.stage(), Some(StartupStage::Schema));
    assert!(!store.is_initialized());
}

#[tokio::test]
async fn test_launch_invalid_origin_fails_at_routes() {
    let err = launch(
        &local_config(),
        Arc::new(MemoryVisitorStore::new()),
        Arc::new(FixedIpEcho("203.0.113.7")),
        "http://bad\norigin",
    )
    .await
    .unwrap_err();
    assert_eq!(err.stage(), Some(StartupStage::Routes));
}

#[tokio::test]
async fn test_launch_port_in_use_fails_at_listener() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = ServerConfig {
        port: taken.local_addr().unwrap().port(),
        ..local_config()
    };

    let err = launch(
        &config,
        Arc::new(MemoryVisitorStore::new()),
        Arc::new(FixedIpEcho("203.0.113.7")),
        TEST_ORIGIN,
    )
    .await
    .unwrap_err();
    assert_eq!(err.stage(), Some(StartupStage::Listener));
}

#[tokio::test]
async fn test_bootstrap_missing_secret_fails_at_secrets() {
    let provider = StaticSecretProvider::new()
        .with("PGHOST", "db.internal")
        .with("PGUSER", "app");

    let err = bootstrap(&local_config(), &provider).await.unwrap_err();
    assert_eq!(err.stage(), Some(StartupStage::Secrets));
    let message = err.to_string();
    assert!(message.contains("PGDATABASE"));
    assert!(message.contains("PGPASSWORD"));
    assert!(message.contains("CORS_ORIGIN"));
}

#[tokio::test]
async fn test_bootstrap_bad_port_fails_at_pool() {
    let provider = StaticSecretProvider::new()
        .with("PGHOST", "db.internal")
        .with("PGUSER", "app")
        .with("PGDATABASE", "visitors")
        .with("PGPASSWORD", "secret")
        .with("PGPORT", "not-a-port")
        .with("CORS_ORIGIN", TEST_ORIGIN);

    let err = bootstrap(&local_config(), &provider).await.unwrap_err();
    assert_eq!(err.stage(), Some(StartupStage::Pool));
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn test_serve_until_shutdown() {
    let app = launch(
        &local_config(),
        Arc::new(MemoryVisitorStore::new()),
        Arc::new(FixedIpEcho("203.0.113.7")),
        TEST_ORIGIN,
    )
    .await
    .unwrap();
    let addr = app.local_addr().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(app.serve_with_shutdown(async move {
        let _ = rx.await;
    }));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("Backend is running!"));

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
