//! Tests for health check endpoints.
//!
//! The health registry is process-wide, so state changes happen inside a
//! single test.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn test_health_probes_follow_store() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storeBackend"], "mock");
    assert_eq!(body["storeConnected"], true);
    assert_eq!(body["catalogConnected"], true);
    assert!(body["components"].as_array().is_some_and(|c| c.len() == 2));

    server.get("/health/ready").await.assert_status_ok();

    ctx.store.set_unreachable(true);
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["storeConnected"], false);

    // Liveness ignores dependencies
    server.get("/health/live").await.assert_status_ok();

    ctx.store.set_unreachable(false);
    server.get("/health/ready").await.assert_status_ok();
}
