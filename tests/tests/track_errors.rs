//! Tests for error handling on the tracking endpoints.
//!
//! Every rejection must carry its code and leave the ledger untouched.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_missing_user_returns_valid_001() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for body in [serde_json::json!({}), serde_json::json!({ "userId": "   " })] {
        let response = server
            .post(&fixtures::track_path("prod-1", "view"))
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALID_001");
    }

    assert_eq!(ctx.store.append_attempts(), 0);
}

#[tokio::test]
async fn test_unknown_action_returns_valid_002() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/interactions")
        .json(&fixtures::interaction_body("u1", "prod-1", "wishlist"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(ctx.store.stored_count(), 0);
}

#[tokio::test]
async fn test_rating_out_of_range_returns_valid_003() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for rating in [0, 6, -1] {
        let response = server
            .post(&fixtures::track_path("prod-1", "purchase"))
            .json(&fixtures::purchase_body("u1", rating))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALID_003", "rating {} should be rejected", rating);
    }

    assert_eq!(ctx.store.stored_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_returns_valid_004() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&fixtures::track_path("prod-1", "cart"))
        .content_type("application/json")
        .bytes("{\"userId\": ".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_004");

    // Fractional rating is a type error, not a range error
    let response = server
        .post(&fixtures::track_path("prod-1", "purchase"))
        .json(&serde_json::json!({ "userId": "u1", "rating": 4.5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_004");
}

#[tokio::test]
async fn test_overlong_id_returns_valid_005() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&fixtures::track_path("prod-1", "view"))
        .json(&fixtures::track_body(&"u".repeat(129)))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_005");
}

#[tokio::test]
async fn test_unknown_product_returns_404() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&fixtures::track_path("no-such-product", "view"))
        .json(&fixtures::track_body("u1"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOTFOUND_001");
    assert_eq!(ctx.store.append_attempts(), 0);
    assert_eq!(ctx.catalog.lookups(), vec!["no-such-product".to_string()]);
}

#[tokio::test]
async fn test_newly_listed_product_is_accepted() {
    let ctx = TestContext::with_products(Vec::<String>::new());
    let server = ctx.server();

    server
        .post(&fixtures::track_path("late", "view"))
        .json(&fixtures::track_body("u1"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.catalog.add_product("late");

    server
        .post(&fixtures::track_path("late", "view"))
        .json(&fixtures::track_body("u1"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_store_failure_is_retryable() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.store.set_should_fail(true);
    let response = server
        .post(&fixtures::track_path("prod-1", "save"))
        .json(&fixtures::track_body("u1"))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_001");
    assert_eq!(ctx.store.stored_count(), 0);

    // Same request succeeds once the store recovers
    ctx.store.set_should_fail(false);
    server
        .post(&fixtures::track_path("prod-1", "save"))
        .json(&fixtures::track_body("u1"))
        .await
        .assert_status_ok();
    assert_eq!(ctx.store.stored_count(), 1);
}

#[tokio::test]
async fn test_catalog_outage_returns_503() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.catalog.set_unavailable(true);
    let response = server
        .post(&fixtures::track_path("prod-1", "view"))
        .json(&fixtures::track_body("u1"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_003");
    assert_eq!(ctx.store.append_attempts(), 0);
}
