//! End-to-end tests for interaction tracking.
//!
//! POST /product/:productId/{action} and POST /interactions through the real
//! router and ledger, with storage in the mock store.

use integration_tests::{fixtures, setup::TestContext};
use ledger_core::{InteractionAction, InteractionLedger, InteractionReport, MemoryStore, StaticCatalog};
use std::sync::Arc;

#[tokio::test]
async fn test_view_cart_purchase_scores_sixteen() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = fixtures::unique_user();

    let view = server
        .post(&fixtures::track_path("prod-1", "view"))
        .json(&fixtures::track_body(&user))
        .await;
    view.assert_status_ok();
    let body: serde_json::Value = view.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product view tracked");
    assert_eq!(body["interaction"]["weight"], 1);

    server
        .post(&fixtures::track_path("prod-1", "cart"))
        .json(&fixtures::track_body(&user))
        .await
        .assert_status_ok();

    let purchase = server
        .post(&fixtures::track_path("prod-1", "purchase"))
        .json(&fixtures::purchase_body(&user, 4))
        .await;
    purchase.assert_status_ok();
    let body: serde_json::Value = purchase.json();
    assert_eq!(body["message"], "Purchase interaction tracked");
    assert_eq!(body["interaction"]["weight"], 13);
    assert_eq!(body["interaction"]["rating"], 4);

    let aggregate = server
        .get(&format!("/interactions/users/{}/products", user))
        .await;
    aggregate.assert_status_ok();
    let entries: serde_json::Value = aggregate.json();
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["key"], "prod-1");
    assert_eq!(entries[0]["totalWeight"], 16);
    assert_eq!(entries[0]["interactions"], 3);

    assert_eq!(ctx.store.stored_count(), 3);
}

#[tokio::test]
async fn test_response_carries_full_event() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = fixtures::unique_user();

    let response = server
        .post(&fixtures::track_path("prod-2", "save"))
        .json(&fixtures::track_body(&user))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let event = &body["interaction"];
    assert!(event["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(event["userId"], user.as_str());
    assert_eq!(event["productId"], "prod-2");
    assert_eq!(event["action"], "save");
    assert_eq!(event["weight"], 3);
    assert!(event["rating"].is_null());
    assert!(event["timestamp"].as_str().is_some());

    let stored = ctx.store.stored_events();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.to_string(), event["id"].as_str().unwrap_or_default());
}

#[tokio::test]
async fn test_generic_ingestion_accepts_any_action() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = fixtures::unique_user();

    for (action, weight) in [("view", 1), ("cart", 2), ("save", 3), ("purchase", 5)] {
        let response = server
            .post("/interactions")
            .json(&fixtures::interaction_body(&user, "prod-3", action))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["interaction"]["action"], action);
        assert_eq!(body["interaction"]["weight"], weight);
    }

    let entries: serde_json::Value = server
        .get("/interactions/products/prod-3/users")
        .await
        .json();
    assert_eq!(entries[0]["key"], user.as_str());
    assert_eq!(entries[0]["totalWeight"], 11);
}

#[tokio::test]
async fn test_rating_on_view_is_ignored() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = fixtures::unique_user();

    let response = server
        .post(&fixtures::track_path("prod-1", "view"))
        .json(&serde_json::json!({ "userId": user, "rating": 5 }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["interaction"]["weight"], 1);
    assert!(body["interaction"]["rating"].is_null());
}

#[tokio::test]
async fn test_duplicate_reports_are_separate_events() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = fixtures::unique_user();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let body: serde_json::Value = server
            .post(&fixtures::track_path("prod-1", "view"))
            .json(&fixtures::track_body(&user))
            .await
            .json();
        ids.push(body["interaction"]["id"].as_str().unwrap_or_default().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let stored = ctx.store.stored_events();
    assert_eq!(stored.len(), 3);
    assert!(stored.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

    let entries: serde_json::Value = server
        .get(&format!("/interactions/users/{}/products", user))
        .await
        .json();
    assert_eq!(entries[0]["totalWeight"], 3);
}

#[tokio::test]
async fn test_concurrent_writes_are_all_counted() {
    let store = MemoryStore::new();
    let ledger = Arc::new(InteractionLedger::new(
        Arc::new(store.clone()),
        Arc::new(StaticCatalog::new(["p"])),
    ));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let ledger = ledger.clone();
            let action = InteractionAction::ALL[i % InteractionAction::ALL.len()];
            tokio::spawn(async move {
                ledger
                    .record_interaction(&InteractionReport::new("u", "p", action))
                    .await
            })
        })
        .collect();

    let mut expected = 0u64;
    for handle in handles {
        let event = handle.await.expect("task panicked").expect("record failed");
        expected += u64::from(event.weight);
    }

    let events = store.snapshot();
    assert_eq!(events.len(), 50);
    let mut stamps: Vec<_> = events.iter().map(|e| e.timestamp).collect();
    stamps.sort();
    stamps.dedup();
    assert_eq!(stamps.len(), 50, "timestamps must be unique");

    let entries = ledger
        .aggregate_weight_by_product("u", &Default::default())
        .await
        .expect("aggregate failed");
    assert_eq!(entries[0].total_weight, expected);
}
