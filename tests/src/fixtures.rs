//! Test fixtures and request bodies.

use uuid::Uuid;

/// Products the default test catalog knows about.
pub const KNOWN_PRODUCTS: [&str; 3] = ["prod-1", "prod-2", "prod-3"];

/// A user id no other test uses.
pub fn unique_user() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Body for the per-action endpoints.
pub fn track_body(user_id: &str) -> serde_json::Value {
    serde_json::json!({ "userId": user_id })
}

/// Body for the purchase endpoint with a rating.
pub fn purchase_body(user_id: &str, rating: i64) -> serde_json::Value {
    serde_json::json!({ "userId": user_id, "rating": rating })
}

/// Body for `POST /interactions`.
pub fn interaction_body(user_id: &str, product_id: &str, action: &str) -> serde_json::Value {
    serde_json::json!({
        "userId": user_id,
        "productId": product_id,
        "action": action
    })
}

/// Per-action tracking path.
pub fn track_path(product_id: &str, action: &str) -> String {
    format!("/product/{}/{}", product_id, action)
}
