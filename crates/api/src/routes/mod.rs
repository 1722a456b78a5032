//! API routes.

pub mod aggregates;
pub mod health;
pub mod interactions;
pub mod metrics;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/product/:product_id/view", post(interactions::track_view))
        .route("/product/:product_id/cart", post(interactions::track_cart))
        .route("/product/:product_id/save", post(interactions::track_save))
        .route("/product/:product_id/purchase", post(interactions::track_purchase))
        .route("/product/interactions/summary", get(aggregates::product_summary))
        .route("/interactions", post(interactions::track_interaction))
        .route("/interactions/summary", get(aggregates::summary))
        .route(
            "/interactions/users/:user_id/products",
            get(aggregates::products_for_user),
        )
        .route(
            "/interactions/users/:user_id/events",
            get(aggregates::user_events),
        )
        .route(
            "/interactions/products/:product_id/users",
            get(aggregates::users_for_product),
        )
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
