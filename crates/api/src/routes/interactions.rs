//! Interaction tracking endpoints.
//!
//! Per-action routes take the product from the path:
//! `POST /product/:productId/{view,cart,save,purchase}` with `{ userId, rating? }`.
//! `POST /interactions` takes the whole report in the body.

use axum::{
    extract::{Path, State},
    Json,
};
use ledger_core::{Error, InteractionAction, InteractionReport};
use serde::Deserialize;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, info};

use crate::extractors::JsonBody;
use crate::response::{ApiError, TrackResponse};
use crate::state::AppState;

/// Body of the per-action endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBody {
    #[serde(default)]
    pub user_id: String,
    pub rating: Option<i64>,
}

/// POST /product/:productId/view
pub async fn track_view(
    state: State<AppState>,
    path: Path<String>,
    body: JsonBody<TrackBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    track_action(state, path, InteractionAction::View, body).await
}

/// POST /product/:productId/cart
pub async fn track_cart(
    state: State<AppState>,
    path: Path<String>,
    body: JsonBody<TrackBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    track_action(state, path, InteractionAction::Cart, body).await
}

/// POST /product/:productId/save
pub async fn track_save(
    state: State<AppState>,
    path: Path<String>,
    body: JsonBody<TrackBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    track_action(state, path, InteractionAction::Save, body).await
}

/// POST /product/:productId/purchase
pub async fn track_purchase(
    state: State<AppState>,
    path: Path<String>,
    body: JsonBody<TrackBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    track_action(state, path, InteractionAction::Purchase, body).await
}

async fn track_action(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    action: InteractionAction,
    JsonBody(body): JsonBody<TrackBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    let report = InteractionReport {
        user_id: body.user_id,
        product_id,
        action: action.as_str().to_string(),
        rating: body.rating,
    };
    record(&state, report).await
}

/// POST /interactions - generic ingestion with the action in the body.
pub async fn track_interaction(
    State(state): State<AppState>,
    JsonBody(report): JsonBody<InteractionReport>,
) -> Result<Json<TrackResponse>, ApiError> {
    record(&state, report).await
}

async fn record(state: &AppState, report: InteractionReport) -> Result<Json<TrackResponse>, ApiError> {
    let start = Instant::now();
    metrics().interactions_received.inc();

    let event = state
        .ledger
        .record_interaction(&report)
        .await
        .map_err(|e| {
            count_rejection(&e);
            debug!(
                user_id = %report.user_id,
                product_id = %report.product_id,
                action = %report.action,
                error = %e,
                "Interaction rejected"
            );
            ApiError::from(e)
        })?;

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().record_latency_ms.observe(latency_ms);
    metrics().record_action(event.action.as_str(), event.weight);

    info!(
        user_id = %event.user_id,
        product_id = %event.product_id,
        action = %event.action,
        weight = event.weight,
        latency_ms = latency_ms,
        "Interaction recorded"
    );

    Ok(Json(TrackResponse::recorded(event)))
}

fn count_rejection(err: &Error) {
    if err.is_validation() {
        metrics().validation_failures.inc();
    } else if err.is_not_found() {
        metrics().unknown_products.inc();
    } else if err.is_retryable() {
        metrics().persistence_errors.inc();
    }
}
