//! Aggregate and listing endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use ledger_core::{AggregateEntry, InteractionEvent, InteractionSummary};
use std::time::Instant;
use telemetry::metrics;
use tracing::debug;

use crate::extractors::ListParams;
use crate::response::{ApiError, SummaryResponse};
use crate::state::AppState;

/// GET /interactions/users/:userId/products
pub async fn products_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    params: ListParams,
) -> Result<Json<Vec<AggregateEntry>>, ApiError> {
    let start = Instant::now();
    metrics().aggregate_queries.inc();

    let entries = state
        .ledger
        .aggregate_weight_by_product(&user_id, &params.to_query())
        .await?;

    observe(start, "products_for_user", entries.len());
    Ok(Json(entries))
}

/// GET /interactions/products/:productId/users
pub async fn users_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    params: ListParams,
) -> Result<Json<Vec<AggregateEntry>>, ApiError> {
    let start = Instant::now();
    metrics().aggregate_queries.inc();

    let entries = state
        .ledger
        .aggregate_weight_by_user(&product_id, &params.to_query())
        .await?;

    observe(start, "users_for_product", entries.len());
    Ok(Json(entries))
}

/// GET /interactions/users/:userId/events
///
/// Takes `limit` only; a `since` window is rejected.
pub async fn user_events(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    params: ListParams,
) -> Result<Json<Vec<InteractionEvent>>, ApiError> {
    if params.since.is_some() {
        metrics().validation_failures.inc();
        return Err(ApiError::invalid_query(
            "since is not supported when listing events, use limit",
        ));
    }

    let events = state.ledger.recent_events(&user_id, params.limit).await?;
    Ok(Json(events))
}

/// GET /interactions/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<InteractionSummary>, ApiError> {
    let start = Instant::now();
    metrics().aggregate_queries.inc();

    let summary = state.ledger.summary().await?;

    observe(start, "summary", summary.by_action.len());
    Ok(Json(summary))
}

/// GET /product/interactions/summary
///
/// Older path for the summary, wrapped as `{ success, summary }`.
pub async fn product_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(summary) = self::summary(State(state)).await?;
    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}

fn observe(start: Instant, query: &'static str, rows: usize) {
    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().aggregate_latency_ms.observe(latency_ms);
    debug!(query, rows, latency_ms, "Aggregate served");
}
