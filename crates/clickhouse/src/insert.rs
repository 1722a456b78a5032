//! Append path for ClickHouse.

use crate::client::ClickHouseClient;
use crate::schema::INTERACTIONS_TABLE;
use clickhouse::Row;
use ledger_core::{
    clock::micros_to_datetime, DbErrorCode, Error, InteractionAction, InteractionEvent, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use telemetry::metrics;
use tracing::debug;
use uuid::Uuid;

/// Flattened interaction row.
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize, Deserialize)]
pub struct InteractionRow {
    pub event_id: String,
    pub user_id: String,
    pub product_id: String,
    pub action: String,
    pub rating: Option<u8>,
    pub weight: u32,
    pub timestamp: i64, // DateTime64(6) as microseconds
}

impl From<&InteractionEvent> for InteractionRow {
    fn from(event: &InteractionEvent) -> Self {
        Self {
            event_id: event.id.to_string(),
            user_id: event.user_id.clone(),
            product_id: event.product_id.clone(),
            action: event.action.as_str().to_string(),
            rating: event.rating,
            weight: event.weight,
            timestamp: event.timestamp.timestamp_micros(),
        }
    }
}

impl TryFrom<InteractionRow> for InteractionEvent {
    type Error = Error;

    fn try_from(row: InteractionRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.event_id).map_err(|e| {
            Error::persistence(
                DbErrorCode::QueryFailed,
                format!("corrupt event_id {}: {}", row.event_id, e),
            )
        })?;
        let action = InteractionAction::from_label(&row.action).ok_or_else(|| {
            Error::persistence(
                DbErrorCode::QueryFailed,
                format!("corrupt action '{}' on event {}", row.action, row.event_id),
            )
        })?;

        Ok(InteractionEvent {
            id,
            user_id: row.user_id,
            product_id: row.product_id,
            action,
            rating: row.rating,
            weight: row.weight,
            timestamp: micros_to_datetime(row.timestamp),
        })
    }
}

/// Appends one interaction.
///
/// `end()` waits for the server to acknowledge the insert, so the row is
/// visible to queries issued after this returns.
pub async fn insert_interaction(client: &ClickHouseClient, event: &InteractionEvent) -> Result<()> {
    let start = Instant::now();
    let row = InteractionRow::from(event);

    let result = client
        .run(DbErrorCode::AppendFailed, "insert interaction", async {
            let mut insert = client.inner().insert(INTERACTIONS_TABLE)?;
            insert.write(&row).await?;
            insert.end().await
        })
        .await;

    let elapsed = start.elapsed();
    metrics().store_latency_ms.observe(elapsed.as_millis() as u64);

    result?;

    debug!(
        event_id = %row.event_id,
        latency_ms = %elapsed.as_millis(),
        "Inserted interaction to ClickHouse"
    );

    Ok(())
}
