//! Read-side queries: aggregation, listings, summary.

use crate::client::ClickHouseClient;
use crate::insert::InteractionRow;
use crate::schema::INTERACTIONS_TABLE;
use clickhouse::Row;
use ledger_core::{
    clock::micros_to_datetime, ActionSummary, AggregateEntry, AggregateQuery, DbErrorCode,
    InteractionAction, InteractionEvent, InteractionSummary, Result,
};
use serde::Deserialize;
use tracing::warn;

/// Column an aggregation filters on and the column it groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Filter by user_id, one entry per product
    ProductsForUser,
    /// Filter by product_id, one entry per user
    UsersForProduct,
}

impl Grouping {
    fn columns(&self) -> (&'static str, &'static str) {
        match self {
            Self::ProductsForUser => ("user_id", "product_id"),
            Self::UsersForProduct => ("product_id", "user_id"),
        }
    }
}

/// One grouped aggregate row.
#[derive(Debug, Clone, Row, Deserialize)]
pub struct AggregateRow {
    pub group_key: String,
    pub total_weight: u64,
    pub interactions: u64,
    pub last_interaction: i64,
}

impl From<AggregateRow> for AggregateEntry {
    fn from(row: AggregateRow) -> Self {
        Self {
            key: row.group_key,
            total_weight: row.total_weight,
            interactions: row.interactions,
            last_interaction: micros_to_datetime(row.last_interaction),
        }
    }
}

/// Builds the aggregation SQL. Ordering matches `ledger_core::rank_order`.
pub fn aggregate_sql(grouping: Grouping, with_since: bool, with_limit: bool) -> String {
    let (filter_col, group_col) = grouping.columns();
    let since = if with_since {
        " AND timestamp >= fromUnixTimestamp64Micro(?)"
    } else {
        ""
    };
    let limit = if with_limit { " LIMIT ?" } else { "" };
    format!(
        "SELECT {group_col} AS group_key, sum(weight) AS total_weight, count() AS interactions, \
         max(timestamp) AS last_interaction \
         FROM {INTERACTIONS_TABLE} WHERE {filter_col} = ?{since} \
         GROUP BY group_key \
         ORDER BY total_weight DESC, last_interaction DESC, group_key ASC{limit}"
    )
}

/// Summed weight per group for one user or product.
pub async fn aggregate_weights(
    client: &ClickHouseClient,
    grouping: Grouping,
    id: &str,
    query: &AggregateQuery,
) -> Result<Vec<AggregateEntry>> {
    let limit = query.effective_limit();
    let sql = aggregate_sql(grouping, query.since.is_some(), limit.is_some());
    let mut q = client.inner().query(&sql).bind(id);
    if let Some(since) = query.since {
        q = q.bind(since.timestamp_micros());
    }
    if let Some(limit) = limit {
        q = q.bind(limit as u64);
    }

    let rows: Vec<AggregateRow> = client
        .run(DbErrorCode::QueryFailed, "aggregate query", q.fetch_all())
        .await?;

    Ok(rows.into_iter().map(AggregateEntry::from).collect())
}

/// A user's most recent events.
pub async fn recent_events(
    client: &ClickHouseClient,
    user_id: &str,
    limit: usize,
) -> Result<Vec<InteractionEvent>> {
    let sql = format!(
        "SELECT event_id, user_id, product_id, action, rating, weight, timestamp \
         FROM {INTERACTIONS_TABLE} WHERE user_id = ? \
         ORDER BY timestamp DESC, event_id DESC LIMIT ?"
    );
    let q = client.inner().query(&sql).bind(user_id).bind(limit as u64);
    let rows: Vec<InteractionRow> = client
        .run(DbErrorCode::QueryFailed, "recent events query", q.fetch_all())
        .await?;

    rows.into_iter().map(InteractionEvent::try_from).collect()
}

#[derive(Debug, Clone, Row, Deserialize)]
struct TotalsRow {
    total: u64,
    users: u64,
    products: u64,
}

#[derive(Debug, Clone, Row, Deserialize)]
struct ActionRow {
    action: String,
    count: u64,
    avg_weight: f64,
}

/// Whole-ledger counts and per-action breakdown.
pub async fn summary(client: &ClickHouseClient) -> Result<InteractionSummary> {
    let totals_sql = format!(
        "SELECT count() AS total, uniqExact(user_id) AS users, uniqExact(product_id) AS products \
         FROM {INTERACTIONS_TABLE}"
    );
    let totals: TotalsRow = client
        .run(
            DbErrorCode::QueryFailed,
            "summary totals query",
            client.inner().query(&totals_sql).fetch_one(),
        )
        .await?;

    let by_action_sql = format!(
        "SELECT action, count() AS count, avg(weight) AS avg_weight \
         FROM {INTERACTIONS_TABLE} GROUP BY action ORDER BY count DESC, action ASC"
    );
    let rows: Vec<ActionRow> = client
        .run(
            DbErrorCode::QueryFailed,
            "summary by action query",
            client.inner().query(&by_action_sql).fetch_all(),
        )
        .await?;

    let by_action = rows
        .into_iter()
        .filter_map(|row| match InteractionAction::from_label(&row.action) {
            Some(action) => Some(ActionSummary {
                action,
                count: row.count,
                avg_weight: row.avg_weight,
            }),
            None => {
                warn!(action = %row.action, "Skipping unknown action in summary");
                None
            }
        })
        .collect();

    Ok(InteractionSummary {
        total_interactions: totals.total,
        unique_users: totals.users,
        unique_products: totals.products,
        by_action,
    })
}

/// Count all interactions (for testing).
pub async fn count_interactions(client: &ClickHouseClient) -> Result<u64> {
    let sql = format!("SELECT count() FROM {INTERACTIONS_TABLE}");
    client
        .run(
            DbErrorCode::QueryFailed,
            "count query",
            client.inner().query(&sql).fetch_one::<u64>(),
        )
        .await
}

/// Truncate the interactions table (test cleanup).
pub async fn truncate_interactions(client: &ClickHouseClient) -> Result<()> {
    let sql = format!("TRUNCATE TABLE IF EXISTS {INTERACTIONS_TABLE}");
    client
        .run(
            DbErrorCode::QueryFailed,
            "truncate",
            client.inner().query(&sql).execute(),
        )
        .await
}
