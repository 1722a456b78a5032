//! ClickHouse table schemas.
//!
//! One append-only table holds every interaction:
//! - ORDER BY (user_id, product_id, timestamp) serves per-user aggregation
//! - bloom filter skip index on product_id serves per-product aggregation
//! - DateTime64(6) keeps the ledger's microsecond timestamps intact
//! - weight is stored, never recomputed on read

/// Interactions table name, relative to the configured database.
pub const INTERACTIONS_TABLE: &str = "interactions";

/// SQL for creating the ledger database.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", database)
}

/// SQL for creating the interactions table.
pub fn create_interactions_table(database: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {database}.{INTERACTIONS_TABLE} (
    event_id String,
    user_id String,
    product_id String,
    action LowCardinality(String),
    rating Nullable(UInt8),
    weight UInt32,
    timestamp DateTime64(6, 'UTC'),

    created_at DateTime DEFAULT now(),

    INDEX idx_product product_id TYPE bloom_filter(0.01) GRANULARITY 4
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (user_id, product_id, timestamp, event_id)
SETTINGS index_granularity = 8192
"#
    )
}

/// All DDL statements, in execution order.
pub fn all_tables(database: &str) -> Vec<String> {
    vec![create_database(database), create_interactions_table(database)]
}
