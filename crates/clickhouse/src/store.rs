//! `InteractionStore` backed by ClickHouse.

use async_trait::async_trait;
use std::time::Instant;

use ledger_core::{
    AggregateEntry, AggregateQuery, InteractionEvent, InteractionStore, InteractionSummary, Result,
};
use telemetry::metrics;

use crate::client::ClickHouseClient;
use crate::health::check_connection;
use crate::insert::insert_interaction;
use crate::query::{self, Grouping};

#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
}

impl ClickHouseStore {
    pub fn new(client: ClickHouseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }

    async fn aggregate(
        &self,
        grouping: Grouping,
        id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        let start = Instant::now();
        let result = query::aggregate_weights(&self.client, grouping, id, query).await;
        metrics()
            .store_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        result
    }
}

#[async_trait]
impl InteractionStore for ClickHouseStore {
    async fn append(&self, event: &InteractionEvent) -> Result<()> {
        insert_interaction(&self.client, event).await
    }

    async fn aggregate_by_product(
        &self,
        user_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        self.aggregate(Grouping::ProductsForUser, user_id, query).await
    }

    async fn aggregate_by_user(
        &self,
        product_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        self.aggregate(Grouping::UsersForProduct, product_id, query).await
    }

    async fn recent_events(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionEvent>> {
        query::recent_events(&self.client, user_id, limit).await
    }

    async fn summary(&self) -> Result<InteractionSummary> {
        query::summary(&self.client).await
    }

    async fn ping(&self) -> bool {
        check_connection(&self.client).await
    }

    fn backend(&self) -> &'static str {
        "clickhouse"
    }
}
