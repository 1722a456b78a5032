//! Ledger storage abstraction.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::aggregate::{fold_weights, summarize, AggregateEntry, AggregateQuery, InteractionSummary};
use crate::error::Result;
use crate::events::InteractionEvent;
use crate::limits::clamp_limit;

/// Append-only interaction log with aggregate reads.
///
/// Implementations must make an appended event visible to every read that
/// starts after `append` returns.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Appends one fully-formed event. Never updates an existing record.
    async fn append(&self, event: &InteractionEvent) -> Result<()>;

    /// Summed weight per product for one user, ranked.
    async fn aggregate_by_product(
        &self,
        user_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>>;

    /// Summed weight per user for one product, ranked.
    async fn aggregate_by_user(
        &self,
        product_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>>;

    /// A user's most recent events, newest first.
    async fn recent_events(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionEvent>>;

    /// Whole-ledger counts.
    async fn summary(&self) -> Result<InteractionSummary>;

    /// Cheap reachability check.
    async fn ping(&self) -> bool;

    /// Backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// In-process store for development and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    events: Arc<RwLock<Vec<InteractionEvent>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Copy of every stored event, in append order.
    pub fn snapshot(&self) -> Vec<InteractionEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn append(&self, event: &InteractionEvent) -> Result<()> {
        self.events.write().push(event.clone());
        Ok(())
    }

    async fn aggregate_by_product(
        &self,
        user_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        let events = self.events.read();
        Ok(fold_weights(
            events.iter().filter(|e| e.user_id == user_id),
            query,
            |e| e.product_id.as_str(),
        ))
    }

    async fn aggregate_by_user(
        &self,
        product_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        let events = self.events.read();
        Ok(fold_weights(
            events.iter().filter(|e| e.product_id == product_id),
            query,
            |e| e.user_id.as_str(),
        ))
    }

    async fn recent_events(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionEvent>> {
        let events = self.events.read();
        let mut recent: Vec<InteractionEvent> = events
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(clamp_limit(Some(limit)));
        Ok(recent)
    }

    async fn summary(&self) -> Result<InteractionSummary> {
        Ok(summarize(self.events.read().iter()))
    }

    async fn ping(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
