//! Mock collaborators for testing.

use async_trait::async_trait;
use ledger_core::{
    AggregateEntry, AggregateQuery, DbErrorCode, Error, InteractionEvent, InteractionStore,
    InteractionSummary, MemoryStore, ProductCatalog, Result,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory store that can be switched into failure mode.
///
/// Implements the same `InteractionStore` trait as the ClickHouse store, so
/// the router and ledger run their production code paths against it.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: MemoryStore,
    should_fail: Arc<AtomicBool>,
    unreachable: Arc<AtomicBool>,
    appends: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every append and query fail with a persistence error.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Make health probes fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Events actually stored.
    pub fn stored_events(&self) -> Vec<InteractionEvent> {
        self.inner.snapshot()
    }

    pub fn stored_count(&self) -> usize {
        self.inner.len()
    }

    /// Append attempts, including failed ones.
    pub fn append_attempts(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    fn check(&self, code: DbErrorCode) -> Result<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(Error::persistence(code, "mock store failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl InteractionStore for MockStore {
    async fn append(&self, event: &InteractionEvent) -> Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.check(DbErrorCode::AppendFailed)?;
        self.inner.append(event).await
    }

    async fn aggregate_by_product(
        &self,
        user_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        self.check(DbErrorCode::QueryFailed)?;
        self.inner.aggregate_by_product(user_id, query).await
    }

    async fn aggregate_by_user(
        &self,
        product_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        self.check(DbErrorCode::QueryFailed)?;
        self.inner.aggregate_by_user(product_id, query).await
    }

    async fn recent_events(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionEvent>> {
        self.check(DbErrorCode::QueryFailed)?;
        self.inner.recent_events(user_id, limit).await
    }

    async fn summary(&self) -> Result<InteractionSummary> {
        self.check(DbErrorCode::QueryFailed)?;
        self.inner.summary().await
    }

    async fn ping(&self) -> bool {
        !self.unreachable.load(Ordering::SeqCst)
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

/// Catalog with a mutable product set and a switchable outage.
#[derive(Clone, Default)]
pub struct MockCatalog {
    products: Arc<RwLock<HashSet<String>>>,
    unavailable: Arc<AtomicBool>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    pub fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = Self::default();
        catalog
            .products
            .write()
            .extend(products.into_iter().map(Into::into));
        catalog
    }

    pub fn add_product(&self, product_id: impl Into<String>) {
        self.products.write().insert(product_id.into());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Product ids looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
    async fn product_exists(&self, product_id: &str) -> Result<bool> {
        self.lookups.lock().push(product_id.to_string());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::persistence(
                DbErrorCode::Unavailable,
                "mock catalog unavailable",
            ));
        }
        Ok(self.products.read().contains(product_id))
    }
}
