//! Application state shared across handlers.

use ledger_core::{InteractionLedger, InteractionStore, ProductCatalog};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Validation, scoring, and storage for interactions
    pub ledger: Arc<InteractionLedger>,
}

impl AppState {
    pub fn new(store: Arc<dyn InteractionStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            ledger: Arc::new(InteractionLedger::new(store, catalog)),
        }
    }

    /// Probes the store and records the result in the health registry.
    pub async fn refresh_store_health(&self) -> bool {
        let store = self.ledger.store();
        let ok = store.ping().await;
        telemetry::health()
            .store
            .record_probe(ok, format!("{} store unreachable", store.backend()));
        ok
    }
}
