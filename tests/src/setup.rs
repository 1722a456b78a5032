//! Common test setup functions.

use api::{router, state::AppState};
use axum::Router;
use axum_test::TestServer;
use clickhouse_client::{
    health::init_schema, truncate_interactions, ClickHouseClient, ClickHouseConfig,
    ClickHouseStore,
};
use std::sync::Arc;

use crate::containers::ClickHouseServer;
use crate::fixtures::KNOWN_PRODUCTS;
use crate::mocks::{MockCatalog, MockStore};

/// Test context around the real router with mock collaborators.
///
/// The router, ledger, validation, and weight rule are the production code;
/// only storage and the catalog are swapped for controllable mocks.
pub struct TestContext {
    pub store: MockStore,
    pub catalog: MockCatalog,
    pub router: Router,
}

impl TestContext {
    /// Context whose catalog knows `fixtures::KNOWN_PRODUCTS`.
    pub fn new() -> Self {
        Self::with_products(KNOWN_PRODUCTS)
    }

    pub fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = MockStore::new();
        let catalog = MockCatalog::with_products(products);
        let state = AppState::new(Arc::new(store.clone()), Arc::new(catalog.clone()));
        telemetry::health().catalog.set_healthy();

        Self {
            store,
            catalog,
            router: router(state),
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context backed by a real ClickHouse testcontainer.
pub struct ClickHouseContext {
    pub clickhouse: ClickHouseServer,
    pub client: ClickHouseClient,
    pub store: ClickHouseStore,
    pub catalog: MockCatalog,
    pub router: Router,
}

impl ClickHouseContext {
    pub async fn new() -> Self {
        let clickhouse = ClickHouseServer::start().await;

        let config = ClickHouseConfig::new(&clickhouse.url)
            .with_database(&clickhouse.database)
            .with_credentials(clickhouse.username.clone(), clickhouse.password.clone())
            .with_timeout_secs(30);
        let client = ClickHouseClient::new(config).expect("Failed to create ClickHouse client");

        init_schema(&client)
            .await
            .expect("Failed to initialize schema");
        truncate_interactions(&client)
            .await
            .expect("Failed to truncate interactions");

        let store = ClickHouseStore::new(client.clone());
        let catalog = MockCatalog::with_products(KNOWN_PRODUCTS);
        let state = AppState::new(Arc::new(store.clone()), Arc::new(catalog.clone()));

        Self {
            clickhouse,
            client,
            store,
            catalog,
            router: router(state),
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}
