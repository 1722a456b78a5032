//! Interaction Ledger
//!
//! Records buyer/product interactions as weighted, append-only events and
//! serves the aggregate signals recommendation models train on:
//! - per-action tracking endpoints and generic ingestion
//! - weight aggregation per user and per product
//! - in-memory or ClickHouse storage

mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState, CatalogClient};
use clickhouse_client::{ClickHouseClient, ClickHouseStore};
use ledger_core::{InteractionStore, MemoryStore};
use telemetry::{health, init_tracing_from_env, metrics};

use crate::settings::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Interaction Ledger v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;

    let store = build_store(&config).await?;
    info!(backend = store.backend(), "Interaction store ready");

    let catalog =
        CatalogClient::new(&config.catalog_url).context("Failed to create catalog client")?;
    if catalog.is_mock() {
        warn!("Catalog URL not configured, accepting every product");
    }

    let state = AppState::new(store, Arc::new(catalog));
    check_health(&state).await;

    let app = router(state);

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let snapshot = metrics().snapshot();
    info!(
        received = snapshot.interactions_received,
        recorded = snapshot.interactions_recorded,
        validation_failures = snapshot.validation_failures,
        persistence_errors = snapshot.persistence_errors,
        "Shutdown complete"
    );
    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn InteractionStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Clickhouse => {
            let client = ClickHouseClient::new(config.clickhouse.clone())
                .context("Failed to create ClickHouse client")?;

            if let Err(e) = clickhouse_client::health::init_schema(&client).await {
                // Schema may already exist; readiness reports the real state.
                error!(error = %e, "Failed to initialize ClickHouse schema");
            }

            Ok(Arc::new(ClickHouseStore::new(client)))
        }
    }
}

/// Check component health on startup.
async fn check_health(state: &AppState) {
    if state.refresh_store_health().await {
        info!("Store connection: healthy");
    } else {
        error!("Store connection: unhealthy");
    }

    if health().catalog.is_healthy() {
        info!("Catalog: healthy");
    } else {
        // Remote catalogs are marked healthy on their first successful lookup.
        warn!("Catalog: not yet probed");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
