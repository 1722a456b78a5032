//! ClickHouse health checks and schema bootstrap.

use crate::client::ClickHouseClient;
use crate::schema::all_tables;
use ledger_core::{DbErrorCode, Result};
use tracing::{debug, error, info};

/// Check ClickHouse connection health.
pub async fn check_connection(client: &ClickHouseClient) -> bool {
    let probe = client.run(
        DbErrorCode::Unavailable,
        "health probe",
        client.inner().query("SELECT 1").fetch_one::<u8>(),
    );
    match probe.await {
        Ok(_) => {
            debug!("ClickHouse connection healthy");
            true
        }
        Err(e) => {
            error!(error = %e, "ClickHouse health check failed");
            false
        }
    }
}

/// Creates the ledger database and tables if they do not exist.
///
/// DDL is run without a default database so `CREATE DATABASE` works
/// against a fresh server.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    let database = &client.config().database;
    let bootstrap = client.inner().clone().with_database("default");

    for ddl in all_tables(database) {
        client
            .run(
                DbErrorCode::Unavailable,
                "schema bootstrap",
                bootstrap.query(&ddl).execute(),
            )
            .await?;
    }

    info!(database = %database, "ClickHouse schema initialized");
    Ok(())
}
