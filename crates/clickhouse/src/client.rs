//! ClickHouse client wrapper.

use crate::config::ClickHouseConfig;
use clickhouse::Client;
use ledger_core::{DbErrorCode, Error, Result};
use std::future::Future;
use tracing::info;

/// ClickHouse client bound to the ledger database.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Creates a new ClickHouse client.
    pub fn new(config: ClickHouseConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::persistence(
                DbErrorCode::Unavailable,
                "ClickHouse URL is not configured",
            ));
        }

        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(ref user) = config.username {
            client = client.with_user(user);
        }

        if let Some(ref pass) = config.password {
            client = client.with_password(pass);
        }

        info!(
            url = %config.url,
            database = %config.database,
            "Created ClickHouse client"
        );

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    /// Runs a ClickHouse call under the configured timeout, mapping failures
    /// to persistence errors with the given code.
    pub async fn run<T, F>(&self, code: DbErrorCode, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, clickhouse::error::Error>>,
    {
        match tokio::time::timeout(self.config.timeout(), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_error(code, what, e)),
            Err(_) => Err(Error::persistence(
                DbErrorCode::Unavailable,
                format!("{} timed out after {}s", what, self.config.timeout().as_secs()),
            )),
        }
    }
}

/// Network failures mean the store is unreachable; anything else keeps
/// the caller's code.
pub fn map_error(code: DbErrorCode, what: &str, err: clickhouse::error::Error) -> Error {
    let code = match &err {
        clickhouse::error::Error::Network(_) => DbErrorCode::Unavailable,
        _ => code,
    };
    Error::persistence(code, format!("{}: {}", what, err))
}
