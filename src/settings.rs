//! Service configuration.
//!
//! Layered lowest to highest: struct defaults, `config/default.toml`,
//! `LEDGER__*` variables (`__` separates nesting, e.g.
//! `LEDGER__CLICKHOUSE__URL`), then flat `LEDGER_*` overrides for the
//! nested keys.

use anyhow::{bail, Context, Result};
use clickhouse_client::ClickHouseConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Clickhouse,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "clickhouse" => Ok(Self::Clickhouse),
            other => bail!("unknown storage backend '{}' (expected memory or clickhouse)", other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Product catalog base URL; empty or "mock" accepts every product
    pub catalog_url: String,
    pub storage: StorageConfig,
    pub clickhouse: ClickHouseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            catalog_url: String::new(),
            storage: StorageConfig::default(),
            clickhouse: ClickHouseConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut app: AppConfig = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::with_prefix("LEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app.apply_flat_overrides(|key| std::env::var(key).ok())?;
        Ok(app)
    }

    /// `LEDGER_CLICKHOUSE_URL` style variables; nested parsing in the
    /// config crate does not cope with underscored field names.
    fn apply_flat_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = var("LEDGER_STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(url) = var("LEDGER_CATALOG_URL") {
            self.catalog_url = url;
        }
        if let Some(url) = var("LEDGER_CLICKHOUSE_URL") {
            self.clickhouse.url = url;
        }
        if let Some(database) = var("LEDGER_CLICKHOUSE_DATABASE") {
            self.clickhouse.database = database;
        }
        if let Some(username) = var("LEDGER_CLICKHOUSE_USERNAME") {
            self.clickhouse.username = Some(username);
        }
        if let Some(password) = var("LEDGER_CLICKHOUSE_PASSWORD") {
            self.clickhouse.password = Some(password);
        }
        if let Some(secs) = var("LEDGER_CLICKHOUSE_TIMEOUT_SECS") {
            self.clickhouse.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("invalid LEDGER_CLICKHOUSE_TIMEOUT_SECS '{}'", secs))?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
