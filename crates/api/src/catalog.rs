//! Product catalog client.
//!
//! Calls the catalog service's `GET /product/{id}` endpoint. Known products
//! are cached for 60 seconds; misses are never cached so newly listed
//! products become trackable immediately.

use async_trait::async_trait;
use ledger_core::{DbErrorCode, Error, ProductCatalog, Result};
use moka::future::Cache;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use telemetry::{health, metrics};
use tracing::{debug, warn};

/// Cache TTL for known products (60 seconds).
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum cache entries.
const CATALOG_CACHE_MAX_CAPACITY: u64 = 50_000;

/// Per-request timeout for catalog calls.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CatalogClient {
    /// Catalog service URL (e.g., "http://catalog:8080")
    base_url: Option<Url>,
    http_client: reqwest::Client,
    /// Product ids confirmed to exist
    cache: Cache<String, ()>,
    /// Every product exists (development and tests)
    mock_mode: bool,
}

impl CatalogClient {
    /// Creates a catalog client. An empty URL or `"mock"` enables mock mode.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref().trim();
        let mock_mode = raw.is_empty() || raw == "mock";

        let base_url = if mock_mode {
            None
        } else {
            Some(Url::parse(raw).map_err(|e| {
                Error::persistence(
                    DbErrorCode::Unavailable,
                    format!("invalid catalog URL {}: {}", raw, e),
                )
            })?)
        };

        let http_client = reqwest::Client::builder()
            .timeout(CATALOG_TIMEOUT)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        if mock_mode {
            health().catalog.set_healthy();
        }

        Ok(Self {
            base_url,
            http_client,
            cache: Cache::builder()
                .max_capacity(CATALOG_CACHE_MAX_CAPACITY)
                .time_to_live(CATALOG_CACHE_TTL)
                .build(),
            mock_mode,
        })
    }

    pub fn is_mock(&self) -> bool {
        self.mock_mode
    }

    fn product_url(&self, base: &Url, product_id: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::persistence(
                    DbErrorCode::Unavailable,
                    format!("catalog URL {} cannot carry a path", base),
                )
            })?
            .pop_if_empty()
            .push("product")
            .push(product_id);
        Ok(url)
    }

    async fn remote_exists(&self, base: &Url, product_id: &str) -> Result<bool> {
        let url = self.product_url(base, product_id)?;
        debug!(url = %url, "Calling catalog service");

        let response = self.http_client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Catalog request failed");
            health().catalog.set_unhealthy(e.to_string());
            Error::persistence(
                DbErrorCode::Unavailable,
                format!("catalog service unavailable: {}", e),
            )
        })?;

        let status = response.status();
        if status.is_success() {
            health().catalog.set_healthy();
            return Ok(true);
        }
        if status == StatusCode::NOT_FOUND {
            health().catalog.set_healthy();
            return Ok(false);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Catalog service returned error");
        health()
            .catalog
            .set_unhealthy(format!("catalog returned {}", status));
        Err(Error::persistence(
            DbErrorCode::Unavailable,
            format!("catalog service returned {}", status),
        ))
    }
}

#[async_trait]
impl ProductCatalog for CatalogClient {
    async fn product_exists(&self, product_id: &str) -> Result<bool> {
        metrics().catalog_lookups.inc();

        let base = match (&self.base_url, self.mock_mode) {
            (Some(base), false) => base,
            _ => return Ok(true),
        };

        if self.cache.get(product_id).await.is_some() {
            metrics().catalog_cache_hits.inc();
            return Ok(true);
        }

        let exists = self.remote_exists(base, product_id).await?;
        if exists {
            self.cache.insert(product_id.to_string(), ()).await;
        }
        Ok(exists)
    }
}
