//! Product catalog lookups used to validate references.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::Result;

/// Answers whether a product exists.
///
/// `Ok(false)` means the catalog is reachable and the product is unknown;
/// transport failures are errors.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_exists(&self, product_id: &str) -> Result<bool>;
}

/// Fixed set of known products.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: HashSet<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, product_id: impl Into<String>) {
        self.products.insert(product_id.into());
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn product_exists(&self, product_id: &str) -> Result<bool> {
        Ok(self.products.contains(product_id))
    }
}
