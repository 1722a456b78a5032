//! In-process metrics for the interaction ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic event counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Upper bounds (inclusive) of the latency buckets, in milliseconds.
pub const LATENCY_BOUNDS_MS: [u64; 10] = [1, 5, 10, 25, 50, 100, 250, 500, 1_000, 5_000];

/// Latency distribution with one overflow bucket past the last bound.
#[derive(Debug, Default)]
pub struct Histogram {
    counts: [AtomicU64; LATENCY_BOUNDS_MS.len() + 1],
    sum_ms: AtomicU64,
}

impl Histogram {
    pub fn observe(&self, ms: u64) {
        let slot = LATENCY_BOUNDS_MS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(LATENCY_BOUNDS_MS.len());
        self.counts[slot].fetch_add(1, Ordering::Relaxed);
        self.sum_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    pub fn sum(&self) -> u64 {
        self.sum_ms.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            n => self.sum() as f64 / n as f64,
        }
    }

    /// `(bound, count)` for each bounded bucket.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        LATENCY_BOUNDS_MS
            .iter()
            .zip(&self.counts)
            .map(|(&bound, c)| (bound, c.load(Ordering::Relaxed)))
            .collect()
    }

    /// Observations slower than the last bound.
    pub fn overflow(&self) -> u64 {
        self.counts[LATENCY_BOUNDS_MS.len()].load(Ordering::Relaxed)
    }
}

/// Collected ledger metrics.
#[derive(Debug, Default)]
pub struct Metrics {
    // Ingestion
    pub interactions_received: Counter,
    pub interactions_recorded: Counter,
    pub views_recorded: Counter,
    pub carts_recorded: Counter,
    pub saves_recorded: Counter,
    pub purchases_recorded: Counter,
    pub weight_recorded: Counter,

    // Rejections
    pub validation_failures: Counter,
    pub unknown_products: Counter,
    pub persistence_errors: Counter,

    // Reads
    pub aggregate_queries: Counter,
    pub catalog_lookups: Counter,
    pub catalog_cache_hits: Counter,

    // Latency histograms
    pub record_latency_ms: Histogram,
    pub aggregate_latency_ms: Histogram,
    pub store_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a recorded interaction under its action label.
    pub fn record_action(&self, action: &str, weight: u32) {
        self.interactions_recorded.inc();
        self.weight_recorded.add(u64::from(weight));
        match action {
            "view" => self.views_recorded.inc(),
            "cart" => self.carts_recorded.inc(),
            "save" => self.saves_recorded.inc(),
            "purchase" => self.purchases_recorded.inc(),
            _ => {}
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub interactions_received: u64,
    pub interactions_recorded: u64,
    pub views_recorded: u64,
    pub carts_recorded: u64,
    pub saves_recorded: u64,
    pub purchases_recorded: u64,
    pub weight_recorded: u64,
    pub validation_failures: u64,
    pub unknown_products: u64,
    pub persistence_errors: u64,
    pub aggregate_queries: u64,
    pub catalog_lookups: u64,
    pub catalog_cache_hits: u64,
    pub record_latency_mean_ms: f64,
    pub aggregate_latency_mean_ms: f64,
    pub store_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            interactions_received: self.interactions_received.get(),
            interactions_recorded: self.interactions_recorded.get(),
            views_recorded: self.views_recorded.get(),
            carts_recorded: self.carts_recorded.get(),
            saves_recorded: self.saves_recorded.get(),
            purchases_recorded: self.purchases_recorded.get(),
            weight_recorded: self.weight_recorded.get(),
            validation_failures: self.validation_failures.get(),
            unknown_products: self.unknown_products.get(),
            persistence_errors: self.persistence_errors.get(),
            aggregate_queries: self.aggregate_queries.get(),
            catalog_lookups: self.catalog_lookups.get(),
            catalog_cache_hits: self.catalog_cache_hits.get(),
            record_latency_mean_ms: self.record_latency_ms.mean(),
            aggregate_latency_mean_ms: self.aggregate_latency_ms.mean(),
            store_latency_mean_ms: self.store_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
