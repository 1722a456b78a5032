//! Aggregate signals over the interaction log.
//!
//! These are pure folds: stores that cannot push aggregation down to the
//! database (the in-memory store) use them directly, and the ClickHouse
//! store's SQL mirrors the same ordering rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::events::{InteractionAction, InteractionEvent};
use crate::limits::clamp_limit;

/// Summed weight for one key (a product for a user, or a user for a product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    /// productId or userId, depending on the aggregation
    pub key: String,
    pub total_weight: u64,
    /// Number of events folded into this entry
    pub interactions: u64,
    /// Timestamp of the most recent event for this key
    pub last_interaction: DateTime<Utc>,
}

/// Filters applied to an aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateQuery {
    /// Only fold events at or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Keep at most this many entries (clamped to the query cap).
    /// `None` returns every entry.
    pub limit: Option<usize>,
}

impl AggregateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether an event falls inside the query window.
    pub fn includes(&self, event: &InteractionEvent) -> bool {
        self.since.map_or(true, |since| event.timestamp >= since)
    }

    /// Entry cap after clamping, or `None` for the full mapping.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.map(|limit| clamp_limit(Some(limit)))
    }
}

/// Ranking order: heaviest first, then most recent, then key for stability.
pub fn rank_order(a: &AggregateEntry, b: &AggregateEntry) -> Ordering {
    b.total_weight
        .cmp(&a.total_weight)
        .then_with(|| b.last_interaction.cmp(&a.last_interaction))
        .then_with(|| a.key.cmp(&b.key))
}

/// Folds events into ranked entries, grouping by `key_of`.
pub fn fold_weights<'a, I, F>(events: I, query: &AggregateQuery, key_of: F) -> Vec<AggregateEntry>
where
    I: IntoIterator<Item = &'a InteractionEvent>,
    F: Fn(&InteractionEvent) -> &str,
{
    let mut by_key: HashMap<&str, AggregateEntry> = HashMap::new();

    for event in events.into_iter().filter(|e| query.includes(e)) {
        let key = key_of(event);
        let entry = by_key.entry(key).or_insert_with(|| AggregateEntry {
            key: key.to_string(),
            total_weight: 0,
            interactions: 0,
            last_interaction: event.timestamp,
        });
        entry.total_weight += u64::from(event.weight);
        entry.interactions += 1;
        if event.timestamp > entry.last_interaction {
            entry.last_interaction = event.timestamp;
        }
    }

    let mut entries: Vec<AggregateEntry> = by_key.into_values().collect();
    entries.sort_by(rank_order);
    if let Some(limit) = query.effective_limit() {
        entries.truncate(limit);
    }
    entries
}

/// Per-action breakdown in the ledger summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub action: InteractionAction,
    pub count: u64,
    pub avg_weight: f64,
}

/// Whole-ledger overview for admin and debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSummary {
    pub total_interactions: u64,
    pub unique_users: u64,
    pub unique_products: u64,
    /// Sorted by count, highest first
    pub by_action: Vec<ActionSummary>,
}

/// Builds a summary from a slice of events.
pub fn summarize<'a, I>(events: I) -> InteractionSummary
where
    I: IntoIterator<Item = &'a InteractionEvent>,
{
    let mut users = HashSet::new();
    let mut products = HashSet::new();
    let mut totals: HashMap<InteractionAction, (u64, u64)> = HashMap::new();
    let mut total = 0u64;

    for event in events {
        total += 1;
        users.insert(event.user_id.as_str());
        products.insert(event.product_id.as_str());
        let slot = totals.entry(event.action).or_default();
        slot.0 += 1;
        slot.1 += u64::from(event.weight);
    }

    let mut by_action: Vec<ActionSummary> = totals
        .into_iter()
        .map(|(action, (count, weight_sum))| ActionSummary {
            action,
            count,
            avg_weight: weight_sum as f64 / count as f64,
        })
        .collect();
    by_action.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.action.as_str().cmp(b.action.as_str()))
    });

    InteractionSummary {
        total_interactions: total,
        unique_users: users.len() as u64,
        unique_products: products.len() as u64,
        by_action,
    }
}
