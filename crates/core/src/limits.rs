//! Input and query bounds for the interaction ledger.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so the identifier and rating limits are duplicated in `events.rs`.
//! Keep both in sync when modifying.

/// Maximum identifier length for userId and productId.
/// ObjectIds=24, UUIDs=36, custom ids up to 128.
pub const MAX_ID_LEN: usize = 128;

/// Lowest star rating accepted on a purchase.
pub const MIN_RATING: u8 = 1;

/// Highest star rating accepted on a purchase.
pub const MAX_RATING: u8 = 5;

/// Default number of entries returned by aggregate and listing queries.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Hard cap on entries returned by aggregate and listing queries.
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Clamp a caller-supplied limit to `1..=MAX_QUERY_LIMIT`.
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_QUERY_LIMIT)
        .clamp(1, MAX_QUERY_LIMIT)
}
