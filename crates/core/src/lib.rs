//! Core types, weight rule, validation, and storage traits for the
//! interaction ledger.

pub mod aggregate;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod limits;
pub mod schema;
pub mod store;
pub mod weight;

pub use aggregate::*;
pub use catalog::*;
pub use clock::MonotonicClock;
pub use error::{DbErrorCode, Error, NotFoundErrorCode, Result, ValidationErrorCode};
pub use events::*;
pub use ledger::InteractionLedger;
pub use schema::validate_report;
pub use store::*;
pub use weight::{compute_weight, compute_weight_for_label, FALLBACK_WEIGHT, RATING_MULTIPLIER};
