//! Interaction weight rule for collaborative filtering.
//!
//! | action   | base | bonus            |
//! |----------|------|------------------|
//! | view     | 1    |                  |
//! | cart     | 2    |                  |
//! | save     | 3    |                  |
//! | purchase | 5    | rating * 2       |
//! | unknown  | 1    |                  |

use crate::events::InteractionAction;

/// Weight given to labels that are not a known action.
pub const FALLBACK_WEIGHT: u32 = 1;

/// Points added per rating star on a purchase.
pub const RATING_MULTIPLIER: u32 = 2;

impl InteractionAction {
    /// Base weight before any rating bonus.
    pub fn base_weight(&self) -> u32 {
        match self {
            Self::View => 1,
            Self::Cart => 2,
            Self::Save => 3,
            Self::Purchase => 5,
        }
    }
}

/// Computes the weight of an interaction.
///
/// A rating only counts on purchases; for any other action it is ignored.
pub fn compute_weight(action: InteractionAction, rating: Option<u8>) -> u32 {
    let base = action.base_weight();
    match rating {
        Some(stars) if action.accepts_rating() => base + u32::from(stars) * RATING_MULTIPLIER,
        _ => base,
    }
}

/// Computes the weight for a raw action label, falling back to
/// [`FALLBACK_WEIGHT`] when the label is not a known action.
///
/// Labels are normalized first: surrounding whitespace is ignored and
/// case does not matter, so `" CART "` scores as `cart`. Only labels that
/// still match none of the four actions take the fallback.
pub fn compute_weight_for_label(label: &str, rating: Option<u8>) -> u32 {
    match InteractionAction::from_label(label) {
        Some(action) => compute_weight(action, rating),
        None => FALLBACK_WEIGHT,
    }
}
