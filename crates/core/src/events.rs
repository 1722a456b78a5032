//! Interaction event definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{Error, ValidationErrorCode};
use crate::limits::MAX_ID_LEN;

/// Kind of interaction a user had with a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    /// User opened the product page
    View,
    /// User added the product to their cart
    Cart,
    /// User saved or liked the product
    Save,
    /// User bought the product
    Purchase,
}

impl InteractionAction {
    /// Every action, in ascending base weight order.
    pub const ALL: [InteractionAction; 4] = [Self::View, Self::Cart, Self::Save, Self::Purchase];

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Cart => "cart",
            Self::Save => "save",
            Self::Purchase => "purchase",
        }
    }

    /// Parses a label, ignoring surrounding whitespace and case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "view" => Some(Self::View),
            "cart" => Some(Self::Cart),
            "save" => Some(Self::Save),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }

    /// Whether a star rating may accompany this action.
    pub fn accepts_rating(&self) -> bool {
        matches!(self, Self::Purchase)
    }
}

impl fmt::Display for InteractionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            Error::validation(
                ValidationErrorCode::UnknownAction,
                format!("unknown action '{}', expected view, cart, save or purchase", s),
            )
        })
    }
}

/// A single recorded interaction. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    /// Unique event ID
    pub id: Uuid,
    pub user_id: String,
    pub product_id: String,
    pub action: InteractionAction,
    /// Star rating, only ever present on purchases
    pub rating: Option<u8>,
    /// Weight derived from action and rating at write time
    pub weight: u32,
    /// Ledger-assigned creation time
    pub timestamp: DateTime<Utc>,
}

/// Ids are checked as stored: surrounding whitespace does not count.
fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    if trimmed.chars().count() > MAX_ID_LEN {
        let mut err = ValidationError::new("length");
        err.message = Some(format!("must be at most {} characters", MAX_ID_LEN).into());
        return Err(err);
    }
    Ok(())
}

/// Inbound interaction report, as received from an ingestion endpoint.
///
/// Fields are deliberately loose (`action` as text, `rating` as a wide
/// integer) so that bad input surfaces as a coded validation error rather
/// than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    #[serde(default)]
    #[validate(custom(function = "validate_identifier"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_identifier"))]
    pub product_id: String,
    #[serde(default)]
    pub action: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i64>,
}

impl InteractionReport {
    pub fn new(
        user_id: impl Into<String>,
        product_id: impl Into<String>,
        action: InteractionAction,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
            action: action.as_str().to_string(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// A report that passed validation, with a typed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInteraction {
    pub user_id: String,
    pub product_id: String,
    pub action: InteractionAction,
    /// Already dropped when the action does not accept a rating
    pub rating: Option<u8>,
}
