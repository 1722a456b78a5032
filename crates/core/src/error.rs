//! Unified error types for the interaction ledger.
//!
//! Error codes:
//! - VALID_001-006: Validation errors
//! - NOTFOUND_001: Unknown referenced entity
//! - DB_001-003: Persistence errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: userId or productId missing or blank
    MissingField,
    /// VALID_002: action is not one of view/cart/save/purchase
    UnknownAction,
    /// VALID_003: rating outside 1..=5
    RatingOutOfRange,
    /// VALID_004: request body is not valid JSON for the endpoint
    MalformedBody,
    /// VALID_005: identifier exceeds the length limit
    IdentifierTooLong,
    /// VALID_006: query parameter could not be interpreted
    InvalidQuery,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "VALID_001",
            Self::UnknownAction => "VALID_002",
            Self::RatingOutOfRange => "VALID_003",
            Self::MalformedBody => "VALID_004",
            Self::IdentifierTooLong => "VALID_005",
            Self::InvalidQuery => "VALID_006",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Not-found error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundErrorCode {
    /// NOTFOUND_001: product does not exist in the catalog
    Product,
}

impl NotFoundErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Product => "NOTFOUND_001",
        }
    }

    pub fn http_status(&self) -> u16 {
        404
    }
}

/// Persistence error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Failed to append an interaction
    AppendFailed,
    /// DB_002: Aggregate or listing query failed
    QueryFailed,
    /// DB_003: Store or catalog unreachable
    Unavailable,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AppendFailed => "DB_001",
            Self::QueryFailed => "DB_002",
            Self::Unavailable => "DB_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unavailable => 503,
            _ => 500,
        }
    }
}

/// Unified error type for the interaction ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input.
    #[error("[{code}] {message}")]
    Validation {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Referenced entity does not exist. Nothing was recorded.
    #[error("[{code}] {message}")]
    NotFound {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Underlying store or dependency failed. Safe to retry.
    #[error("[{code}] {message}")]
    Persistence {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::Validation {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(code: NotFoundErrorCode, msg: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Persistence {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { http_status, .. } => *http_status,
            Self::NotFound { http_status, .. } => *http_status,
            Self::Persistence { http_status, .. } => *http_status,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation { code, .. } => Some(code),
            Self::NotFound { code, .. } => Some(code),
            Self::Persistence { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether a caller may retry the same request.
    ///
    /// Retrying a record call appends another event; dedupe is the caller's job.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
