//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_core::{InteractionAction, InteractionEvent, InteractionSummary, ValidationErrorCode};
use serde::{Deserialize, Serialize};
use telemetry::{ComponentHealthReport, HealthReport};

/// Response for a recorded interaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
    pub message: String,
    pub interaction: InteractionEvent,
}

impl TrackResponse {
    pub fn recorded(interaction: InteractionEvent) -> Self {
        Self {
            success: true,
            message: tracked_message(interaction.action).to_string(),
            interaction,
        }
    }
}

fn tracked_message(action: InteractionAction) -> &'static str {
    match action {
        InteractionAction::View => "Product view tracked",
        InteractionAction::Cart => "Cart interaction tracked",
        InteractionAction::Save => "Save interaction tracked",
        InteractionAction::Purchase => "Purchase interaction tracked",
    }
}

/// Summary wrapped in a success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: InteractionSummary,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub store_backend: String,
    pub store_connected: bool,
    pub catalog_connected: bool,
    pub components: Vec<ComponentHealthReport>,
}

impl HealthResponse {
    pub fn from_report(report: HealthReport, store_backend: &str) -> Self {
        let healthy = |name: &str| {
            report
                .components
                .iter()
                .any(|c| c.name == name && c.healthy)
        };

        Self {
            status: report.status.as_str().to_string(),
            store_backend: store_backend.to_string(),
            store_connected: healthy("store"),
            catalog_connected: healthy("catalog"),
            components: report.components.clone(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error carrying a ledger error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn validation(code: ValidationErrorCode, details: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse::new("Validation failed", code.code()).with_details(details),
        }
    }

    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self::validation(ValidationErrorCode::MalformedBody, vec![detail.into()])
    }

    pub fn invalid_query(detail: impl Into<String>) -> Self {
        Self::validation(ValidationErrorCode::InvalidQuery, vec![detail.into()])
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg)
    }

    pub fn code(&self) -> &str {
        &self.response.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<ledger_core::Error> for ApiError {
    fn from(err: ledger_core::Error) -> Self {
        use ledger_core::Error;

        match err {
            Error::Validation {
                code,
                message,
                http_status,
            } => Self {
                status: StatusCode::from_u16(http_status).unwrap_or(StatusCode::BAD_REQUEST),
                response: ErrorResponse::new("Validation failed", code).with_details(vec![message]),
            },
            Error::NotFound {
                code,
                message,
                http_status,
            } => ApiError::with_code(
                StatusCode::from_u16(http_status).unwrap_or(StatusCode::NOT_FOUND),
                code,
                message,
            ),
            Error::Persistence {
                code,
                message,
                http_status,
            } => ApiError::with_code(
                StatusCode::from_u16(http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                code,
                message,
            ),
            Error::Internal(msg) => ApiError::internal(msg),
        }
    }
}
