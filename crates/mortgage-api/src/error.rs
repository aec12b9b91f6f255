//! Error handling for the mortgage API
//!
//! Every failure a handler can produce is an `ApiError`. Each variant maps to
//! an HTTP status code and a client-facing message, serialized as
//! `{"error": "<message>"}` to stay compatible with existing clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mortgage_calculator::CalculationError;
use mortgage_types::ProgramSelectionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body is not a JSON loan request (400 Bad Request)
    #[error("invalid json")]
    InvalidJson,

    /// Zero or several programs selected (400 Bad Request)
    #[error(transparent)]
    ProgramSelection(#[from] ProgramSelectionError),

    /// Field shape validation (400 Bad Request)
    #[error("validation error: {field} {reason}")]
    Validation { field: &'static str, reason: String },

    /// Business rule rejected by the calculator (400 Bad Request)
    #[error(transparent)]
    BusinessRule(CalculationError),

    /// Nothing has been calculated yet (400 Bad Request)
    #[error("empty cache")]
    EmptyCache,

    /// Internal server errors (500 Internal Server Error)
    #[error("internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson
            | ApiError::ProgramSelection(_)
            | ApiError::Validation { .. }
            | ApiError::BusinessRule(_)
            | ApiError::EmptyCache => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidJson => "INVALID_JSON",
            ApiError::ProgramSelection(_) => "PROGRAM_SELECTION_ERROR",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::EmptyCache => "EMPTY_CACHE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message sent to the client. Internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Internal { .. } => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to ApiErrorResponse format for JSON serialization
    pub fn to_response(&self) -> ApiErrorResponse {
        ApiErrorResponse { error: self.client_message() }
    }

    /// Create a validation error for a specific field
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }

    /// Create a simple internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    #[schema(example = "the initial payment should be more")]
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Business-rule rejections stay client errors; anything else from the
/// calculator is a broken invariant.
impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        if err.is_business_rule() {
            ApiError::BusinessRule(err)
        } else {
            ApiError::internal(err.to_string())
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_types::Program;

    #[test]
    fn test_client_messages() {
        assert_eq!(ApiError::InvalidJson.client_message(), "invalid json");
        assert_eq!(ApiError::EmptyCache.client_message(), "empty cache");
        assert_eq!(
            ApiError::from(ProgramSelectionError::NotSelected).client_message(),
            "choose program"
        );
        assert_eq!(
            ApiError::validation("months", "must be between 1 and 600").client_message(),
            "validation error: months must be between 1 and 600"
        );
    }

    #[test]
    fn test_calculation_error_mapping() {
        let too_low = ApiError::from(CalculationError::InitialPaymentTooLow {
            minimum: 1_000_000.0,
            actual: 500_000.0,
        });
        assert_eq!(too_low.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(too_low.client_message(), "the initial payment should be more");

        let broken = ApiError::from(CalculationError::InvalidRate {
            program: Program::Base,
            rate: -1.0,
        });
        assert_eq!(broken.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.client_message(), "internal server error");
        assert_eq!(broken.error_code(), "INTERNAL_ERROR");
    }
}
