// Error handling module for the campaign pricing API
// Provides the HTTP-facing error type and its JSON response format

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::campaign::PricingError;

/// Main error type for the API
/// All handlers return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed field validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// The pricing core rejected the snapshot
    /// Maps to HTTP 400, or 422 for unknown product references and
    /// amounts too large to compute
    Pricing(PricingError),

    /// Body could not be read as JSON of the expected shape
    /// Keeps the status chosen by axum's JSON extractor (400, 415 or 422)
    MalformedBody { status: StatusCode, message: String },
}

/// Consistent error response structure for every failing request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "UNKNOWN_PRODUCT")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Expected client errors are logged at debug level; data-integrity
    /// problems (unknown product references) at warn level.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);

                (
                    status,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::Pricing(pricing_error) => {
                if matches!(
                    pricing_error,
                    PricingError::UnknownProduct { .. } | PricingError::Overflow { .. }
                ) {
                    warn!("Rejected snapshot: {}", pricing_error);
                } else {
                    debug!("Rejected snapshot: {}", pricing_error);
                }

                (
                    status,
                    ErrorResponse {
                        error_code: pricing_error.error_code().to_string(),
                        message: pricing_error.to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::MalformedBody { message, .. } => {
                debug!("Malformed request body: {}", message);

                (
                    status,
                    ErrorResponse {
                        error_code: "MALFORMED_BODY".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Pricing(PricingError::UnknownProduct { .. } | PricingError::Overflow { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Pricing(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody { status, .. } => *status,
        }
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Convert JSON extractor rejections to ApiError
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Convert pricing core errors to ApiError
impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        ApiError::Pricing(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(PricingError::DuplicateProduct("p1".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PricingError::UnknownProduct {
                order_id: "o1".into(),
                product_id: "p9".into(),
            })
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(PricingError::Overflow { operation: "line subtotal" }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::MalformedBody {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "Expected request with `Content-Type: application/json`".into(),
            }
            .status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_malformed_body_keeps_extractor_message() {
        let error = ApiError::MalformedBody {
            status: StatusCode::BAD_REQUEST,
            message: "Failed to parse the request body as JSON".into(),
        };
        let (status, body) = error.to_error_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "MALFORMED_BODY");
        assert_eq!(body.message, "Failed to parse the request body as JSON");
    }

    #[test]
    fn test_pricing_error_body() {
        let (status, body) = ApiError::from(PricingError::DuplicateOrder("A".into())).to_error_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "DUPLICATE_ORDER");
        assert_eq!(body.message, "Duplicate order id: A");
        assert!(body.details.is_none());
    }
}
