//! API error responses
//!
//! Every failure is returned as `{"error": <code>, "message": <text>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
}

/// Handler error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected or failed by the pricing engine
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Body is not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The blocking pricing task panicked or was cancelled
    #[error("Pricing task failed: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pricing(PricingError::InvalidParameter { .. })
            | ApiError::Pricing(PricingError::InsufficientSamples { .. })
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Pricing(PricingError::ComputeTimeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Pricing(PricingError::NumericalInstability(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code placed in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Pricing(PricingError::InvalidParameter { .. }) => "invalid_parameter",
            ApiError::Pricing(PricingError::InsufficientSamples { .. }) => "insufficient_samples",
            ApiError::Pricing(PricingError::NumericalInstability(_)) => "numerical_instability",
            ApiError::Pricing(PricingError::ComputeTimeout { .. }) => "compute_timeout",
            ApiError::InvalidBody(_) => "invalid_request",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "pricing request failed");
        } else {
            tracing::info!(error = %self, "pricing request rejected");
        }

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(PricingError::invalid("K", "must be positive")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PricingError::InsufficientSamples { got: 1, need: 2 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PricingError::ComputeTimeout { limit_ms: 1_000 }).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::from(PricingError::NumericalInstability("nan".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidBody("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_message_is_verbatim() {
        let err = ApiError::from(PricingError::invalid("rho", "must lie in [-1, 1], got 1.5"));
        assert_eq!(err.code(), "invalid_parameter");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'rho': must lie in [-1, 1], got 1.5"
        );
    }

    #[tokio::test]
    async fn test_response_body() {
        let response = ApiError::from(PricingError::ComputeTimeout { limit_ms: 500 }).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "compute_timeout");
        assert!(error.message.contains("500 ms"));
    }
}
