//! API error handling
//!
//! Lifecycle errors map onto status codes by kind. Storage failures are
//! logged in full here and reach the client only as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use app_lifecycle::{ConflictCode, LifecycleError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Machine-readable reason, e.g. `must_be_positive` or `amount_mismatch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            code: None,
            field: None,
            details: None,
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Lifecycle(err) => lifecycle_parts(err),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new("bad_request", msg.clone())),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, ErrorResponse::new("unauthorized", "Unauthorized")),
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("validation_error", msg.clone()),
            ),
            ApiError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
        }
    }
}

fn lifecycle_parts(err: &LifecycleError) -> (StatusCode, ErrorResponse) {
    match err {
        LifecycleError::Validation { field, code, message } => {
            let mut body = ErrorResponse::new("validation_error", message.clone());
            body.code = Some(code.as_str().to_string());
            body.field = Some(field.clone());
            (StatusCode::UNPROCESSABLE_ENTITY, body)
        }
        LifecycleError::NotFound { .. } => (StatusCode::NOT_FOUND, ErrorResponse::new("not_found", err.to_string())),
        LifecycleError::Authorization(msg) => (StatusCode::FORBIDDEN, ErrorResponse::new("forbidden", msg.clone())),
        LifecycleError::Conflict { code, message } => {
            let status = match code {
                ConflictCode::AmountMismatch | ConflictCode::OutsideRenewalWindow => StatusCode::BAD_REQUEST,
                _ => StatusCode::CONFLICT,
            };
            let mut body = ErrorResponse::new("conflict", message.clone());
            body.code = Some(code.as_str().to_string());
            (status, body)
        }
        LifecycleError::Storage(port) => {
            error!(error = %port, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("internal_error", "Internal server error"),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PortError, ValidationCode};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                LifecycleError::validation("claim_amount", ValidationCode::MustBePositive, "must be positive"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LifecycleError::not_found("Policy", "x"), StatusCode::NOT_FOUND),
            (LifecycleError::unauthorized("not yours"), StatusCode::FORBIDDEN),
            (
                LifecycleError::conflict(ConflictCode::AmountMismatch, "700 != 702"),
                StatusCode::BAD_REQUEST,
            ),
            (
                LifecycleError::conflict(ConflictCode::OutsideRenewalWindow, "too early"),
                StatusCode::BAD_REQUEST,
            ),
            (
                LifecycleError::conflict(ConflictCode::AlreadyProcessed, "paid"),
                StatusCode::CONFLICT,
            ),
            (
                LifecycleError::Storage(PortError::connection("pool closed")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = ApiError::from(err).parts();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let (_, body) = ApiError::from(LifecycleError::Storage(PortError::connection("password=hunter2"))).parts();
        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn test_validation_body_carries_field_and_code() {
        let err = LifecycleError::validation("claim_amount", ValidationCode::MustBePositive, "must be positive");
        let (_, body) = ApiError::from(err).parts();
        assert_eq!(body.field.as_deref(), Some("claim_amount"));
        assert_eq!(body.code.as_deref(), Some("must_be_positive"));
    }
}
