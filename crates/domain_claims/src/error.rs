//! Claims domain errors

use thiserror::Error;

use core_kernel::FieldError;

/// Errors raised while filing or reviewing a claim
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Invalid claim status: {0}")]
    InvalidStatus(String),

    #[error("Field '{field}' is required when moving a claim to {target}")]
    MissingRequiredField { field: String, target: String },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldError),
}
