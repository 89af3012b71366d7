//! Policy domain errors
//!
//! This module defines the error types raised while validating applications,
//! quoting, issuing policies and renewing them.

use thiserror::Error;

use core_kernel::{FieldError, TemporalError, UserId};

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A submitted field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// The application has already been approved or rejected
    #[error("Application {number} is {status}, expected pending")]
    ApplicationNotPending { number: String, status: String },

    /// An operation was applied to the wrong insurance kind
    #[error("Expected a {expected} application, got {actual}")]
    KindMismatch { expected: String, actual: String },

    /// The selected plan is no longer offered
    #[error("Plan {0} is not active")]
    PlanInactive(String),

    /// Invalid policy state transition attempted
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Calendar arithmetic failed
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

/// Errors raised by the renewal window manager
#[derive(Debug, Error)]
pub enum RenewalError {
    /// The requester does not hold the policy
    #[error("User {requester} does not own policy {policy_number}")]
    NotOwner { policy_number: String, requester: UserId },

    /// Renewal requested too early, too late, or on an inactive policy
    #[error("Policy {policy_number} is outside its renewal window")]
    OutsideRenewalWindow { policy_number: String },

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}
