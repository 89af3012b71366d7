//! Lifecycle error taxonomy
//!
//! Every workflow failure is one of five kinds, each with a fixed meaning for
//! callers:
//!
//! | kind            | meaning                                           |
//! |-----------------|---------------------------------------------------|
//! | `Validation`    | a field is missing, malformed or out of range     |
//! | `NotFound`      | a referenced record does not exist                |
//! | `Authorization` | the caller may not act on the record              |
//! | `Conflict`      | the request clashes with the record's state       |
//! | `Storage`       | the backing store failed; detail is logged only   |
//!
//! Domain errors convert into these through `From`, so workflows use `?`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use core_kernel::{FieldError, PortError, SequenceError, TemporalError, ValidationCode};
use domain_billing::BillingError;
use domain_claims::ClaimError;
use domain_policy::{PolicyError, RenewalError};

/// Machine-readable reason for a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictCode {
    AmountMismatch,
    OutsideRenewalWindow,
    DuplicateIdentifier,
    AlreadyProcessed,
    PolicyNotActive,
}

impl ConflictCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictCode::AmountMismatch => "amount_mismatch",
            ConflictCode::OutsideRenewalWindow => "outside_renewal_window",
            ConflictCode::DuplicateIdentifier => "duplicate_identifier",
            ConflictCode::AlreadyProcessed => "already_processed",
            ConflictCode::PolicyNotActive => "policy_not_active",
        }
    }
}

impl fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        field: String,
        code: ValidationCode,
        message: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Conflict ({code}): {message}")]
    Conflict { code: ConflictCode, message: String },

    #[error("Storage error: {0}")]
    Storage(PortError),
}

impl LifecycleError {
    pub fn validation(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        LifecycleError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        LifecycleError::Authorization(message.into())
    }

    pub fn conflict(code: ConflictCode, message: impl Into<String>) -> Self {
        LifecycleError::Conflict {
            code,
            message: message.into(),
        }
    }

    /// The conflict code, if this is a conflict
    pub fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            LifecycleError::Conflict { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The validation code, if this is a validation failure
    pub fn validation_code(&self) -> Option<ValidationCode> {
        match self {
            LifecycleError::Validation { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for a store-level uniqueness collision
    pub(crate) fn is_storage_conflict(&self) -> bool {
        matches!(self, LifecycleError::Storage(err) if err.is_conflict())
    }
}

impl From<FieldError> for LifecycleError {
    fn from(err: FieldError) -> Self {
        LifecycleError::Validation {
            field: err.field,
            code: err.code,
            message: err.message,
        }
    }
}

impl From<PortError> for LifecycleError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => LifecycleError::NotFound { entity: entity_type, id },
            other => LifecycleError::Storage(other),
        }
    }
}

impl From<TemporalError> for LifecycleError {
    fn from(err: TemporalError) -> Self {
        LifecycleError::validation("date", ValidationCode::InvalidRange, err.to_string())
    }
}

impl From<SequenceError> for LifecycleError {
    fn from(err: SequenceError) -> Self {
        LifecycleError::conflict(ConflictCode::DuplicateIdentifier, err.to_string())
    }
}

impl From<PolicyError> for LifecycleError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Validation(field) => field.into(),
            PolicyError::ApplicationNotPending { .. } => {
                LifecycleError::conflict(ConflictCode::AlreadyProcessed, err.to_string())
            }
            PolicyError::KindMismatch { .. } => {
                LifecycleError::validation("kind", ValidationCode::InvalidValue, err.to_string())
            }
            PolicyError::PlanInactive(_) => {
                LifecycleError::validation("plan_id", ValidationCode::InvalidValue, err.to_string())
            }
            PolicyError::InvalidStateTransition { .. } => {
                LifecycleError::validation("status", ValidationCode::InvalidTransition, err.to_string())
            }
            PolicyError::Temporal(temporal) => temporal.into(),
        }
    }
}

impl From<RenewalError> for LifecycleError {
    fn from(err: RenewalError) -> Self {
        match err {
            RenewalError::NotOwner { .. } => LifecycleError::Authorization(err.to_string()),
            RenewalError::OutsideRenewalWindow { .. } => {
                LifecycleError::conflict(ConflictCode::OutsideRenewalWindow, err.to_string())
            }
            RenewalError::Temporal(temporal) => temporal.into(),
        }
    }
}

impl From<ClaimError> for LifecycleError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::InvalidStatus(_) => {
                LifecycleError::validation("status", ValidationCode::InvalidStatus, err.to_string())
            }
            ClaimError::MissingRequiredField { ref field, .. } => {
                LifecycleError::validation(field.clone(), ValidationCode::Required, err.to_string())
            }
            ClaimError::InvalidTransition { .. } => {
                LifecycleError::validation("status", ValidationCode::InvalidTransition, err.to_string())
            }
            ClaimError::Validation(field) => field.into(),
        }
    }
}

impl From<BillingError> for LifecycleError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::AmountMismatch { .. } => {
                LifecycleError::conflict(ConflictCode::AmountMismatch, err.to_string())
            }
            BillingError::Validation(field) => field.into(),
        }
    }
}
