//! Billing domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::FieldError;

/// Errors that can occur in the billing domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// Tendered amount differs from the amount owed by more than the tolerance
    #[error("Payment amount {tendered} does not match the amount due {expected}")]
    AmountMismatch { expected: Decimal, tendered: Decimal },

    #[error("Invalid payment: {0}")]
    Validation(#[from] FieldError),
}
