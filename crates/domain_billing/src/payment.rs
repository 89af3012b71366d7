//! Payment recording

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::money::{amounts_match, round_amount};
use core_kernel::validation::require_positive;
use core_kernel::{ApplicationId, FieldError, PaymentId, PolicyId, UserId};

use crate::error::BillingError;

/// Largest difference tolerated between the amount owed and the amount paid
pub const DEFAULT_PAYMENT_TOLERANCE: Decimal = dec!(0.01);

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    /// UPI and other wallet transfers
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "digital_wallet" => Ok(PaymentMethod::DigitalWallet),
            other => Err(FieldError::invalid("method", format!("unknown payment method '{other}'"))),
        }
    }
}

/// Payment status
///
/// Without a gateway every recorded payment is already settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            other => Err(FieldError::invalid("status", format!("unknown payment status '{other}'"))),
        }
    }
}

/// Why a payment was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPurpose {
    Issuance,
    Renewal,
}

impl PaymentPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPurpose::Issuance => "issuance",
            PaymentPurpose::Renewal => "renewal",
        }
    }
}

impl FromStr for PaymentPurpose {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issuance" => Ok(PaymentPurpose::Issuance),
            "renewal" => Ok(PaymentPurpose::Renewal),
            other => Err(FieldError::invalid("purpose", format!("unknown payment purpose '{other}'"))),
        }
    }
}

/// A recorded premium payment; immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Reference shown to the customer, e.g. `TXN-0193A1F4C2D8`
    pub transaction_reference: String,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub policy_id: PolicyId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub purpose: PaymentPurpose,
    pub paid_at: DateTime<Utc>,
}

/// Inputs for recording a payment
#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub policy_id: PolicyId,
    /// Amount owed
    pub expected: Decimal,
    /// Amount the customer paid
    pub tendered: Decimal,
    pub method: PaymentMethod,
    pub purpose: PaymentPurpose,
    pub tolerance: Decimal,
    pub now: DateTime<Utc>,
}

impl Payment {
    /// Verifies the tendered amount and records a completed payment
    pub fn record(request: RecordPayment) -> Result<Self, BillingError> {
        verify_amount(request.expected, request.tendered, request.tolerance)?;

        let id = PaymentId::new_v7();
        Ok(Self {
            transaction_reference: transaction_reference(&id),
            id,
            user_id: request.user_id,
            application_id: request.application_id,
            policy_id: request.policy_id,
            amount: round_amount(request.tendered),
            method: request.method,
            status: PaymentStatus::Completed,
            purpose: request.purpose,
            paid_at: request.now,
        })
    }
}

/// Checks that `tendered` is positive and within `tolerance` of `expected`
pub fn verify_amount(expected: Decimal, tendered: Decimal, tolerance: Decimal) -> Result<(), BillingError> {
    require_positive("amount", tendered)?;
    if !amounts_match(expected, tendered, tolerance) {
        return Err(BillingError::AmountMismatch { expected, tendered });
    }
    Ok(())
}

fn transaction_reference(id: &PaymentId) -> String {
    // The tail of a v7 uuid is random; the head is a timestamp.
    let hex = id.as_uuid().simple().to_string().to_uppercase();
    format!("TXN-{}", &hex[hex.len() - 12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_reference_format() {
        let reference = transaction_reference(&PaymentId::new_v7());
        assert!(reference.starts_with("TXN-"));
        assert_eq!(reference.len(), 16);
        assert!(reference[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("bank_transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
