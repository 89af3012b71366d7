//! Billing Domain - Premium Payments
//!
//! Payments are recorded, not processed: the portal has no payment gateway,
//! so a [`Payment`] is written as `completed` the moment the tendered amount
//! has been checked against what is owed.
//!
//! Two events produce a payment:
//! - **Issuance**: the first premium for an application, which creates the policy
//! - **Renewal**: the premium for a renewed term of an existing policy
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{verify_amount, DEFAULT_PAYMENT_TOLERANCE};
//!
//! verify_amount(dec!(702), dec!(702.004), DEFAULT_PAYMENT_TOLERANCE)?;
//! ```

pub mod error;
pub mod payment;

pub use error::BillingError;
pub use payment::{
    verify_amount, Payment, PaymentMethod, PaymentPurpose, PaymentStatus, RecordPayment,
    DEFAULT_PAYMENT_TOLERANCE,
};
