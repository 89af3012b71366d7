//! Policy Administration Domain
//!
//! This crate holds the business rules that turn an application into a
//! policy and keep that policy current:
//! - **Applications**: vehicle and health submissions with shared numbering and status
//! - **Plans**: the read-only health plan catalog
//! - **Premium**: the factor-table vehicle calculator and health pass-through
//! - **Aggregate**: the Policy record and its state machine
//! - **Renewal**: window eligibility, term extension and expiry alerts
//!
//! # Policy Lifecycle
//!
//! ```text
//! Application(pending) --payment--> Policy(active) --renew--> Policy(active, +1 year)
//!                                                  \-> expired
//!                                                  \-> cancelled
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PremiumCalculator, RiskProfile, VehicleType};
//!
//! let quote = PremiumCalculator::default().quote(&RiskProfile {
//!     vehicle_type: Some(VehicleType::Suv),
//!     ..Default::default()
//! });
//! assert_eq!(quote.final_premium, dec!(600));
//! ```

pub mod aggregate;
pub mod application;
pub mod error;
pub mod plan;
pub mod premium;
pub mod renewal;

pub use aggregate::{IssuePolicy, Policy, PolicyPaymentStatus, PolicyStatus};
pub use application::{
    Application, ApplicationDetails, ApplicationStatus, HealthDetails, InsuranceKind, VehicleDetails,
};
pub use error::{PolicyError, RenewalError};
pub use plan::Plan;
pub use premium::{
    health_premium, CoverageType, PremiumBreakdown, PremiumCalculator, PremiumFactors, RiskProfile,
    VehicleType,
};
pub use renewal::{expiring_within, ExpiringPolicy, RenewalWindow};
