//! Core Kernel - Foundational types for the policy and claims lifecycle engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for persisted records
//! - Human-readable sequential numbers (application, policy, claim numbers)
//! - Amount rounding and calendar arithmetic
//! - Field validators and the port error type used by storage adapters

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;
pub mod sequence;
pub mod temporal;
pub mod validation;

pub use error::CoreError;
pub use identifiers::{ApplicationId, ClaimId, PaymentId, PlanId, PolicyId, ReportId, UserId};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, Page, PortError};
pub use sequence::{SequenceError, SequenceKind};
pub use temporal::{DateRange, TemporalError, Timezone};
pub use validation::{FieldError, ValidationCode};
