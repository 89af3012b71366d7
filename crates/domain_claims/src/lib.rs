//! Claims Domain
//!
//! This crate implements the claims side of the lifecycle engine: filing a
//! claim against a policy, the administrator review workflow, and the
//! aggregation of claims into persisted reports.
//!
//! Vehicle and health claims share one [`Claim`] record with a tagged
//! [`ClaimDetails`] payload; the payload's family always matches the kind of
//! the policy the claim was filed against.
//!
//! # Claim Lifecycle
//!
//! ```text
//! submitted -> under_review -> approved -> paid
//!                          \-> rejected
//! ```
//!
//! An administrator may move a claim directly to any review status in one
//! step; see [`workflow`] for the field rules enforced on each target.

pub mod claim;
pub mod error;
pub mod report;
pub mod workflow;

pub use claim::{Claim, ClaimDetails, ClaimStatus, FileClaim, HealthTreatment, VehicleIncident};
pub use error::ClaimError;
pub use report::{aggregate, Report, ReportSummary};
pub use workflow::ClaimReview;
