//! Claim review workflow
//!
//! Administrators move claims between statuses by submitting a
//! [`ClaimReview`]. Any review status may be reached from any current status
//! in one step; what is enforced is that each target carries the fields it
//! needs and that the amount and reason fields stay consistent with it:
//!
//! | target         | approved_amount              | rejection_reason |
//! |----------------|------------------------------|------------------|
//! | `under_review` | cleared                      | cleared          |
//! | `approved`     | required, from the request   | cleared          |
//! | `rejected`     | cleared                      | required         |
//! | `paid`         | request, else existing       | cleared          |
//!
//! `reviewed_at` is stamped on the first review and never moved afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::money::round_amount;
use core_kernel::validation::{require_non_blank, require_non_negative};
use core_kernel::UserId;

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;

/// An administrator's requested change to a claim
///
/// `status` is kept as the raw requested string so an unknown value can be
/// reported as such. Fields not listed here are ignored on deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReview {
    pub status: String,
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ClaimReview {
    pub fn to(status: ClaimStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn with_approved_amount(mut self, amount: Decimal) -> Self {
        self.approved_amount = Some(amount);
        self
    }

    pub fn with_rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }

    pub fn with_admin_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }
}

/// Applies a review to `current`, returning the updated claim
///
/// The input claim is never modified; on error nothing has changed.
pub fn apply(
    current: &Claim,
    review: &ClaimReview,
    reviewer: UserId,
    now: DateTime<Utc>,
) -> Result<Claim, ClaimError> {
    let target: ClaimStatus = review.status.parse()?;
    if !target.is_review_status() {
        return Err(ClaimError::InvalidTransition {
            from: current.status.to_string(),
            to: target.to_string(),
        });
    }

    let mut next = current.clone();
    match target {
        ClaimStatus::Approved => {
            let amount = review.approved_amount.ok_or_else(|| missing("approved_amount", target))?;
            require_non_negative("approved_amount", amount)?;
            next.approved_amount = Some(round_amount(amount));
            next.rejection_reason = None;
        }
        ClaimStatus::Paid => {
            let amount = review
                .approved_amount
                .or(current.approved_amount)
                .ok_or_else(|| missing("approved_amount", target))?;
            require_non_negative("approved_amount", amount)?;
            next.approved_amount = Some(round_amount(amount));
            next.rejection_reason = None;
        }
        ClaimStatus::Rejected => {
            let reason = review
                .rejection_reason
                .as_deref()
                .ok_or_else(|| missing("rejection_reason", target))?;
            require_non_blank("rejection_reason", reason)?;
            next.rejection_reason = Some(reason.trim().to_string());
            next.approved_amount = None;
        }
        ClaimStatus::UnderReview | ClaimStatus::Submitted => {
            next.approved_amount = None;
            next.rejection_reason = None;
        }
    }

    if let Some(notes) = &review.admin_notes {
        next.admin_notes = Some(notes.clone());
    }
    next.reviewed_at = current.reviewed_at.or(review.reviewed_at).or(Some(now));
    next.reviewed_by = Some(reviewer);
    next.status = target;
    next.updated_at = now;

    debug!(
        claim_number = %current.claim_number,
        from = %current.status,
        to = %target,
        "claim review applied"
    );
    Ok(next)
}

fn missing(field: &str, target: ClaimStatus) -> ClaimError {
    ClaimError::MissingRequiredField {
        field: field.to_string(),
        target: target.to_string(),
    }
}
