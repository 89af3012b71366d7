//! Claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::money::round_amount;
use core_kernel::validation::{require_non_blank, require_positive};
use core_kernel::{ClaimId, FieldError, PolicyId, UserId, ValidationCode};
use domain_policy::InsuranceKind;

use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Filed by the policyholder, not yet looked at
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    /// Settled; carries the approved amount forward
    Paid,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::UnderReview => "under_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Paid => "paid",
        }
    }

    /// Statuses an administrator may move a claim into
    pub fn is_review_status(&self) -> bool {
        !matches!(self, ClaimStatus::Submitted)
    }

    /// Statuses that count towards the approved total
    pub fn is_approved(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Paid)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::UnderReview)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ClaimStatus::Submitted),
            "under_review" => Ok(ClaimStatus::UnderReview),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            "paid" => Ok(ClaimStatus::Paid),
            other => Err(ClaimError::InvalidStatus(other.to_string())),
        }
    }
}

/// Facts of a vehicle incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleIncident {
    pub incident_date: NaiveDate,
    pub location: String,
    pub description: String,
    pub police_report_number: Option<String>,
    #[serde(default)]
    pub document_names: Vec<String>,
}

/// Facts of a medical treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTreatment {
    pub treatment_date: NaiveDate,
    pub hospital_name: String,
    pub diagnosis: String,
    pub treatment_description: Option<String>,
    #[serde(default)]
    pub document_names: Vec<String>,
}

/// Family-specific payload of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ClaimDetails {
    Vehicle(VehicleIncident),
    Health(HealthTreatment),
}

impl ClaimDetails {
    pub fn family(&self) -> InsuranceKind {
        match self {
            ClaimDetails::Vehicle(_) => InsuranceKind::Vehicle,
            ClaimDetails::Health(_) => InsuranceKind::Health,
        }
    }

    /// Date a report range is matched against
    pub fn relevant_date(&self) -> NaiveDate {
        match self {
            ClaimDetails::Vehicle(incident) => incident.incident_date,
            ClaimDetails::Health(treatment) => treatment.treatment_date,
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldError> {
        match self {
            ClaimDetails::Vehicle(incident) => {
                require_non_blank("location", &incident.location)?;
                require_non_blank("description", &incident.description)?;
            }
            ClaimDetails::Health(treatment) => {
                require_non_blank("hospital_name", &treatment.hospital_name)?;
                require_non_blank("diagnosis", &treatment.diagnosis)?;
            }
        }
        if self.relevant_date() > today {
            let field = match self {
                ClaimDetails::Vehicle(_) => "incident_date",
                ClaimDetails::Health(_) => "treatment_date",
            };
            return Err(FieldError::new(field, ValidationCode::InvalidRange, "must not be in the future"));
        }
        Ok(())
    }
}

/// A claim against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    /// e.g. `HCL-2025-007`
    pub claim_number: String,
    pub policy_id: PolicyId,
    pub user_id: UserId,
    pub details: ClaimDetails,
    /// Estimated repair cost or billed treatment amount
    pub claim_amount: Decimal,
    pub status: ClaimStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub approved_amount: Option<Decimal>,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for filing a claim
#[derive(Debug, Clone)]
pub struct FileClaim {
    pub claim_number: String,
    pub policy_id: PolicyId,
    pub user_id: UserId,
    pub details: ClaimDetails,
    pub claim_amount: Decimal,
    pub now: DateTime<Utc>,
}

impl Claim {
    /// Files a new claim in `submitted` status
    ///
    /// Ownership and policy status are checked by the caller, which has the
    /// policy at hand; this only validates the claim's own fields.
    pub fn file(request: FileClaim) -> Result<Self, ClaimError> {
        require_positive("claim_amount", request.claim_amount)?;
        request.details.validate(request.now.date_naive())?;

        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number: request.claim_number,
            policy_id: request.policy_id,
            user_id: request.user_id,
            details: request.details,
            claim_amount: round_amount(request.claim_amount),
            status: ClaimStatus::Submitted,
            reviewed_at: None,
            reviewed_by: None,
            approved_amount: None,
            rejection_reason: None,
            admin_notes: None,
            created_at: request.now,
            updated_at: request.now,
        })
    }

    pub fn family(&self) -> InsuranceKind {
        self.details.family()
    }

    pub fn relevant_date(&self) -> NaiveDate {
        self.details.relevant_date()
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
