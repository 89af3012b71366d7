//! Insurance applications
//!
//! An application is the raw submission that precedes a policy. Vehicle and
//! health applications share one record with a tagged detail payload, so the
//! status workflow and numbering live in one place:
//!
//! ```text
//! pending -> approved   (only as a side effect of a recorded payment)
//!         \-> rejected
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::validation::{require_non_blank, require_within};
use core_kernel::{ApplicationId, FieldError, PlanId, SequenceKind, UserId};

use crate::error::PolicyError;
use crate::plan::Plan;
use crate::premium::{health_premium, CoverageType, RiskProfile, VehicleType};

/// Which line of business a record belongs to
///
/// Also serves as the claim family: a claim always has the kind of the policy
/// it is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceKind {
    Vehicle,
    Health,
}

impl InsuranceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceKind::Vehicle => "vehicle",
            InsuranceKind::Health => "health",
        }
    }

    pub fn application_sequence(&self) -> SequenceKind {
        match self {
            InsuranceKind::Vehicle => SequenceKind::VehicleApplication,
            InsuranceKind::Health => SequenceKind::HealthApplication,
        }
    }

    pub fn policy_sequence(&self) -> SequenceKind {
        match self {
            InsuranceKind::Vehicle => SequenceKind::VehiclePolicy,
            InsuranceKind::Health => SequenceKind::HealthPolicy,
        }
    }

    pub fn claim_sequence(&self) -> SequenceKind {
        match self {
            InsuranceKind::Vehicle => SequenceKind::VehicleClaim,
            InsuranceKind::Health => SequenceKind::HealthClaim,
        }
    }
}

impl fmt::Display for InsuranceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsuranceKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(InsuranceKind::Vehicle),
            "health" => Ok(InsuranceKind::Health),
            other => Err(FieldError::invalid("kind", format!("unknown insurance kind '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(FieldError::invalid("status", format!("unknown application status '{other}'"))),
        }
    }
}

/// Vehicle and driver facts submitted with a vehicle application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub driver_age: u32,
    pub driver_experience_years: u32,
    pub coverage_type: CoverageType,
    pub deductible: u32,
    #[serde(default)]
    pub document_names: Vec<String>,
}

impl VehicleDetails {
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldError> {
        require_non_blank("make", &self.make)?;
        require_non_blank("model", &self.model)?;
        require_non_blank("registration_number", &self.registration_number)?;
        require_within("year", self.year, 1900, today.year() + 1)?;
        require_within("driver_age", self.driver_age, 16, 100)?;
        require_within("driver_experience_years", self.driver_experience_years, 0, self.driver_age - 16)?;
        Ok(())
    }

    pub fn risk_profile(&self) -> RiskProfile {
        RiskProfile {
            vehicle_type: Some(self.vehicle_type),
            driver_age: Some(self.driver_age),
            driver_experience_years: Some(self.driver_experience_years),
            coverage_type: Some(self.coverage_type),
            deductible: Some(self.deductible),
        }
    }
}

/// Personal and medical facts submitted with a health application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDetails {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub pre_existing_conditions: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub document_names: Vec<String>,
}

impl HealthDetails {
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldError> {
        require_non_blank("full_name", &self.full_name)?;
        require_non_blank("phone", &self.phone)?;
        require_non_blank("address", &self.address)?;
        if self.date_of_birth > today {
            return Err(FieldError::new(
                "date_of_birth",
                core_kernel::ValidationCode::InvalidRange,
                "must not be in the future",
            ));
        }
        Ok(())
    }
}

/// Kind-specific payload of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplicationDetails {
    Vehicle(VehicleDetails),
    Health(HealthDetails),
}

impl ApplicationDetails {
    pub fn kind(&self) -> InsuranceKind {
        match self {
            ApplicationDetails::Vehicle(_) => InsuranceKind::Vehicle,
            ApplicationDetails::Health(_) => InsuranceKind::Health,
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldError> {
        match self {
            ApplicationDetails::Vehicle(details) => details.validate(today),
            ApplicationDetails::Health(details) => details.validate(today),
        }
    }
}

/// A submitted application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub application_number: String,
    pub user_id: UserId,
    pub details: ApplicationDetails,
    pub status: ApplicationStatus,
    pub selected_plan_id: Option<PlanId>,
    pub calculated_premium: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Creates a pending application after validating its details
    pub fn submit(
        user_id: UserId,
        application_number: String,
        details: ApplicationDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, PolicyError> {
        details.validate(now.date_naive())?;

        Ok(Self {
            id: ApplicationId::new_v7(),
            application_number,
            user_id,
            details,
            status: ApplicationStatus::Pending,
            selected_plan_id: None,
            calculated_premium: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn kind(&self) -> InsuranceKind {
        self.details.kind()
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Records the chosen plan and its premium on a health application
    pub fn select_plan(&mut self, plan: &Plan, now: DateTime<Utc>) -> Result<(), PolicyError> {
        if self.kind() != InsuranceKind::Health {
            return Err(PolicyError::KindMismatch {
                expected: InsuranceKind::Health.to_string(),
                actual: self.kind().to_string(),
            });
        }
        self.ensure_pending()?;
        if !plan.active {
            return Err(PolicyError::PlanInactive(plan.name.clone()));
        }

        self.selected_plan_id = Some(plan.id);
        self.calculated_premium = Some(health_premium(plan));
        self.updated_at = now;
        Ok(())
    }

    /// Marks the application approved once its payment has been recorded
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<(), PolicyError> {
        self.ensure_pending()?;
        self.status = ApplicationStatus::Approved;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_pending(&self) -> Result<(), PolicyError> {
        if !self.is_pending() {
            return Err(PolicyError::ApplicationNotPending {
                number: self.application_number.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}
