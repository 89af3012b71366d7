//! Policy Aggregate Root
//!
//! A policy is the contract issued once an application has been paid for.
//! Users never edit it directly; it changes only through issuance, renewal,
//! renewal payment, cancellation and expiry.
//!
//! # Invariants
//!
//! - `end_date >= start_date`, and renewal only ever moves `end_date` forward
//! - State transitions follow the lifecycle below
//!
//! ```text
//! pending -> active -> expired
//!       \         \-> cancelled
//!        \-> cancelled
//! ```

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::temporal::add_calendar_years;
use core_kernel::{ApplicationId, FieldError, PlanId, PolicyId, UserId};

use crate::application::{Application, InsuranceKind};
use crate::error::PolicyError;

/// Policy lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Active => "active",
            PolicyStatus::Expired => "expired",
            PolicyStatus::Cancelled => "cancelled",
        }
    }

    /// Checks if the lifecycle allows moving to `target`
    pub fn can_transition_to(&self, target: PolicyStatus) -> bool {
        use PolicyStatus::*;
        matches!(
            (self, target),
            (Pending, Active) | (Pending, Cancelled) | (Active, Expired) | (Active, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PolicyStatus::Expired | PolicyStatus::Cancelled)
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PolicyStatus::Pending),
            "active" => Ok(PolicyStatus::Active),
            "expired" => Ok(PolicyStatus::Expired),
            "cancelled" => Ok(PolicyStatus::Cancelled),
            other => Err(FieldError::invalid("status", format!("unknown policy status '{other}'"))),
        }
    }
}

/// Whether the premium for the current term has been received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPaymentStatus {
    Pending,
    Paid,
}

impl PolicyPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyPaymentStatus::Pending => "pending",
            PolicyPaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PolicyPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyPaymentStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PolicyPaymentStatus::Pending),
            "paid" => Ok(PolicyPaymentStatus::Paid),
            other => Err(FieldError::invalid("payment_status", format!("unknown payment status '{other}'"))),
        }
    }
}

/// The Policy aggregate root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    /// Human-readable policy number, e.g. `HP-20250314-0002`
    pub policy_number: String,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    /// Selected health plan; `None` for vehicle policies
    pub plan_id: Option<PlanId>,
    pub kind: InsuranceKind,
    /// Premium charged per term
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Date the next term begins if renewed
    pub renewal_date: DateTime<Utc>,
    pub status: PolicyStatus,
    pub payment_status: PolicyPaymentStatus,
    pub renewal_reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for issuing a policy from a paid application
#[derive(Debug, Clone)]
pub struct IssuePolicy<'a> {
    pub policy_number: String,
    pub application: &'a Application,
    pub premium: Decimal,
    pub term_years: u32,
    pub now: DateTime<Utc>,
}

impl Policy {
    /// Issues an active, paid policy whose term starts now
    ///
    /// # Errors
    ///
    /// Returns `ApplicationNotPending` if the application was already
    /// processed.
    pub fn issue(request: IssuePolicy<'_>) -> Result<Self, PolicyError> {
        let application = request.application;
        application.ensure_pending()?;

        let start_date = request.now;
        let end_date = add_calendar_years(start_date, request.term_years)?;

        Ok(Self {
            id: PolicyId::new_v7(),
            policy_number: request.policy_number,
            user_id: application.user_id,
            application_id: application.id,
            plan_id: application.selected_plan_id,
            kind: application.kind(),
            premium: request.premium,
            start_date,
            end_date,
            renewal_date: end_date,
            status: PolicyStatus::Active,
            payment_status: PolicyPaymentStatus::Paid,
            renewal_reminder_sent: false,
            created_at: request.now,
            updated_at: request.now,
        })
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Moves the policy to `target` if the lifecycle allows it
    pub fn transition_to(&mut self, target: PolicyStatus, now: DateTime<Utc>) -> Result<(), PolicyError> {
        if !self.status.can_transition_to(target) {
            return Err(PolicyError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), PolicyError> {
        self.transition_to(PolicyStatus::Cancelled, now)
    }

    /// Expires an active policy once `grace` has passed since its end date;
    /// returns whether it changed
    pub fn expire_if_lapsed(&mut self, now: DateTime<Utc>, grace: Duration) -> Result<bool, PolicyError> {
        if self.status == PolicyStatus::Active && self.end_date + grace < now {
            self.transition_to(PolicyStatus::Expired, now)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Records the premium for the current term as received
    pub fn mark_paid(&mut self, now: DateTime<Utc>) {
        self.payment_status = PolicyPaymentStatus::Paid;
        self.updated_at = now;
    }
}
