//! Test Data Builders
//!
//! Builders go through the real domain constructors (`Application::submit`,
//! `Policy::issue`, `Claim::file`) so built records satisfy the same
//! invariants as production ones; setters then override just the fields a
//! test cares about.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{PlanId, PolicyId, UserId};
use domain_claims::{Claim, ClaimDetails, ClaimStatus, FileClaim};
use domain_policy::{Application, ApplicationDetails, ApplicationStatus, IssuePolicy, Policy, PolicyStatus};

use crate::fixtures::{DetailFixtures, TemporalFixtures};

/// Builder for applications
pub struct TestApplicationBuilder {
    number: String,
    user_id: UserId,
    details: ApplicationDetails,
    status: ApplicationStatus,
    plan: Option<(PlanId, Decimal)>,
    now: DateTime<Utc>,
}

impl Default for TestApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApplicationBuilder {
    /// A pending vehicle application for a fresh user
    pub fn new() -> Self {
        Self {
            number: "VEH-20250314-0001".to_string(),
            user_id: UserId::new(),
            details: DetailFixtures::vehicle_application(),
            status: ApplicationStatus::Pending,
            plan: None,
            now: TemporalFixtures::now(),
        }
    }

    /// A pending health application for a fresh user
    pub fn health() -> Self {
        Self {
            number: "HLT-20250314-0001".to_string(),
            details: DetailFixtures::health_application(),
            ..Self::new()
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    /// Records a selected plan and its premium without the plan-kind checks
    pub fn with_plan(mut self, plan_id: PlanId, premium: Decimal) -> Self {
        self.plan = Some((plan_id, premium));
        self
    }

    pub fn build(self) -> Application {
        let mut application = Application::submit(self.user_id, self.number, self.details, self.now)
            .expect("builder details should be valid");
        application.status = self.status;
        if let Some((plan_id, premium)) = self.plan {
            application.selected_plan_id = Some(plan_id);
            application.calculated_premium = Some(premium);
        }
        application
    }
}

/// Builder for policies
pub struct TestPolicyBuilder {
    number: String,
    application: Application,
    premium: Decimal,
    now: DateTime<Utc>,
    status: Option<PolicyStatus>,
    end_date: Option<DateTime<Utc>>,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    /// An active, paid one-year vehicle policy starting at the fixture instant
    pub fn new() -> Self {
        Self {
            number: "VP-20250314-0001".to_string(),
            application: TestApplicationBuilder::new().build(),
            premium: DetailFixtures::sedan_premium(),
            now: TemporalFixtures::now(),
            status: None,
            end_date: None,
        }
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Moves the end and renewal dates to `days` from the start
    pub fn ending_in_days(mut self, days: i64) -> Self {
        self.end_date = Some(self.now + Duration::days(days));
        self
    }

    pub fn build(self) -> Policy {
        let mut policy = Policy::issue(IssuePolicy {
            policy_number: self.number,
            application: &self.application,
            premium: self.premium,
            term_years: 1,
            now: self.now,
        })
        .expect("builder application should be pending");

        if let Some(status) = self.status {
            policy.status = status;
        }
        if let Some(end_date) = self.end_date {
            policy.end_date = end_date;
            policy.renewal_date = end_date;
        }
        policy
    }
}

/// Builder for claims
pub struct TestClaimBuilder {
    number: String,
    policy_id: PolicyId,
    user_id: UserId,
    details: ClaimDetails,
    amount: Decimal,
    status: ClaimStatus,
    approved_amount: Option<Decimal>,
    now: DateTime<Utc>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// A submitted vehicle claim for 1000
    pub fn new() -> Self {
        Self {
            number: "CLM-2025-001".to_string(),
            policy_id: PolicyId::new(),
            user_id: UserId::new(),
            details: DetailFixtures::collision(),
            amount: dec!(1000),
            status: ClaimStatus::Submitted,
            approved_amount: None,
            now: TemporalFixtures::now(),
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_details(mut self, details: ClaimDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Marks the claim approved for `amount`
    pub fn approved(mut self, amount: Decimal) -> Self {
        self.status = ClaimStatus::Approved;
        self.approved_amount = Some(amount);
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Files the claim at `now`; details dated after it fail validation
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build(self) -> Claim {
        let mut claim = Claim::file(FileClaim {
            claim_number: self.number,
            policy_id: self.policy_id,
            user_id: self.user_id,
            details: self.details,
            claim_amount: self.amount,
            now: self.now,
        })
        .expect("builder claim should be valid");

        if claim.status != self.status {
            claim.status = self.status;
            claim.reviewed_at = Some(self.now);
        }
        claim.approved_amount = self.approved_amount;
        claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::InsuranceKind;

    #[test]
    fn test_policy_builder_defaults() {
        let policy = TestPolicyBuilder::new().build();
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.end_date, TemporalFixtures::one_year_later());
        assert_eq!(policy.premium, dec!(702));
    }

    #[test]
    fn test_health_application_with_plan() {
        let plan_id = PlanId::new();
        let application = TestApplicationBuilder::health()
            .with_number("HLT-20250314-0002")
            .with_plan(plan_id, dec!(249.99))
            .build();

        assert_eq!(application.kind(), InsuranceKind::Health);
        assert_eq!(application.selected_plan_id, Some(plan_id));
        assert_eq!(application.status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_approved_claim() {
        let claim = TestClaimBuilder::new().approved(dec!(900)).build();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.approved_amount, Some(dec!(900)));
        assert!(claim.reviewed_at.is_some());
    }
}
