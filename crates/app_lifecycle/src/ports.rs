//! Storage port
//!
//! The single seam between the orchestrator and persistence. Adapters must
//! honour the guarantees the workflows rely on:
//!
//! - **Unique numbers**: inserting an application, policy or claim whose
//!   number already exists fails with [`PortError::Conflict`] and writes
//!   nothing. The orchestrator treats that as a sequencing collision and
//!   retries with a fresh number.
//! - **Atomic multi-record writes**: [`LifecycleStore::issue_policy`] and
//!   [`LifecycleStore::record_renewal_payment`] either apply every write or
//!   none of them.
//! - **Guarded updates**: writes that depend on a prior state fail with
//!   [`PortError::Conflict`] once that state has moved on. A plan selection
//!   only lands on a pending application and never touches its status. A
//!   renewal payment only lands while the term is still unpaid.
//!
//! List operations return records newest first.

use async_trait::async_trait;

use core_kernel::{
    ApplicationId, ClaimId, DomainPort, HealthCheckable, Page, PlanId, PolicyId, PortError, ReportId,
    SequenceKind, UserId,
};
use domain_billing::Payment;
use domain_claims::{Claim, ClaimStatus, Report};
use domain_policy::{Application, InsuranceKind, Plan, Policy, PolicyStatus};

/// Filter for policy listings; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyQuery {
    pub user_id: Option<UserId>,
    pub status: Option<PolicyStatus>,
    /// Unpaged when `None`
    pub page: Option<Page>,
}

impl PolicyQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paged(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn matches(&self, policy: &Policy) -> bool {
        self.user_id.map_or(true, |u| policy.user_id == u) && self.status.map_or(true, |s| policy.status == s)
    }
}

/// Filter for claim listings; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    pub user_id: Option<UserId>,
    pub status: Option<ClaimStatus>,
    pub family: Option<InsuranceKind>,
    /// Unpaged when `None`
    pub page: Option<Page>,
}

impl ClaimQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, claim: &Claim) -> bool {
        self.user_id.map_or(true, |u| claim.user_id == u)
            && self.status.map_or(true, |s| claim.status == s)
            && self.family.map_or(true, |f| claim.family() == f)
    }
}

/// Persistence operations needed by the lifecycle workflows
#[async_trait]
pub trait LifecycleStore: DomainPort + HealthCheckable {
    /// Every number of `kind` already issued under `prefix`
    async fn numbers_with_prefix(&self, kind: SequenceKind, prefix: &str) -> Result<Vec<String>, PortError>;

    // Applications

    async fn insert_application(&self, application: &Application) -> Result<(), PortError>;

    async fn get_application(&self, id: ApplicationId) -> Result<Application, PortError>;

    /// Stores plan selection and premium; conflicts unless the stored application is pending
    async fn update_application(&self, application: &Application) -> Result<(), PortError>;

    async fn list_applications(&self, user_id: Option<UserId>, page: Page) -> Result<Vec<Application>, PortError>;

    // Plans (read-only)

    async fn get_plan(&self, id: PlanId) -> Result<Plan, PortError>;

    async fn list_active_plans(&self) -> Result<Vec<Plan>, PortError>;

    // Policies

    /// Inserts the policy and its first payment and stores the approved
    /// application, all in one transaction
    ///
    /// Fails with `Conflict` if the policy number is taken or the stored
    /// application is no longer pending.
    async fn issue_policy(&self, policy: &Policy, payment: &Payment, application: &Application) -> Result<(), PortError>;

    async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError>;

    async fn update_policy(&self, policy: &Policy) -> Result<(), PortError>;

    async fn list_policies(&self, query: PolicyQuery) -> Result<Vec<Policy>, PortError>;

    /// Stores the paid policy and inserts the renewal payment in one transaction
    ///
    /// Conflicts if the stored policy has no payment due.
    async fn record_renewal_payment(&self, policy: &Policy, payment: &Payment) -> Result<(), PortError>;

    // Claims

    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError>;

    async fn list_claims(&self, query: ClaimQuery) -> Result<Vec<Claim>, PortError>;

    // Reports (append-only)

    async fn insert_report(&self, report: &Report) -> Result<(), PortError>;

    async fn get_report(&self, id: ReportId) -> Result<Report, PortError>;

    async fn list_reports(&self, user_id: UserId, page: Page) -> Result<Vec<Report>, PortError>;
}
