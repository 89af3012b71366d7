//! PostgreSQL lifecycle store
//!
//! Implements the [`LifecycleStore`] port on top of the repositories in this
//! crate. Unique number violations and failed conditional writes both come
//! back as `PortError::Conflict`, which the orchestrator answers by retrying
//! with a fresh number or re-reading the record.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresLifecycleStore};
//! use app_lifecycle::{LifecycleConfig, LifecycleService};
//! use std::sync::Arc;
//!
//! let pool = create_pool(&DatabaseConfig::new(url)).await?;
//! let store = Arc::new(PostgresLifecycleStore::new(pool));
//! let service = LifecycleService::new(store, LifecycleConfig::default())?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use app_lifecycle::{ClaimQuery, LifecycleStore, PolicyQuery};
use core_kernel::{
    ApplicationId, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, Page, PlanId, PolicyId, PortError,
    ReportId, SequenceKind, UserId,
};
use domain_billing::Payment;
use domain_claims::{Claim, Report};
use domain_policy::{Application, Plan, Policy};

use crate::repositories::claims::ClaimFilter;
use crate::repositories::{
    ApplicationRepository, ClaimsRepository, PlanRepository, PolicyRepository, ReportRepository,
};

const ADAPTER_ID: &str = "postgres-lifecycle-store";

/// PostgreSQL-backed implementation of the LifecycleStore port
#[derive(Debug, Clone)]
pub struct PostgresLifecycleStore {
    applications: ApplicationRepository,
    plans: PlanRepository,
    policies: PolicyRepository,
    claims: ClaimsRepository,
    reports: ReportRepository,
    pool: PgPool,
}

impl PostgresLifecycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            applications: ApplicationRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            policies: PolicyRepository::new(pool.clone()),
            claims: ClaimsRepository::new(pool.clone()),
            reports: ReportRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PostgresLifecycleStore {}

#[async_trait]
impl HealthCheckable for PostgresLifecycleStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {e}")),
        }
    }
}

#[async_trait]
impl LifecycleStore for PostgresLifecycleStore {
    #[instrument(skip(self))]
    async fn numbers_with_prefix(&self, kind: SequenceKind, prefix: &str) -> Result<Vec<String>, PortError> {
        let numbers = match kind {
            SequenceKind::VehicleApplication | SequenceKind::HealthApplication => {
                self.applications.numbers_with_prefix(prefix).await?
            }
            SequenceKind::VehiclePolicy | SequenceKind::HealthPolicy => {
                self.policies.numbers_with_prefix(prefix).await?
            }
            SequenceKind::VehicleClaim | SequenceKind::HealthClaim => self.claims.numbers_with_prefix(prefix).await?,
        };
        debug!(count = numbers.len(), "scanned existing numbers");
        Ok(numbers)
    }

    #[instrument(skip(self, application), fields(number = %application.application_number))]
    async fn insert_application(&self, application: &Application) -> Result<(), PortError> {
        Ok(self.applications.insert(application).await?)
    }

    async fn get_application(&self, id: ApplicationId) -> Result<Application, PortError> {
        Ok(self.applications.get_by_id(id).await?)
    }

    async fn update_application(&self, application: &Application) -> Result<(), PortError> {
        Ok(self.applications.update(application).await?)
    }

    async fn list_applications(&self, user_id: Option<UserId>, page: Page) -> Result<Vec<Application>, PortError> {
        Ok(self.applications.list(user_id, page).await?)
    }

    async fn get_plan(&self, id: PlanId) -> Result<Plan, PortError> {
        Ok(self.plans.get_by_id(id).await?)
    }

    async fn list_active_plans(&self) -> Result<Vec<Plan>, PortError> {
        Ok(self.plans.list_active().await?)
    }

    #[instrument(skip(self, policy, payment, application), fields(number = %policy.policy_number))]
    async fn issue_policy(&self, policy: &Policy, payment: &Payment, application: &Application) -> Result<(), PortError> {
        Ok(self.policies.issue(policy, payment, application).await?)
    }

    async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError> {
        Ok(self.policies.get_by_id(id).await?)
    }

    async fn update_policy(&self, policy: &Policy) -> Result<(), PortError> {
        Ok(self.policies.update(policy).await?)
    }

    async fn list_policies(&self, query: PolicyQuery) -> Result<Vec<Policy>, PortError> {
        Ok(self.policies.list(query.user_id, query.status, query.page).await?)
    }

    #[instrument(skip(self, policy, payment), fields(number = %policy.policy_number))]
    async fn record_renewal_payment(&self, policy: &Policy, payment: &Payment) -> Result<(), PortError> {
        Ok(self.policies.record_renewal_payment(policy, payment).await?)
    }

    #[instrument(skip(self, claim), fields(number = %claim.claim_number))]
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        Ok(self.claims.insert(claim).await?)
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        Ok(self.claims.get_by_id(id).await?)
    }

    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
        Ok(self.claims.update_review(claim).await?)
    }

    async fn list_claims(&self, query: ClaimQuery) -> Result<Vec<Claim>, PortError> {
        let filter = ClaimFilter {
            user_id: query.user_id,
            status: query.status,
            family: query.family,
            page: query.page,
        };
        Ok(self.claims.list(filter).await?)
    }

    async fn insert_report(&self, report: &Report) -> Result<(), PortError> {
        Ok(self.reports.insert(report).await?)
    }

    async fn get_report(&self, id: ReportId) -> Result<Report, PortError> {
        Ok(self.reports.get_by_id(id).await?)
    }

    async fn list_reports(&self, user_id: UserId, page: Page) -> Result<Vec<Report>, PortError> {
        Ok(self.reports.list_for_user(user_id, page).await?)
    }
}
