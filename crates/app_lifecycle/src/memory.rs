//! In-memory implementation of [`LifecycleStore`]
//!
//! All records live behind one lock, so every operation (including the
//! multi-record writes) is atomic. Used by tests and local demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    ApplicationId, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, Page, PlanId, PolicyId, PortError,
    ReportId, SequenceKind, UserId,
};
use domain_billing::Payment;
use domain_claims::{Claim, Report};
use domain_policy::{Application, Plan, Policy, PolicyPaymentStatus};

use crate::ports::{ClaimQuery, LifecycleStore, PolicyQuery};

#[derive(Debug, Default)]
struct State {
    applications: HashMap<ApplicationId, Application>,
    plans: HashMap<PlanId, Plan>,
    policies: HashMap<PolicyId, Policy>,
    claims: HashMap<ClaimId, Claim>,
    payments: Vec<Payment>,
    reports: HashMap<ReportId, Report>,
}

impl State {
    fn number_taken(&self, kind: SequenceKind, number: &str) -> bool {
        self.numbers(kind).any(|n| n == number)
    }

    fn numbers(&self, kind: SequenceKind) -> Box<dyn Iterator<Item = &str> + '_> {
        match kind {
            SequenceKind::VehicleApplication | SequenceKind::HealthApplication => {
                Box::new(self.applications.values().map(|a| a.application_number.as_str()))
            }
            SequenceKind::VehiclePolicy | SequenceKind::HealthPolicy => {
                Box::new(self.policies.values().map(|p| p.policy_number.as_str()))
            }
            SequenceKind::VehicleClaim | SequenceKind::HealthClaim => {
                Box::new(self.claims.values().map(|c| c.claim_number.as_str()))
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    stale_prefix_reads: Arc<AtomicU32>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_plans(plans: Vec<Plan>) -> Self {
        let store = Self::new();
        for plan in plans {
            store.seed_plan(plan).await;
        }
        store
    }

    /// Adds a plan to the catalog
    pub async fn seed_plan(&self, plan: Plan) {
        self.state.write().await.plans.insert(plan.id, plan);
    }

    /// Every payment recorded so far, oldest first
    pub async fn payments(&self) -> Vec<Payment> {
        self.state.read().await.payments.clone()
    }

    /// Makes the next `count` prefix scans return nothing, as if another
    /// writer had not yet committed; used to exercise collision retries
    pub fn simulate_stale_prefix_reads(&self, count: u32) {
        self.stale_prefix_reads.store(count, Ordering::SeqCst);
    }

    fn take_stale_read(&self) -> bool {
        self.stale_prefix_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

fn duplicate(kind: &str, number: &str) -> PortError {
    PortError::conflict(format!("{kind} number {number} already exists"))
}

fn no_longer_pending(application: &Application) -> PortError {
    PortError::conflict(format!(
        "application {} is no longer pending",
        application.application_number
    ))
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-store", 0)
    }
}

#[async_trait]
impl LifecycleStore for InMemoryStore {
    async fn numbers_with_prefix(&self, kind: SequenceKind, prefix: &str) -> Result<Vec<String>, PortError> {
        if self.take_stale_read() {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        Ok(state
            .numbers(kind)
            .filter(|n| n.starts_with(prefix))
            .map(str::to_string)
            .collect())
    }

    async fn insert_application(&self, application: &Application) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        if state.number_taken(application.kind().application_sequence(), &application.application_number) {
            return Err(duplicate("application", &application.application_number));
        }
        state.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn get_application(&self, id: ApplicationId) -> Result<Application, PortError> {
        self.state
            .read()
            .await
            .applications
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Application", id))
    }

    async fn update_application(&self, application: &Application) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let stored = state
            .applications
            .get_mut(&application.id)
            .ok_or_else(|| PortError::not_found("Application", application.id))?;
        if !stored.is_pending() {
            return Err(no_longer_pending(stored));
        }
        stored.selected_plan_id = application.selected_plan_id;
        stored.calculated_premium = application.calculated_premium;
        stored.updated_at = application.updated_at;
        Ok(())
    }

    async fn list_applications(&self, user_id: Option<UserId>, page: Page) -> Result<Vec<Application>, PortError> {
        let state = self.state.read().await;
        let matching: Vec<Application> = state
            .applications
            .values()
            .filter(|a| user_id.map_or(true, |u| a.user_id == u))
            .cloned()
            .collect();
        Ok(page.slice(newest_first(matching, |a: &Application| (a.created_at, a.id))))
    }

    async fn get_plan(&self, id: PlanId) -> Result<Plan, PortError> {
        self.state
            .read()
            .await
            .plans
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Plan", id))
    }

    async fn list_active_plans(&self) -> Result<Vec<Plan>, PortError> {
        let state = self.state.read().await;
        let mut plans: Vec<Plan> = state.plans.values().filter(|p| p.active).cloned().collect();
        plans.sort_by(|a, b| a.monthly_premium_base.cmp(&b.monthly_premium_base).then_with(|| a.name.cmp(&b.name)));
        Ok(plans)
    }

    async fn issue_policy(&self, policy: &Policy, payment: &Payment, application: &Application) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        if state.number_taken(policy.kind.policy_sequence(), &policy.policy_number) {
            return Err(duplicate("policy", &policy.policy_number));
        }
        let stored = state
            .applications
            .get(&application.id)
            .ok_or_else(|| PortError::not_found("Application", application.id))?;
        if !stored.is_pending() {
            return Err(no_longer_pending(stored));
        }

        state.applications.insert(application.id, application.clone());
        state.policies.insert(policy.id, policy.clone());
        state.payments.push(payment.clone());
        Ok(())
    }

    async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError> {
        self.state
            .read()
            .await
            .policies
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Policy", id))
    }

    async fn update_policy(&self, policy: &Policy) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let stored = state
            .policies
            .get_mut(&policy.id)
            .ok_or_else(|| PortError::not_found("Policy", policy.id))?;
        *stored = policy.clone();
        Ok(())
    }

    async fn list_policies(&self, query: PolicyQuery) -> Result<Vec<Policy>, PortError> {
        let state = self.state.read().await;
        let matching: Vec<Policy> = state.policies.values().filter(|p| query.matches(p)).cloned().collect();
        let ordered = newest_first(matching, |p: &Policy| (p.created_at, p.id));
        Ok(match query.page {
            Some(page) => page.slice(ordered),
            None => ordered,
        })
    }

    async fn record_renewal_payment(&self, policy: &Policy, payment: &Payment) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let stored = state
            .policies
            .get_mut(&policy.id)
            .ok_or_else(|| PortError::not_found("Policy", policy.id))?;
        if stored.payment_status != PolicyPaymentStatus::Pending {
            return Err(PortError::conflict(format!(
                "policy {} has no payment due",
                stored.policy_number
            )));
        }
        *stored = policy.clone();
        state.payments.push(payment.clone());
        Ok(())
    }

    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        if state.number_taken(claim.family().claim_sequence(), &claim.claim_number) {
            return Err(duplicate("claim", &claim.claim_number));
        }
        state.claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        self.state
            .read()
            .await
            .claims
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let stored = state
            .claims
            .get_mut(&claim.id)
            .ok_or_else(|| PortError::not_found("Claim", claim.id))?;
        *stored = claim.clone();
        Ok(())
    }

    async fn list_claims(&self, query: ClaimQuery) -> Result<Vec<Claim>, PortError> {
        let state = self.state.read().await;
        let matching: Vec<Claim> = state.claims.values().filter(|c| query.matches(c)).cloned().collect();
        let ordered = newest_first(matching, |c: &Claim| (c.created_at, c.id));
        Ok(match query.page {
            Some(page) => page.slice(ordered),
            None => ordered,
        })
    }

    async fn insert_report(&self, report: &Report) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        if state.reports.contains_key(&report.id) {
            return Err(PortError::conflict(format!("report {} already exists", report.id)));
        }
        state.reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn get_report(&self, id: ReportId) -> Result<Report, PortError> {
        self.state
            .read()
            .await
            .reports
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Report", id))
    }

    async fn list_reports(&self, user_id: UserId, page: Page) -> Result<Vec<Report>, PortError> {
        let state = self.state.read().await;
        let matching: Vec<Report> = state.reports.values().filter(|r| r.user_id == user_id).cloned().collect();
        Ok(page.slice(newest_first(matching, |r: &Report| (r.generated_at, r.id))))
    }
}
