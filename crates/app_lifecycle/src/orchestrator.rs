//! Lifecycle Orchestrator
//!
//! [`LifecycleService`] wires the pure domain rules to storage. Each public
//! method is one workflow step; every check runs before the first write, so
//! a rejected request leaves nothing behind.
//!
//! # Numbering
//!
//! Application, policy and claim numbers are allocated by reading the
//! numbers already issued under the current prefix bucket and taking the
//! next one. The store rejects a duplicate number, in which case the whole
//! step is retried with a fresh read, up to `sequence_max_attempts` times.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use core_kernel::sequence;
use core_kernel::validation::require_positive;
use core_kernel::{
    ApplicationId, ClaimId, DateRange, HealthCheckResult, Page, PlanId, PolicyId, PortError, ReportId, SequenceKind,
    UserId, ValidationCode,
};
use domain_billing::{Payment, PaymentMethod, PaymentPurpose, RecordPayment};
use domain_claims::workflow::{self, ClaimReview};
use domain_claims::{Claim, ClaimDetails, FileClaim, Report};
use domain_policy::{
    Application, ApplicationDetails, ExpiringPolicy, InsuranceKind, IssuePolicy, Plan, Policy, PolicyPaymentStatus,
    PolicyStatus, PremiumBreakdown, PremiumCalculator, RenewalWindow, RiskProfile,
};

use crate::caller::Caller;
use crate::clock::{Clock, SystemClock};
use crate::config::LifecycleConfig;
use crate::error::{ConflictCode, LifecycleError};
use crate::ports::{ClaimQuery, LifecycleStore, PolicyQuery};

type Result<T> = std::result::Result<T, LifecycleError>;

/// Result of paying for an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuance {
    pub policy: Policy,
    pub payment: Payment,
    pub application: Application,
}

/// Result of paying for a renewed term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalPayment {
    pub policy: Policy,
    pub payment: Payment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileClaimRequest {
    pub policy_id: PolicyId,
    pub details: ClaimDetails,
    pub claim_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub family: Option<InsuranceKind>,
}

/// The lifecycle engine
pub struct LifecycleService {
    store: Arc<dyn LifecycleStore>,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
    calculator: PremiumCalculator,
    renewal: RenewalWindow,
}

impl LifecycleService {
    /// Creates a service using the system clock
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configuration is inconsistent.
    pub fn new(store: Arc<dyn LifecycleStore>, config: LifecycleConfig) -> Result<Self> {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    pub fn with_clock(store: Arc<dyn LifecycleStore>, clock: Arc<dyn Clock>, config: LifecycleConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| LifecycleError::validation("config", ValidationCode::InvalidValue, e.to_string()))?;

        Ok(Self {
            calculator: PremiumCalculator::new(config.base_premium),
            renewal: RenewalWindow::new(config.renewal_window_days),
            store,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub async fn health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    // ------------------------------------------------------------------
    // Apply
    // ------------------------------------------------------------------

    #[instrument(skip(self, details), fields(user_id = %caller.user_id, kind = %details.kind()))]
    pub async fn submit_application(&self, caller: &Caller, details: ApplicationDetails) -> Result<Application> {
        let now = self.clock.now();
        details.validate(now.date_naive())?;

        let user_id = caller.user_id;
        let kind = details.kind();
        let application = self
            .with_next_number(kind.application_sequence(), now, move |number| {
                let details = details.clone();
                async move {
                    let application = Application::submit(user_id, number, details, now)?;
                    self.store.insert_application(&application).await?;
                    Ok::<_, LifecycleError>(application)
                }
            })
            .await?;

        info!(application_number = %application.application_number, "application submitted");
        Ok(application)
    }

    pub async fn get_application(&self, caller: &Caller, id: ApplicationId) -> Result<Application> {
        let application = self.store.get_application(id).await?;
        ensure_can_read(caller, application.user_id, "application")?;
        Ok(application)
    }

    /// Lists the caller's applications; admins see everyone's
    pub async fn list_applications(&self, caller: &Caller, page: Page) -> Result<Vec<Application>> {
        let scope = if caller.is_admin() { None } else { Some(caller.user_id) };
        Ok(self.store.list_applications(scope, page).await?)
    }

    // ------------------------------------------------------------------
    // Quote
    // ------------------------------------------------------------------

    /// Quotes a vehicle premium without touching storage
    pub fn quote_premium(&self, profile: &RiskProfile) -> PremiumBreakdown {
        self.calculator.quote(profile)
    }

    /// Quotes the premium for a stored vehicle application
    pub async fn quote_application(&self, caller: &Caller, id: ApplicationId) -> Result<PremiumBreakdown> {
        let application = self.get_application(caller, id).await?;
        match &application.details {
            ApplicationDetails::Vehicle(details) => Ok(self.calculator.quote(&details.risk_profile())),
            ApplicationDetails::Health(_) => Err(LifecycleError::validation(
                "kind",
                ValidationCode::InvalidValue,
                "health applications are priced by selecting a plan",
            )),
        }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.store.list_active_plans().await?)
    }

    /// Records the chosen plan and its premium on a health application
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn select_plan(&self, caller: &Caller, id: ApplicationId, plan_id: PlanId) -> Result<Application> {
        let mut application = self.store.get_application(id).await?;
        ensure_owner(caller, application.user_id, "application")?;
        let plan = self.store.get_plan(plan_id).await?;

        application.select_plan(&plan, self.clock.now())?;
        // Only lands while the stored application is still pending
        self.store
            .update_application(&application)
            .await
            .map_err(|err| {
                already_processed(err, format!("application {} is no longer pending", application.application_number))
            })?;

        info!(
            application_number = %application.application_number,
            plan = %plan.name,
            "plan selected"
        );
        Ok(application)
    }

    // ------------------------------------------------------------------
    // Pay & Issue
    // ------------------------------------------------------------------

    /// Records the first payment for an application and issues its policy
    ///
    /// The policy, the payment and the application's approval are written in
    /// one store transaction.
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn record_payment(
        &self,
        caller: &Caller,
        application_id: ApplicationId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Issuance> {
        let application = self.store.get_application(application_id).await?;
        ensure_owner(caller, application.user_id, "application")?;
        application.ensure_pending()?;
        domain_billing::verify_amount(self.premium_due(&application)?, amount, self.config.payment_tolerance)?;

        let now = self.clock.now();
        let kind = application.kind();
        let issuance = self
            .with_next_number(kind.policy_sequence(), now, move |number| async move {
                // Re-read so a payment that raced us shows up as already processed
                // and the premium matches the plan stored right now.
                let mut application = self.store.get_application(application_id).await?;
                application.ensure_pending()?;
                let premium = self.premium_due(&application)?;
                domain_billing::verify_amount(premium, amount, self.config.payment_tolerance)?;
                let policy = Policy::issue(IssuePolicy {
                    policy_number: number,
                    application: &application,
                    premium,
                    term_years: self.config.policy_term_years,
                    now,
                })?;
                let payment = Payment::record(RecordPayment {
                    user_id: application.user_id,
                    application_id: application.id,
                    policy_id: policy.id,
                    expected: premium,
                    tendered: amount,
                    method,
                    purpose: PaymentPurpose::Issuance,
                    tolerance: self.config.payment_tolerance,
                    now,
                })?;
                application.approve(now)?;

                self.store.issue_policy(&policy, &payment, &application).await?;
                Ok::<_, LifecycleError>(Issuance {
                    policy,
                    payment,
                    application,
                })
            })
            .await?;

        info!(
            policy_number = %issuance.policy.policy_number,
            transaction_reference = %issuance.payment.transaction_reference,
            "policy issued"
        );
        Ok(issuance)
    }

    fn premium_due(&self, application: &Application) -> Result<Decimal> {
        match &application.details {
            ApplicationDetails::Vehicle(details) => Ok(self.calculator.quote(&details.risk_profile()).final_premium),
            ApplicationDetails::Health(_) => application.calculated_premium.ok_or_else(|| {
                LifecycleError::validation(
                    "selected_plan_id",
                    ValidationCode::Required,
                    "a plan must be selected before paying",
                )
            }),
        }
    }

    pub async fn get_policy(&self, caller: &Caller, id: PolicyId) -> Result<Policy> {
        let policy = self.store.get_policy(id).await?;
        ensure_can_read(caller, policy.user_id, "policy")?;
        Ok(policy)
    }

    pub async fn list_policies(&self, caller: &Caller, status: Option<PolicyStatus>, page: Page) -> Result<Vec<Policy>> {
        let query = PolicyQuery {
            user_id: if caller.is_admin() { None } else { Some(caller.user_id) },
            status,
            page: Some(page),
        };
        Ok(self.store.list_policies(query).await?)
    }

    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn cancel_policy(&self, caller: &Caller, id: PolicyId) -> Result<Policy> {
        ensure_admin(caller, "cancel policies")?;
        let mut policy = self.store.get_policy(id).await?;
        policy.cancel(self.clock.now())?;
        self.store.update_policy(&policy).await?;

        info!(policy_number = %policy.policy_number, "policy cancelled");
        Ok(policy)
    }

    /// Expires every active policy whose renewal window has closed; returns those changed
    ///
    /// A policy stays active through the grace period after its end date so
    /// it can still be renewed.
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn expire_policies(&self, caller: &Caller) -> Result<Vec<Policy>> {
        ensure_admin(caller, "expire policies")?;
        let now = self.clock.now();
        let grace = self.renewal.grace_period();
        let active = self
            .store
            .list_policies(PolicyQuery::default().with_status(PolicyStatus::Active))
            .await?;

        let mut expired = Vec::new();
        for mut policy in active {
            if policy.expire_if_lapsed(now, grace)? {
                self.store.update_policy(&policy).await?;
                expired.push(policy);
            }
        }

        info!(count = expired.len(), "expiry sweep finished");
        Ok(expired)
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    #[instrument(skip(self, request), fields(user_id = %caller.user_id, policy_id = %request.policy_id))]
    pub async fn file_claim(&self, caller: &Caller, request: FileClaimRequest) -> Result<Claim> {
        let now = self.clock.now();
        let policy = self.store.get_policy(request.policy_id).await?;
        ensure_owner(caller, policy.user_id, "policy")?;
        if !policy.is_active() {
            return Err(LifecycleError::conflict(
                ConflictCode::PolicyNotActive,
                format!("policy {} is {}", policy.policy_number, policy.status),
            ));
        }
        if request.details.family() != policy.kind {
            return Err(LifecycleError::validation(
                "family",
                ValidationCode::InvalidValue,
                format!("a {} claim cannot be filed against a {} policy", request.details.family(), policy.kind),
            ));
        }
        require_positive("claim_amount", request.claim_amount)?;
        request.details.validate(now.date_naive())?;

        let user_id = caller.user_id;
        let claim = self
            .with_next_number(policy.kind.claim_sequence(), now, move |number| {
                let details = request.details.clone();
                async move {
                    let claim = Claim::file(FileClaim {
                        claim_number: number,
                        policy_id: request.policy_id,
                        user_id,
                        details,
                        claim_amount: request.claim_amount,
                        now,
                    })?;
                    self.store.insert_claim(&claim).await?;
                    Ok::<_, LifecycleError>(claim)
                }
            })
            .await?;

        info!(claim_number = %claim.claim_number, amount = %claim.claim_amount, "claim filed");
        Ok(claim)
    }

    pub async fn get_claim(&self, caller: &Caller, id: ClaimId) -> Result<Claim> {
        let claim = self.store.get_claim(id).await?;
        ensure_can_read(caller, claim.user_id, "claim")?;
        Ok(claim)
    }

    /// Lists claims; a customer's query is always narrowed to their own
    pub async fn list_claims(&self, caller: &Caller, mut query: ClaimQuery) -> Result<Vec<Claim>> {
        if !caller.is_admin() {
            query.user_id = Some(caller.user_id);
        }
        query.page = Some(query.page.unwrap_or_default());
        Ok(self.store.list_claims(query).await?)
    }

    /// Applies an administrator's review to a claim
    #[instrument(skip(self, review), fields(user_id = %caller.user_id, status = %review.status))]
    pub async fn review_claim(&self, caller: &Caller, id: ClaimId, review: ClaimReview) -> Result<Claim> {
        ensure_admin(caller, "review claims")?;
        let claim = self.store.get_claim(id).await?;
        let updated = workflow::apply(&claim, &review, caller.user_id, self.clock.now())?;
        self.store.update_claim(&updated).await?;

        info!(
            claim_number = %updated.claim_number,
            from = %claim.status,
            to = %updated.status,
            "claim reviewed"
        );
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Renewal
    // ------------------------------------------------------------------

    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn renew_policy(&self, caller: &Caller, id: PolicyId) -> Result<Policy> {
        let policy = self.store.get_policy(id).await?;
        let renewed = self.renewal.renew(&policy, caller.user_id, self.clock.now())?;
        self.store.update_policy(&renewed).await?;

        info!(
            policy_number = %renewed.policy_number,
            end_date = %renewed.end_date,
            "policy renewed"
        );
        Ok(renewed)
    }

    /// Records the premium for a renewed term
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn record_renewal_payment(
        &self,
        caller: &Caller,
        id: PolicyId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<RenewalPayment> {
        let mut policy = self.store.get_policy(id).await?;
        ensure_owner(caller, policy.user_id, "policy")?;
        if !policy.is_active() {
            return Err(LifecycleError::conflict(
                ConflictCode::PolicyNotActive,
                format!("policy {} is {}", policy.policy_number, policy.status),
            ));
        }
        if policy.payment_status == PolicyPaymentStatus::Paid {
            return Err(LifecycleError::conflict(
                ConflictCode::AlreadyProcessed,
                format!("policy {} has no payment due", policy.policy_number),
            ));
        }

        let now = self.clock.now();
        let payment = Payment::record(RecordPayment {
            user_id: policy.user_id,
            application_id: policy.application_id,
            policy_id: policy.id,
            expected: policy.premium,
            tendered: amount,
            method,
            purpose: PaymentPurpose::Renewal,
            tolerance: self.config.payment_tolerance,
            now,
        })?;
        policy.mark_paid(now);
        self.store
            .record_renewal_payment(&policy, &payment)
            .await
            .map_err(|err| already_processed(err, format!("policy {} has no payment due", policy.policy_number)))?;

        info!(
            policy_number = %policy.policy_number,
            transaction_reference = %payment.transaction_reference,
            "renewal payment recorded"
        );
        Ok(RenewalPayment { policy, payment })
    }

    /// The caller's active policies ending within `horizon_days`
    pub async fn list_expiring(&self, caller: &Caller, horizon_days: Option<u32>) -> Result<Vec<ExpiringPolicy>> {
        let policies = self
            .store
            .list_policies(PolicyQuery::for_user(caller.user_id).with_status(PolicyStatus::Active))
            .await?;
        let days = horizon_days.unwrap_or(self.config.expiry_horizon_days);
        Ok(domain_policy::expiring_within(policies, days, self.clock.now()))
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Summarises the caller's claims over a date range and stores the result
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn generate_report(&self, caller: &Caller, request: ReportRequest) -> Result<Report> {
        let range = DateRange::new(request.start_date, request.end_date).map_err(|e| {
            LifecycleError::validation("end_date", ValidationCode::InvalidRange, e.to_string())
        })?;

        let claims = self
            .store
            .list_claims(ClaimQuery {
                user_id: Some(caller.user_id),
                family: request.family,
                ..Default::default()
            })
            .await?;
        let report = Report::generate(caller.user_id, request.family, range, &claims, self.clock.now());
        self.store.insert_report(&report).await?;

        info!(
            report_id = %report.id,
            total_claims = report.summary.total_claims,
            approval_rate = %report.summary.approval_rate_display(),
            "report generated"
        );
        Ok(report)
    }

    pub async fn get_report(&self, caller: &Caller, id: ReportId) -> Result<Report> {
        let report = self.store.get_report(id).await?;
        ensure_can_read(caller, report.user_id, "report")?;
        Ok(report)
    }

    pub async fn list_reports(&self, caller: &Caller, page: Page) -> Result<Vec<Report>> {
        Ok(self.store.list_reports(caller.user_id, page).await?)
    }

    // ------------------------------------------------------------------
    // Numbering
    // ------------------------------------------------------------------

    /// Runs `insert` with the next free number of `kind`, retrying on collision
    async fn with_next_number<T, F, Fut>(&self, kind: SequenceKind, now: DateTime<Utc>, mut insert: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let prefix = kind.prefix(now, &self.config.timezone);

        for attempt in 1..=self.config.sequence_max_attempts {
            let existing = self.store.numbers_with_prefix(kind, &prefix).await?;
            let number = sequence::next(&prefix, &existing, kind.width())?;

            match insert(number.clone()).await {
                Err(err) if err.is_storage_conflict() => {
                    warn!(%kind, %number, attempt, "number already taken, retrying");
                }
                Err(LifecycleError::Storage(err)) => {
                    error!(%kind, error = %err, "storage failure while allocating number");
                    return Err(LifecycleError::Storage(err));
                }
                other => return other,
            }
        }

        Err(LifecycleError::conflict(
            ConflictCode::DuplicateIdentifier,
            format!(
                "no free {kind} number under '{prefix}' after {} attempts",
                self.config.sequence_max_attempts
            ),
        ))
    }
}

/// A guarded write lost to a concurrent one
fn already_processed(err: PortError, message: String) -> LifecycleError {
    if err.is_conflict() {
        LifecycleError::conflict(ConflictCode::AlreadyProcessed, message)
    } else {
        err.into()
    }
}

fn ensure_owner(caller: &Caller, owner: UserId, entity: &str) -> Result<()> {
    if caller.user_id != owner {
        return Err(LifecycleError::unauthorized(format!("{entity} belongs to another user")));
    }
    Ok(())
}

fn ensure_can_read(caller: &Caller, owner: UserId, entity: &str) -> Result<()> {
    if !caller.can_read(owner) {
        return Err(LifecycleError::unauthorized(format!("{entity} belongs to another user")));
    }
    Ok(())
}

fn ensure_admin(caller: &Caller, action: &str) -> Result<()> {
    if !caller.is_admin() {
        return Err(LifecycleError::unauthorized(format!("only administrators may {action}")));
    }
    Ok(())
}
