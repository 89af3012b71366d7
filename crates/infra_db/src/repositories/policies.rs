//! Policy and payment repository implementation
//!
//! Payments are only ever written together with a policy change, so they live
//! here rather than in a repository of their own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use core_kernel::{ApplicationId, Page, PlanId, PolicyId, UserId};
use domain_billing::Payment;
use domain_policy::{Application, Policy, PolicyStatus};

use super::{page_bounds, parse_column};
use crate::error::DatabaseError;

const SELECT_POLICY: &str = r#"
    SELECT id, policy_number, user_id, application_id, plan_id, kind, premium,
           start_date, end_date, renewal_date, status, payment_status,
           renewal_reminder_sent, created_at, updated_at
    FROM policies
"#;

/// Repository for policies and the payments recorded against them
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues a policy in a single transaction
    ///
    /// The application is moved out of `pending` only if it is still pending,
    /// then the policy and its first payment are inserted. Either every write
    /// lands or none does.
    ///
    /// # Errors
    ///
    /// - `StaleWrite` if the application was already processed
    /// - `DuplicateEntry` if the policy number is taken
    pub async fn issue(
        &self,
        policy: &Policy,
        payment: &Payment,
        application: &Application,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let approved = sqlx::query(
            r#"
            UPDATE applications
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(*application.id.as_uuid())
        .bind(application.status.as_str())
        .bind(application.updated_at)
        .execute(&mut *tx)
        .await?;

        if approved.rows_affected() == 0 {
            return Err(DatabaseError::StaleWrite(format!(
                "application {} is no longer pending",
                application.application_number
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO policies (
                id, policy_number, user_id, application_id, plan_id, kind, premium,
                start_date, end_date, renewal_date, status, payment_status,
                renewal_reminder_sent, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(*policy.id.as_uuid())
        .bind(&policy.policy_number)
        .bind(*policy.user_id.as_uuid())
        .bind(*policy.application_id.as_uuid())
        .bind(policy.plan_id.map(Uuid::from))
        .bind(policy.kind.as_str())
        .bind(policy.premium)
        .bind(policy.start_date)
        .bind(policy.end_date)
        .bind(policy.renewal_date)
        .bind(policy.status.as_str())
        .bind(policy.payment_status.as_str())
        .bind(policy.renewal_reminder_sent)
        .bind(policy.created_at)
        .bind(policy.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_payment(&mut tx, payment).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: PolicyId) -> Result<Policy, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!("{SELECT_POLICY} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Policy", id))?;

        row.try_into()
    }

    /// Stores the fields renewal, cancellation and expiry may change
    pub async fn update(&self, policy: &Policy) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE policies
            SET end_date = $2, renewal_date = $3, status = $4, payment_status = $5,
                renewal_reminder_sent = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(*policy.id.as_uuid())
        .bind(policy.end_date)
        .bind(policy.renewal_date)
        .bind(policy.status.as_str())
        .bind(policy.payment_status.as_str())
        .bind(policy.renewal_reminder_sent)
        .bind(policy.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Policy", policy.id));
        }
        Ok(())
    }

    /// Lists policies newest first
    pub async fn list(
        &self,
        user_id: Option<UserId>,
        status: Option<PolicyStatus>,
        page: Option<Page>,
    ) -> Result<Vec<Policy>, DatabaseError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query_as::<_, PolicyRow>(&format!(
            "{SELECT_POLICY}
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(user_id.map(Uuid::from))
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Policy::try_from).collect()
    }

    /// Marks the renewed term paid and inserts its payment in one transaction
    ///
    /// # Errors
    ///
    /// Returns `StaleWrite` if the term was already paid.
    pub async fn record_renewal_payment(&self, policy: &Policy, payment: &Payment) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let paid = sqlx::query(
            r#"
            UPDATE policies
            SET payment_status = $2, updated_at = $3
            WHERE id = $1 AND payment_status = 'pending'
            "#,
        )
        .bind(*policy.id.as_uuid())
        .bind(policy.payment_status.as_str())
        .bind(policy.updated_at)
        .execute(&mut *tx)
        .await?;

        if paid.rows_affected() == 0 {
            return Err(DatabaseError::StaleWrite(format!(
                "policy {} has no payment due",
                policy.policy_number
            )));
        }

        insert_payment(&mut tx, payment).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Policy numbers starting with `prefix`
    pub async fn numbers_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT policy_number FROM policies WHERE starts_with(policy_number, $1)",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers)
    }
}

async fn insert_payment(tx: &mut Transaction<'_, Postgres>, payment: &Payment) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, transaction_reference, user_id, application_id, policy_id,
            amount, method, status, purpose, paid_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(*payment.id.as_uuid())
    .bind(&payment.transaction_reference)
    .bind(*payment.user_id.as_uuid())
    .bind(*payment.application_id.as_uuid())
    .bind(*payment.policy_id.as_uuid())
    .bind(payment.amount)
    .bind(payment.method.as_str())
    .bind(payment.status.as_str())
    .bind(payment.purpose.as_str())
    .bind(payment.paid_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Database row for a policy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub id: Uuid,
    pub policy_number: String,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub kind: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub renewal_date: DateTime<Utc>,
    pub status: String,
    pub payment_status: String,
    pub renewal_reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for Policy {
    type Error = DatabaseError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        Ok(Policy {
            id: PolicyId::from(row.id),
            policy_number: row.policy_number,
            user_id: UserId::from(row.user_id),
            application_id: ApplicationId::from(row.application_id),
            plan_id: row.plan_id.map(PlanId::from),
            kind: parse_column("kind", &row.kind)?,
            premium: row.premium,
            start_date: row.start_date,
            end_date: row.end_date,
            renewal_date: row.renewal_date,
            status: parse_column("status", &row.status)?,
            payment_status: parse_column("payment_status", &row.payment_status)?,
            renewal_reminder_sent: row.renewal_reminder_sent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
