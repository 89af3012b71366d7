//! Claims repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{ClaimId, Page, PolicyId, UserId};
use domain_claims::{Claim, ClaimDetails, ClaimStatus};
use domain_policy::InsuranceKind;

use super::{page_bounds, parse_column};
use crate::error::DatabaseError;

const SELECT_CLAIM: &str = r#"
    SELECT id, claim_number, policy_id, user_id, details, claim_amount, status,
           reviewed_at, reviewed_by, approved_amount, rejection_reason, admin_notes,
           created_at, updated_at
    FROM claims
"#;

/// Filter values for claim listings
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimFilter {
    pub user_id: Option<UserId>,
    pub status: Option<ClaimStatus>,
    pub family: Option<InsuranceKind>,
    pub page: Option<Page>,
}

/// Repository for claims and their review state
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a newly filed claim
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if the claim number is already taken.
    pub async fn insert(&self, claim: &Claim) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                id, claim_number, policy_id, user_id, family, details, claim_amount, status,
                reviewed_at, reviewed_by, approved_amount, rejection_reason, admin_notes,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(*claim.id.as_uuid())
        .bind(&claim.claim_number)
        .bind(*claim.policy_id.as_uuid())
        .bind(*claim.user_id.as_uuid())
        .bind(claim.family().as_str())
        .bind(Json(&claim.details))
        .bind(claim.claim_amount)
        .bind(claim.status.as_str())
        .bind(claim.reviewed_at)
        .bind(claim.reviewed_by.map(Uuid::from))
        .bind(claim.approved_amount)
        .bind(&claim.rejection_reason)
        .bind(&claim.admin_notes)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: ClaimId) -> Result<Claim, DatabaseError> {
        let row = sqlx::query_as::<_, ClaimRow>(&format!("{SELECT_CLAIM} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", id))?;

        row.try_into()
    }

    /// Stores the review state of a claim
    pub async fn update_review(&self, claim: &Claim) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET status = $2, reviewed_at = $3, reviewed_by = $4, approved_amount = $5,
                rejection_reason = $6, admin_notes = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(*claim.id.as_uuid())
        .bind(claim.status.as_str())
        .bind(claim.reviewed_at)
        .bind(claim.reviewed_by.map(Uuid::from))
        .bind(claim.approved_amount)
        .bind(&claim.rejection_reason)
        .bind(&claim.admin_notes)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim.id));
        }
        Ok(())
    }

    /// Lists claims newest first
    pub async fn list(&self, filter: ClaimFilter) -> Result<Vec<Claim>, DatabaseError> {
        let (limit, offset) = page_bounds(filter.page);
        let rows = sqlx::query_as::<_, ClaimRow>(&format!(
            "{SELECT_CLAIM}
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR family = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(filter.user_id.map(Uuid::from))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.family.map(|f| f.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Claim::try_from).collect()
    }

    /// Claim numbers starting with `prefix`
    pub async fn numbers_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let numbers =
            sqlx::query_scalar::<_, String>("SELECT claim_number FROM claims WHERE starts_with(claim_number, $1)")
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;

        Ok(numbers)
    }
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub user_id: Uuid,
    pub details: Json<ClaimDetails>,
    pub claim_amount: Decimal,
    pub status: String,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub approved_amount: Option<Decimal>,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = DatabaseError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        Ok(Claim {
            id: ClaimId::from(row.id),
            claim_number: row.claim_number,
            policy_id: PolicyId::from(row.policy_id),
            user_id: UserId::from(row.user_id),
            details: row.details.0,
            claim_amount: row.claim_amount,
            status: parse_column("status", &row.status)?,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by.map(UserId::from),
            approved_amount: row.approved_amount,
            rejection_reason: row.rejection_reason,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
