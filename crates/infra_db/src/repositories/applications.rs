//! Application repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{ApplicationId, Page, PlanId, UserId};
use domain_policy::{Application, ApplicationDetails};

use super::parse_column;
use crate::error::DatabaseError;

const SELECT_APPLICATION: &str = r#"
    SELECT id, application_number, user_id, details, status,
           selected_plan_id, calculated_premium, created_at, updated_at
    FROM applications
"#;

/// Repository for insurance applications
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new application
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if the application number is already taken.
    pub async fn insert(&self, application: &Application) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO applications (
                id, application_number, user_id, kind, details, status,
                selected_plan_id, calculated_premium, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*application.id.as_uuid())
        .bind(&application.application_number)
        .bind(*application.user_id.as_uuid())
        .bind(application.kind().as_str())
        .bind(Json(&application.details))
        .bind(application.status.as_str())
        .bind(application.selected_plan_id.map(Uuid::from))
        .bind(application.calculated_premium)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: ApplicationId) -> Result<Application, DatabaseError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!("{SELECT_APPLICATION} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Application", id))?;

        row.try_into()
    }

    /// Stores the plan selection and premium of a pending application
    ///
    /// Status only changes through policy issuance, so it is never written
    /// here. Returns `StaleWrite` if the stored row is no longer pending.
    pub async fn update(&self, application: &Application) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET selected_plan_id = $2, calculated_premium = $3, updated_at = $4
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(*application.id.as_uuid())
        .bind(application.selected_plan_id.map(Uuid::from))
        .bind(application.calculated_premium)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Tell a missing row apart from one that moved on
            let stored = self.get_by_id(application.id).await?;
            return Err(DatabaseError::StaleWrite(format!(
                "application {} is {}",
                stored.application_number, stored.status
            )));
        }
        Ok(())
    }

    /// Lists applications newest first, optionally for one user
    pub async fn list(&self, user_id: Option<UserId>, page: Page) -> Result<Vec<Application>, DatabaseError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "{SELECT_APPLICATION}
             WHERE ($1::uuid IS NULL OR user_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.map(Uuid::from))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    /// Application numbers starting with `prefix`
    pub async fn numbers_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT application_number FROM applications WHERE starts_with(application_number, $1)",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers)
    }
}

/// Database row for an application
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub application_number: String,
    pub user_id: Uuid,
    pub details: Json<ApplicationDetails>,
    pub status: String,
    pub selected_plan_id: Option<Uuid>,
    pub calculated_premium: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = DatabaseError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: ApplicationId::from(row.id),
            application_number: row.application_number,
            user_id: UserId::from(row.user_id),
            details: row.details.0,
            status: parse_column("status", &row.status)?,
            selected_plan_id: row.selected_plan_id.map(PlanId::from),
            calculated_premium: row.calculated_premium,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
