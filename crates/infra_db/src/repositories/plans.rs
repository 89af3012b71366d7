//! Health plan catalog repository (read-only)

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::PlanId;
use domain_policy::Plan;

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: PlanId) -> Result<Plan, DatabaseError> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, description, coverage_amount, monthly_premium_base,
                   deductible, copay, features, active
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Plan", id))?;

        Ok(row.into())
    }

    /// Active plans, cheapest first
    pub async fn list_active(&self) -> Result<Vec<Plan>, DatabaseError> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, description, coverage_amount, monthly_premium_base,
                   deductible, copay, features, active
            FROM plans
            WHERE active
            ORDER BY monthly_premium_base, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub coverage_amount: Decimal,
    pub monthly_premium_base: Decimal,
    pub deductible: Decimal,
    pub copay: Decimal,
    pub features: Vec<String>,
    pub active: bool,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: PlanId::from(row.id),
            name: row.name,
            description: row.description,
            coverage_amount: row.coverage_amount,
            monthly_premium_base: row.monthly_premium_base,
            deductible: row.deductible,
            copay: row.copay,
            features: row.features,
            active: row.active,
        }
    }
}
