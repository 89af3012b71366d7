//! Report repository implementation
//!
//! Reports are append-only snapshots; the summary and the claims it was
//! computed from are stored as JSONB exactly as generated.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{DateRange, Page, ReportId, UserId};
use domain_claims::{Claim, Report, ReportSummary};

use super::parse_column;
use crate::error::DatabaseError;

const SELECT_REPORT: &str = r#"
    SELECT id, user_id, family, start_date, end_date, summary, claims, generated_at
    FROM reports
"#;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, report: &Report) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, user_id, family, start_date, end_date, summary, claims, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(*report.id.as_uuid())
        .bind(*report.user_id.as_uuid())
        .bind(report.family.map(|f| f.as_str()))
        .bind(report.range.start)
        .bind(report.range.end)
        .bind(Json(&report.summary))
        .bind(Json(&report.claims))
        .bind(report.generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: ReportId) -> Result<Report, DatabaseError> {
        let row = sqlx::query_as::<_, ReportRow>(&format!("{SELECT_REPORT} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Report", id))?;

        row.try_into()
    }

    /// A user's reports, most recently generated first
    pub async fn list_for_user(&self, user_id: UserId, page: Page) -> Result<Vec<Report>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "{SELECT_REPORT}
             WHERE user_id = $1
             ORDER BY generated_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(*user_id.as_uuid())
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Report::try_from).collect()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Json<ReportSummary>,
    pub claims: Json<Vec<Claim>>,
    pub generated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = DatabaseError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let family = row
            .family
            .as_deref()
            .map(|f| parse_column("family", f))
            .transpose()?;
        let range = DateRange::new(row.start_date, row.end_date).map_err(|e| DatabaseError::undecodable("end_date", e))?;

        Ok(Report {
            id: ReportId::from(row.id),
            user_id: UserId::from(row.user_id),
            family,
            range,
            summary: row.summary.0,
            claims: row.claims.0,
            generated_at: row.generated_at,
        })
    }
}
