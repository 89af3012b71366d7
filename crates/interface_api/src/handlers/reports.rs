//! Report handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use app_lifecycle::Caller;
use core_kernel::ReportId;
use domain_claims::Report;

use crate::dto::reports::GenerateReportRequest;
use crate::dto::PageQuery;
use crate::{error::ApiError, AppState};

/// Summarises the caller's claims over a date range and stores the report
pub async fn generate_report(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ApiError> {
    let report = state.service.generate_report(&caller, request.into()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Report>>, ApiError> {
    query.validate()?;
    Ok(Json(state.service.list_reports(&caller, query.page()).await?))
}

pub async fn get_report(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ReportId>,
) -> Result<Json<Report>, ApiError> {
    Ok(Json(state.service.get_report(&caller, id).await?))
}
