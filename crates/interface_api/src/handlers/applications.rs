//! Application handlers
//!
//! Submit, quote, select a plan and pay. Paying issues the policy.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use app_lifecycle::{Caller, Issuance};
use core_kernel::ApplicationId;
use domain_policy::{Application, ApplicationDetails, PremiumBreakdown};

use crate::dto::applications::{PaymentRequest, SelectPlanRequest};
use crate::dto::PageQuery;
use crate::{error::ApiError, AppState};

/// Submits a vehicle or health application
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(details): Json<ApplicationDetails>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    let application = state.service.submit_application(&caller, details).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Lists the caller's applications, newest first
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Application>>, ApiError> {
    query.validate()?;
    Ok(Json(state.service.list_applications(&caller, query.page()).await?))
}

pub async fn get_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<Application>, ApiError> {
    Ok(Json(state.service.get_application(&caller, id).await?))
}

/// Quotes the premium for a stored vehicle application
pub async fn quote_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<PremiumBreakdown>, ApiError> {
    Ok(Json(state.service.quote_application(&caller, id).await?))
}

/// Selects a health plan, fixing the application's premium
pub async fn select_plan(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ApplicationId>,
    Json(request): Json<SelectPlanRequest>,
) -> Result<Json<Application>, ApiError> {
    Ok(Json(state.service.select_plan(&caller, id, request.plan_id).await?))
}

/// Records the first premium payment and issues the policy
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ApplicationId>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<Issuance>), ApiError> {
    request.validate()?;
    let issuance = state
        .service
        .record_payment(&caller, id, request.amount, request.method)
        .await?;
    Ok((StatusCode::CREATED, Json(issuance)))
}
