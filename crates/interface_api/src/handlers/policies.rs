//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use validator::Validate;

use app_lifecycle::{Caller, RenewalPayment};
use core_kernel::PolicyId;
use domain_policy::{ExpiringPolicy, Policy};

use crate::dto::applications::PaymentRequest;
use crate::dto::policies::{ExpiringQuery, PolicyListQuery};
use crate::{error::ApiError, AppState};

pub async fn list_policies(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<PolicyListQuery>,
) -> Result<Json<Vec<Policy>>, ApiError> {
    query.validate()?;
    let policies = state
        .service
        .list_policies(&caller, query.status, query.page())
        .await?;
    Ok(Json(policies))
}

pub async fn get_policy(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<PolicyId>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.get_policy(&caller, id).await?))
}

/// Cancels a policy (admin)
pub async fn cancel_policy(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<PolicyId>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.cancel_policy(&caller, id).await?))
}

/// Extends a policy by one term if it is inside its renewal window
pub async fn renew_policy(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<PolicyId>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.renew_policy(&caller, id).await?))
}

pub async fn record_renewal_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<PolicyId>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<RenewalPayment>, ApiError> {
    request.validate()?;
    let paid = state
        .service
        .record_renewal_payment(&caller, id, request.amount, request.method)
        .await?;
    Ok(Json(paid))
}

/// The caller's active policies ending soon, soonest first
pub async fn list_expiring(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ExpiringQuery>,
) -> Result<Json<Vec<ExpiringPolicy>>, ApiError> {
    query.validate()?;
    Ok(Json(state.service.list_expiring(&caller, query.days).await?))
}

/// Expires active policies whose renewal window has closed (admin)
pub async fn expire_policies(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<Policy>>, ApiError> {
    Ok(Json(state.service.expire_policies(&caller).await?))
}
