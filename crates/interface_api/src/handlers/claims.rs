//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use app_lifecycle::Caller;
use core_kernel::ClaimId;
use domain_claims::Claim;

use crate::dto::claims::{ClaimListQuery, FileClaimBody, ReviewClaimRequest};
use crate::{error::ApiError, AppState};

/// Files a claim against one of the caller's active policies
pub async fn file_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<FileClaimBody>,
) -> Result<(StatusCode, Json<Claim>), ApiError> {
    let claim = state.service.file_claim(&caller, body.into()).await?;
    Ok((StatusCode::CREATED, Json(claim)))
}

/// Lists claims; customers only ever see their own
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ClaimListQuery>,
) -> Result<Json<Vec<Claim>>, ApiError> {
    query.validate()?;
    Ok(Json(state.service.list_claims(&caller, query.to_query()).await?))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ClaimId>,
) -> Result<Json<Claim>, ApiError> {
    Ok(Json(state.service.get_claim(&caller, id).await?))
}

/// Applies an administrator's review
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<ClaimId>,
    Json(request): Json<ReviewClaimRequest>,
) -> Result<Json<Claim>, ApiError> {
    request.validate()?;
    Ok(Json(state.service.review_claim(&caller, id, request.into()).await?))
}
