//! Plan catalog and ad-hoc quotes

use axum::{extract::State, Json};

use domain_policy::{Plan, PremiumBreakdown, RiskProfile};

use crate::{error::ApiError, AppState};

/// Lists active health plans
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<Plan>>, ApiError> {
    Ok(Json(state.service.list_plans().await?))
}

/// Quotes a vehicle premium; absent attributes are neutral
pub async fn quote_premium(State(state): State<AppState>, Json(profile): Json<RiskProfile>) -> Json<PremiumBreakdown> {
    Json(state.service.quote_premium(&profile))
}
