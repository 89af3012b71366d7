//! HTTP API Layer
//!
//! REST surface for the policy and claims lifecycle engine, built on Axum.
//! Handlers are thin: they resolve the caller from the bearer token,
//! validate the request shape and hand off to [`LifecycleService`].
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource
//! - **Middleware**: JWT authentication and audit logging
//! - **DTOs**: request bodies and query strings
//! - **Error Handling**: lifecycle errors mapped to status codes
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(Arc::new(service), config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use app_lifecycle::LifecycleService;

use crate::config::ApiConfig;
use crate::handlers::{applications, claims, health, plans, policies, reports};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LifecycleService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - The lifecycle engine, already wired to its store
/// * `config` - API configuration
pub fn create_router(service: Arc<LifecycleService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let application_routes = Router::new()
        .route("/", post(applications::submit_application).get(applications::list_applications))
        .route("/:id", get(applications::get_application))
        .route("/:id/quote", get(applications::quote_application))
        .route("/:id/plan", post(applications::select_plan))
        .route("/:id/payment", post(applications::record_payment));

    let policy_routes = Router::new()
        .route("/", get(policies::list_policies))
        .route("/expiring", get(policies::list_expiring))
        .route("/expire", post(policies::expire_policies))
        .route("/:id", get(policies::get_policy))
        .route("/:id/cancel", post(policies::cancel_policy))
        .route("/:id/renew", post(policies::renew_policy))
        .route("/:id/renewal-payment", post(policies::record_renewal_payment));

    let claims_routes = Router::new()
        .route("/", post(claims::file_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/review", put(claims::review_claim));

    let report_routes = Router::new()
        .route("/", post(reports::generate_report).get(reports::list_reports))
        .route("/:id", get(reports::get_report));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/applications", application_routes)
        .nest("/policies", policy_routes)
        .nest("/claims", claims_routes)
        .nest("/reports", report_routes)
        .route("/plans", get(plans::list_plans))
        .route("/quotes", post(plans::quote_premium))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware))
                .layer(axum_middleware::from_fn(audit_middleware)),
        );

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
