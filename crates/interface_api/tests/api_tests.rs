//! HTTP surface tests against the in-memory store

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

use app_lifecycle::{FixedClock, InMemoryStore, Issuance, LifecycleConfig, LifecycleService, Role};
use core_kernel::UserId;
use domain_claims::{Claim, ClaimStatus, Report};
use domain_policy::{Application, Plan, PremiumBreakdown};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::create_router;
use test_utils::{DetailFixtures, PlanFixtures, TemporalFixtures};

const SECRET: &str = "test-secret";

struct Api {
    server: TestServer,
    customer: String,
    other: String,
    admin: String,
}

async fn api() -> Api {
    let store = InMemoryStore::with_plans(vec![PlanFixtures::silver(), PlanFixtures::retired()]).await;
    let clock = Arc::new(FixedClock::new(TemporalFixtures::now()));
    let service = LifecycleService::with_clock(Arc::new(store), clock, LifecycleConfig::default()).unwrap();
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..Default::default()
    };

    Api {
        server: TestServer::new(create_router(Arc::new(service), config)).unwrap(),
        customer: token(Role::Customer),
        other: token(Role::Customer),
        admin: token(Role::Admin),
    }
}

fn token(role: Role) -> String {
    create_token(UserId::new(), role, SECRET, 3600).unwrap()
}

fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

async fn submit_vehicle(api: &Api) -> Application {
    let response = authed(api.server.post("/api/v1/applications"), &api.customer)
        .json(&DetailFixtures::vehicle_application())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Application>()
}

async fn issue_vehicle(api: &Api) -> Issuance {
    let application = submit_vehicle(api).await;
    let response = authed(
        api.server.post(&format!("/api/v1/applications/{}/payment", application.id.as_uuid())),
        &api.customer,
    )
    .json(&json!({ "amount": "702", "method": "credit_card" }))
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Issuance>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness_needs_no_token() {
        let api = api().await;
        let response = api.server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let api = api().await;
        let response = api.server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["store"]["status"], "healthy");
    }
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let api = api().await;
        let response = api.server.get("/api/v1/applications").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let api = api().await;
        let forged = create_token(UserId::new(), Role::Admin, "not-the-secret", 3600).unwrap();
        let response = authed(api.server.get("/api/v1/policies"), &forged).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_application_is_forbidden() {
        let api = api().await;
        let application = submit_vehicle(&api).await;

        let path = format!("/api/v1/applications/{}", application.id.as_uuid());
        let response = authed(api.server.get(&path), &api.other).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = authed(api.server.get(&path), &api.admin).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_application_is_not_found() {
        let api = api().await;
        let path = format!("/api/v1/applications/{}", uuid_like());
        let response = authed(api.server.get(&path), &api.customer).await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    fn uuid_like() -> String {
        UserId::new().as_uuid().to_string()
    }
}

mod applications {
    use super::*;

    #[tokio::test]
    async fn test_submit_assigns_number() {
        let api = api().await;
        let application = submit_vehicle(&api).await;

        assert_eq!(application.application_number, "VEH-20250314-0001");
    }

    #[tokio::test]
    async fn test_invalid_details_are_unprocessable() {
        let api = api().await;
        let mut body = serde_json::to_value(DetailFixtures::vehicle_application()).unwrap();
        body["make"] = json!("");

        let response = authed(api.server.post("/api/v1/applications"), &api.customer)
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "make");
    }

    #[tokio::test]
    async fn test_quote_for_stored_application() {
        let api = api().await;
        let application = submit_vehicle(&api).await;

        let response = authed(
            api.server.get(&format!("/api/v1/applications/{}/quote", application.id.as_uuid())),
            &api.customer,
        )
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<PremiumBreakdown>().final_premium, dec!(702));
    }

    #[tokio::test]
    async fn test_ad_hoc_quote() {
        let api = api().await;
        let response = authed(api.server.post("/api/v1/quotes"), &api.customer)
            .json(&json!({ "vehicle_type": "suv" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<PremiumBreakdown>().final_premium, dec!(600));
    }

    #[tokio::test]
    async fn test_health_plan_selection() {
        let api = api().await;
        let plans = authed(api.server.get("/api/v1/plans"), &api.customer)
            .await
            .json::<Vec<Plan>>();
        assert_eq!(plans.len(), 1);

        let application = authed(api.server.post("/api/v1/applications"), &api.customer)
            .json(&DetailFixtures::health_application())
            .await
            .json::<Application>();
        assert_eq!(application.application_number, "HLT-20250314-0001");

        let response = authed(
            api.server.post(&format!("/api/v1/applications/{}/plan", application.id.as_uuid())),
            &api.customer,
        )
        .json(&json!({ "plan_id": plans[0].id }))
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Application>().calculated_premium, Some(dec!(149.50)));
    }

    #[tokio::test]
    async fn test_invalid_page_is_unprocessable() {
        let api = api().await;
        let response = authed(api.server.get("/api/v1/applications?limit=0"), &api.customer).await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod payments {
    use super::*;

    #[tokio::test]
    async fn test_payment_issues_policy() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;

        assert_eq!(issuance.policy.policy_number, "VP-20250314-0001");
        assert_eq!(issuance.payment.amount, dec!(702));
    }

    #[tokio::test]
    async fn test_mismatched_amount_is_bad_request() {
        let api = api().await;
        let application = submit_vehicle(&api).await;

        let response = authed(
            api.server.post(&format!("/api/v1/applications/{}/payment", application.id.as_uuid())),
            &api.customer,
        )
        .json(&json!({ "amount": "700", "method": "credit_card" }))
        .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&response.json::<Value>()), "amount_mismatch");
    }

    #[tokio::test]
    async fn test_second_payment_conflicts() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;

        let response = authed(
            api.server.post(&format!(
                "/api/v1/applications/{}/payment",
                issuance.application.id.as_uuid()
            )),
            &api.customer,
        )
        .json(&json!({ "amount": "702", "method": "credit_card" }))
        .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert_eq!(error_code(&response.json::<Value>()), "already_processed");
    }

    #[tokio::test]
    async fn test_renewal_outside_window_is_bad_request() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;

        let response = authed(
            api.server.post(&format!("/api/v1/policies/{}/renew", issuance.policy.id.as_uuid())),
            &api.customer,
        )
        .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&response.json::<Value>()), "outside_renewal_window");
    }

    #[tokio::test]
    async fn test_expire_sweep_is_admin_only() {
        let api = api().await;

        let response = authed(api.server.post("/api/v1/policies/expire"), &api.customer).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = authed(api.server.post("/api/v1/policies/expire"), &api.admin).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

mod claims {
    use super::*;

    #[tokio::test]
    async fn test_claim_review_and_report() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;

        let response = authed(api.server.post("/api/v1/claims"), &api.customer)
            .json(&json!({
                "policy_id": issuance.policy.id,
                "details": DetailFixtures::collision(),
                "claim_amount": "1000",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let claim = response.json::<Claim>();
        assert_eq!(claim.claim_number, "CLM-2025-001");

        let review_path = format!("/api/v1/claims/{}/review", claim.id.as_uuid());
        let response = authed(api.server.put(&review_path), &api.customer)
            .json(&json!({ "status": "approved", "approved_amount": "900" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = authed(api.server.put(&review_path), &api.admin)
            .json(&json!({ "status": "approved", "approved_amount": "900" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Claim>().status, ClaimStatus::Approved);

        let (start_date, end_date) = TemporalFixtures::march_2025();
        let response = authed(api.server.post("/api/v1/reports"), &api.customer)
            .json(&json!({ "start_date": start_date, "end_date": end_date }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let report = response.json::<Report>();
        assert_eq!(report.summary.approval_rate, Some(dec!(90)));

        let response = authed(
            api.server.get(&format!("/api/v1/reports/{}", report.id.as_uuid())),
            &api.other,
        )
        .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_zero_amount_reports_field() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;

        let response = authed(api.server.post("/api/v1/claims"), &api.customer)
            .json(&json!({
                "policy_id": issuance.policy.id,
                "details": DetailFixtures::collision(),
                "claim_amount": "0",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["field"], "claim_amount");
        assert_eq!(body["code"], "must_be_positive");
    }

    #[tokio::test]
    async fn test_unknown_review_status() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;
        let claim = authed(api.server.post("/api/v1/claims"), &api.customer)
            .json(&json!({
                "policy_id": issuance.policy.id,
                "details": DetailFixtures::collision(),
                "claim_amount": "1000",
            }))
            .await
            .json::<Claim>();

        let response = authed(
            api.server.put(&format!("/api/v1/claims/{}/review", claim.id.as_uuid())),
            &api.admin,
        )
        .json(&json!({ "status": "archived" }))
        .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&response.json::<Value>()), "invalid_status");
    }

    #[tokio::test]
    async fn test_customer_listing_is_scoped() {
        let api = api().await;
        let issuance = issue_vehicle(&api).await;
        authed(api.server.post("/api/v1/claims"), &api.customer)
            .json(&json!({
                "policy_id": issuance.policy.id,
                "details": DetailFixtures::collision(),
                "claim_amount": "1000",
            }))
            .await;

        let mine = authed(api.server.get("/api/v1/claims"), &api.customer)
            .await
            .json::<Vec<Claim>>();
        assert_eq!(mine.len(), 1);

        let theirs = authed(api.server.get("/api/v1/claims"), &api.other)
            .await
            .json::<Vec<Claim>>();
        assert!(theirs.is_empty());

        let submitted = authed(api.server.get("/api/v1/claims?status=submitted"), &api.admin)
            .await
            .json::<Vec<Claim>>();
        assert_eq!(submitted.len(), 1);
    }
}
