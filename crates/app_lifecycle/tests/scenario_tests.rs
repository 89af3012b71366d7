//! End-to-end customer journeys through the lifecycle service

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

use app_lifecycle::{
    Caller, FileClaimRequest, FixedClock, InMemoryStore, LifecycleConfig, LifecycleService, ReportRequest,
};
use core_kernel::{Page, PlanId, UserId};
use domain_billing::PaymentMethod;
use domain_claims::workflow::ClaimReview;
use domain_claims::{ClaimDetails, ClaimStatus, HealthTreatment};
use domain_policy::{ApplicationDetails, HealthDetails, InsuranceKind, Plan, PolicyStatus};

fn gold_plan() -> Plan {
    Plan {
        id: PlanId::new(),
        name: "Gold".to_string(),
        description: Some("Family floater".to_string()),
        coverage_amount: dec!(1000000),
        monthly_premium_base: dec!(249.99),
        deductible: dec!(500),
        copay: dec!(10),
        features: vec!["maternity".to_string(), "dental".to_string()],
        active: true,
    }
}

fn applicant(name: &str) -> ApplicationDetails {
    ApplicationDetails::Health(HealthDetails {
        full_name: name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 11, 2).unwrap(),
        gender: None,
        phone: "+91 80 4000 1234".to_string(),
        address: "4 Residency Road, Bengaluru".to_string(),
        smoker: true,
        pre_existing_conditions: vec!["asthma".to_string()],
        current_medications: vec!["salbutamol".to_string()],
        document_names: vec!["id.pdf".to_string()],
    })
}

#[tokio::test]
async fn test_health_policy_from_application_to_paid_claim_and_report() {
    let plan = gold_plan();
    let store = InMemoryStore::with_plans(vec![plan.clone()]).await;
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap()));
    let service = LifecycleService::with_clock(Arc::new(store), clock.clone(), LifecycleConfig::default()).unwrap();

    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let application = service.submit_application(&customer, applicant("Ravi Kumar")).await.unwrap();
    service.select_plan(&customer, application.id, plan.id).await.unwrap();
    let issuance = service
        .record_payment(&customer, application.id, dec!(249.99), PaymentMethod::CreditCard)
        .await
        .unwrap();
    let policy = issuance.policy;
    assert_eq!(policy.policy_number, "HP-20250602-0001");
    assert!(issuance.payment.transaction_reference.starts_with("TXN-"));

    clock.advance(Duration::days(30));
    let claim = service
        .file_claim(
            &customer,
            FileClaimRequest {
                policy_id: policy.id,
                details: ClaimDetails::Health(HealthTreatment {
                    treatment_date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap(),
                    hospital_name: "St. Martha's".to_string(),
                    diagnosis: "Acute bronchitis".to_string(),
                    treatment_description: Some("Two nights observation".to_string()),
                    document_names: vec!["discharge.pdf".to_string()],
                }),
                claim_amount: dec!(1000),
            },
        )
        .await
        .unwrap();
    assert_eq!(claim.claim_number, "HCL-2025-001");

    service
        .review_claim(&admin, claim.id, ClaimReview::to(ClaimStatus::UnderReview))
        .await
        .unwrap();
    service
        .review_claim(
            &admin,
            claim.id,
            ClaimReview::to(ClaimStatus::Approved)
                .with_approved_amount(dec!(900))
                .with_admin_notes("room rent capped"),
        )
        .await
        .unwrap();
    let paid = service
        .review_claim(&admin, claim.id, ClaimReview::to(ClaimStatus::Paid))
        .await
        .unwrap();

    assert_eq!(paid.status, ClaimStatus::Paid);
    assert_eq!(paid.approved_amount, Some(dec!(900)));
    assert_eq!(paid.rejection_reason, None);
    assert_eq!(paid.admin_notes.as_deref(), Some("room rent capped"));

    let seen_by_customer = service.get_claim(&customer, claim.id).await.unwrap();
    assert_eq!(seen_by_customer, paid);

    let report = service
        .generate_report(
            &customer,
            ReportRequest {
                start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
                family: Some(InsuranceKind::Health),
            },
        )
        .await
        .unwrap();
    assert_eq!(report.summary.total_claims, 1);
    assert_eq!(report.summary.approved_claims, 1);
    assert_eq!(report.summary.approval_rate, Some(dec!(90)));

    // The year rolls on: renew inside the window, pay, then the old term never lapses.
    clock.set(policy.end_date - Duration::days(30));
    let renewed = service.renew_policy(&customer, policy.id).await.unwrap();
    service
        .record_renewal_payment(&customer, policy.id, dec!(249.99), PaymentMethod::BankTransfer)
        .await
        .unwrap();

    clock.set(policy.end_date + Duration::days(61));
    let expired = service.expire_policies(&admin).await.unwrap();
    assert!(expired.is_empty());

    let current = service.get_policy(&customer, policy.id).await.unwrap();
    assert_eq!(current.status, PolicyStatus::Active);
    assert_eq!(current.end_date, renewed.end_date);
}

#[tokio::test]
async fn test_burst_of_same_day_applications_never_share_a_number() {
    let store = InMemoryStore::with_plans(vec![gold_plan()]).await;
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap()));
    let service = Arc::new(
        LifecycleService::with_clock(Arc::new(store), clock, LifecycleConfig::default()).unwrap(),
    );

    let mut tasks = Vec::new();
    for i in 0..4 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            let caller = Caller::customer(UserId::new());
            service
                .submit_application(&caller, applicant(&format!("Applicant {i}")))
                .await
        }));
    }

    let mut numbers = HashSet::new();
    for task in tasks {
        let application = task.await.unwrap().unwrap();
        assert!(application.application_number.starts_with("HLT-20250602-"));
        numbers.insert(application.application_number);
    }
    assert_eq!(numbers.len(), 4);

    let admin = Caller::admin(UserId::new());
    let all = service.list_applications(&admin, Page::default()).await.unwrap();
    assert_eq!(all.len(), 4);
}
