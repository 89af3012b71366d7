//! Claim review workflow tests

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{PolicyId, UserId};
use domain_claims::workflow::{apply, ClaimReview};
use domain_claims::{Claim, ClaimDetails, ClaimError, ClaimStatus, FileClaim, VehicleIncident};

fn filed_claim() -> Claim {
    Claim::file(FileClaim {
        claim_number: "CLM-2025-001".to_string(),
        policy_id: PolicyId::new(),
        user_id: UserId::new(),
        details: ClaimDetails::Vehicle(VehicleIncident {
            incident_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            location: "Ring Road junction".to_string(),
            description: "Rear-ended at a signal".to_string(),
            police_report_number: Some("PR-7781".to_string()),
            document_names: vec!["photo1.jpg".to_string()],
        }),
        claim_amount: dec!(1000),
        now: Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap(),
    })
    .unwrap()
}

mod required_fields {
    use super::*;

    #[test]
    fn test_approve_without_amount_fails() {
        let claim = filed_claim();
        let result = apply(&claim, &ClaimReview::to(ClaimStatus::Approved), UserId::new(), Utc::now());

        match result {
            Err(ClaimError::MissingRequiredField { field, .. }) => assert_eq!(field, "approved_amount"),
            other => panic!("Expected MissingRequiredField, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_without_reason_fails() {
        let claim = filed_claim();
        let result = apply(&claim, &ClaimReview::to(ClaimStatus::Rejected), UserId::new(), Utc::now());
        assert!(matches!(result, Err(ClaimError::MissingRequiredField { .. })));
    }

    #[test]
    fn test_reject_with_blank_reason_fails() {
        let claim = filed_claim();
        let review = ClaimReview::to(ClaimStatus::Rejected).with_rejection_reason("   ");
        let result = apply(&claim, &review, UserId::new(), Utc::now());
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_unknown_status_fails() {
        let claim = filed_claim();
        let review = ClaimReview {
            status: "escalated".to_string(),
            ..Default::default()
        };
        let result = apply(&claim, &review, UserId::new(), Utc::now());
        assert!(matches!(result, Err(ClaimError::InvalidStatus(s)) if s == "escalated"));
    }

    #[test]
    fn test_moving_back_to_submitted_fails() {
        let claim = filed_claim();
        let result = apply(&claim, &ClaimReview::to(ClaimStatus::Submitted), UserId::new(), Utc::now());
        assert!(matches!(result, Err(ClaimError::InvalidTransition { .. })));
    }

    #[test]
    fn test_paid_without_any_amount_fails() {
        let claim = filed_claim();
        let result = apply(&claim, &ClaimReview::to(ClaimStatus::Paid), UserId::new(), Utc::now());
        assert!(matches!(result, Err(ClaimError::MissingRequiredField { .. })));
    }
}

mod transitions {
    use super::*;

    #[test]
    fn test_approve_then_pay_keeps_amount() {
        let admin = UserId::new();
        let claim = filed_claim();
        let t1 = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        let t2 = t1 + Duration::days(3);

        let approved = apply(
            &claim,
            &ClaimReview::to(ClaimStatus::Approved).with_approved_amount(dec!(900)),
            admin,
            t1,
        )
        .unwrap();
        let paid = apply(&approved, &ClaimReview::to(ClaimStatus::Paid), admin, t2).unwrap();

        assert_eq!(paid.status, ClaimStatus::Paid);
        assert_eq!(paid.approved_amount, Some(dec!(900)));
        assert!(paid.rejection_reason.is_none());
        assert_eq!(paid.reviewed_at, Some(t1));
        assert_eq!(paid.updated_at, t2);
        assert_eq!(paid.reviewed_by, Some(admin));
    }

    #[test]
    fn test_reviewed_at_is_set_once() {
        let claim = filed_claim();
        let first = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        let later = first + Duration::hours(6);

        let in_review = apply(&claim, &ClaimReview::to(ClaimStatus::UnderReview), UserId::new(), first).unwrap();
        assert_eq!(in_review.reviewed_at, Some(first));

        let explicit = ClaimReview {
            reviewed_at: Some(later + Duration::days(1)),
            ..ClaimReview::to(ClaimStatus::UnderReview)
        };
        let again = apply(&in_review, &explicit, UserId::new(), later).unwrap();
        assert_eq!(again.reviewed_at, Some(first));
        assert_eq!(again.updated_at, later);
    }

    #[test]
    fn test_explicit_reviewed_at_used_on_first_review() {
        let claim = filed_claim();
        let supplied = Utc.with_ymd_and_hms(2025, 3, 4, 16, 30, 0).unwrap();
        let review = ClaimReview {
            reviewed_at: Some(supplied),
            ..ClaimReview::to(ClaimStatus::UnderReview)
        };

        let updated = apply(&claim, &review, UserId::new(), Utc::now()).unwrap();
        assert_eq!(updated.reviewed_at, Some(supplied));
    }

    #[test]
    fn test_rejecting_approved_claim_clears_amount() {
        let admin = UserId::new();
        let approved = apply(
            &filed_claim(),
            &ClaimReview::to(ClaimStatus::Approved).with_approved_amount(dec!(750)),
            admin,
            Utc::now(),
        )
        .unwrap();

        let rejected = apply(
            &approved,
            &ClaimReview::to(ClaimStatus::Rejected)
                .with_rejection_reason("Duplicate of CLM-2025-000")
                .with_admin_notes("Checked against prior claim"),
            admin,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert!(rejected.approved_amount.is_none());
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Duplicate of CLM-2025-000"));
        assert_eq!(rejected.admin_notes.as_deref(), Some("Checked against prior claim"));
    }

    #[test]
    fn test_failed_review_leaves_claim_untouched() {
        let claim = filed_claim();
        let snapshot = claim.clone();
        let _ = apply(&claim, &ClaimReview::to(ClaimStatus::Approved), UserId::new(), Utc::now());
        assert_eq!(claim, snapshot);
    }

    #[test]
    fn test_unknown_request_fields_are_ignored() {
        let review: ClaimReview = serde_json::from_value(serde_json::json!({
            "status": "approved",
            "approved_amount": "900",
            "claim_amount": "5",
            "user_id": "ignored"
        }))
        .unwrap();

        let updated = apply(&filed_claim(), &review, UserId::new(), Utc::now()).unwrap();
        assert_eq!(updated.claim_amount, dec!(1000));
        assert_eq!(updated.approved_amount, Some(dec!(900)));
    }
}

mod invariants {
    use super::*;
    use proptest::prelude::*;

    fn review_strategy() -> impl Strategy<Value = ClaimReview> {
        (
            prop_oneof![
                Just(ClaimStatus::UnderReview),
                Just(ClaimStatus::Approved),
                Just(ClaimStatus::Rejected),
                Just(ClaimStatus::Paid),
            ],
            proptest::option::of(0u32..100_000),
            proptest::option::of("[a-z]{1,12}"),
        )
            .prop_map(|(status, amount, reason)| ClaimReview {
                status: status.as_str().to_string(),
                approved_amount: amount.map(rust_decimal::Decimal::from),
                rejection_reason: reason,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn amount_and_reason_track_status(reviews in proptest::collection::vec(review_strategy(), 1..8)) {
            let admin = UserId::new();
            let mut claim = filed_claim();
            let mut first_review = None;

            for (i, review) in reviews.iter().enumerate() {
                let now = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
                if let Ok(next) = apply(&claim, review, admin, now) {
                    if first_review.is_none() {
                        first_review = Some(now);
                    }
                    claim = next;
                    prop_assert_eq!(claim.updated_at, now);
                }

                prop_assert_eq!(claim.approved_amount.is_some(), claim.status.is_approved());
                prop_assert_eq!(claim.rejection_reason.is_some(), claim.status == ClaimStatus::Rejected);
                prop_assert_eq!(claim.reviewed_at, first_review);
            }
        }
    }
}
