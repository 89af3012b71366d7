//! Renewal window and expiry alert tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{ApplicationId, PolicyId, UserId};
use domain_policy::renewal::expiring_within;
use domain_policy::{
    InsuranceKind, Policy, PolicyPaymentStatus, PolicyStatus, RenewalError, RenewalWindow,
};
use rust_decimal_macros::dec;

fn policy_ending(owner: UserId, end_date: DateTime<Utc>) -> Policy {
    let start_date = end_date - Duration::days(365);
    Policy {
        id: PolicyId::new(),
        policy_number: "HP-20240101-0001".to_string(),
        user_id: owner,
        application_id: ApplicationId::new(),
        plan_id: None,
        kind: InsuranceKind::Health,
        premium: dec!(120),
        start_date,
        end_date,
        renewal_date: end_date,
        status: PolicyStatus::Active,
        payment_status: PolicyPaymentStatus::Paid,
        renewal_reminder_sent: true,
        created_at: start_date,
        updated_at: start_date,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap()
}

mod window {
    use super::*;

    #[test]
    fn test_policy_ending_in_45_days_is_renewable() {
        let owner = UserId::new();
        let policy = policy_ending(owner, now() + Duration::days(45));
        assert!(RenewalWindow::default().can_renew(&policy, now()));
    }

    #[test]
    fn test_policy_ending_in_90_days_is_not_renewable() {
        let policy = policy_ending(UserId::new(), now() + Duration::days(90));
        assert!(!RenewalWindow::default().can_renew(&policy, now()));
    }

    #[test]
    fn test_policy_ended_90_days_ago_is_not_renewable() {
        let policy = policy_ending(UserId::new(), now() - Duration::days(90));
        assert!(!RenewalWindow::default().can_renew(&policy, now()));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = RenewalWindow::default();
        let before = policy_ending(UserId::new(), now() + Duration::days(60));
        let after = policy_ending(UserId::new(), now() - Duration::days(60));
        assert!(window.can_renew(&before, now()));
        assert!(window.can_renew(&after, now()));
    }

    #[test]
    fn test_cancelled_policy_is_not_renewable() {
        let mut policy = policy_ending(UserId::new(), now() + Duration::days(10));
        policy.status = PolicyStatus::Cancelled;
        assert!(!RenewalWindow::default().can_renew(&policy, now()));
    }

    #[test]
    fn test_configured_window_width() {
        let policy = policy_ending(UserId::new(), now() + Duration::days(75));
        assert!(!RenewalWindow::new(60).can_renew(&policy, now()));
        assert!(RenewalWindow::new(90).can_renew(&policy, now()));
    }
}

mod renew {
    use super::*;

    #[test]
    fn test_renew_extends_term_by_calendar_year() {
        let owner = UserId::new();
        let end = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let policy = policy_ending(owner, end);

        let renewed = RenewalWindow::default().renew(&policy, owner, now()).unwrap();

        assert_eq!(renewed.end_date, Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap());
        assert_eq!(renewed.renewal_date, Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap());
        assert_eq!((renewed.end_date - policy.end_date).num_days(), 365);
        assert_eq!(renewed.payment_status, PolicyPaymentStatus::Pending);
        assert!(!renewed.renewal_reminder_sent);
        assert_eq!(renewed.status, PolicyStatus::Active);
        assert_eq!(renewed.start_date, policy.start_date);
        assert_eq!(renewed.updated_at, now());
    }

    #[test]
    fn test_renew_across_leap_year_adds_366_days() {
        let owner = UserId::new();
        let end = Utc.with_ymd_and_hms(2027, 4, 1, 0, 0, 0).unwrap();
        let policy = policy_ending(owner, end);
        let at = end - Duration::days(5);

        let renewed = RenewalWindow::default().renew(&policy, owner, at).unwrap();
        assert_eq!((renewed.end_date - policy.end_date).num_days(), 366);
    }

    #[test]
    fn test_renew_by_other_user_fails() {
        let policy = policy_ending(UserId::new(), now() + Duration::days(10));
        let result = RenewalWindow::default().renew(&policy, UserId::new(), now());
        assert!(matches!(result, Err(RenewalError::NotOwner { .. })));
    }

    #[test]
    fn test_renew_outside_window_fails() {
        let owner = UserId::new();
        let policy = policy_ending(owner, now() + Duration::days(200));
        let result = RenewalWindow::default().renew(&policy, owner, now());
        assert!(matches!(result, Err(RenewalError::OutsideRenewalWindow { .. })));
    }
}

mod expiring {
    use super::*;

    #[test]
    fn test_expiring_within_filters_and_annotates() {
        let owner = UserId::new();
        let soon = policy_ending(owner, now() + Duration::days(10));
        let edge = policy_ending(owner, now() + Duration::days(30));
        let later = policy_ending(owner, now() + Duration::days(31));
        let expired = policy_ending(owner, now() - Duration::days(1));

        let result = expiring_within(vec![later, edge, expired, soon], 30, now());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].days_until_expiry, 10);
        assert_eq!(result[1].days_until_expiry, 30);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let owner = UserId::new();
        let policy = policy_ending(owner, now() + Duration::hours(5));
        let result = expiring_within(vec![policy], 30, now());
        assert_eq!(result[0].days_until_expiry, 1);
    }

    #[test]
    fn test_inactive_policies_are_not_alerted() {
        let mut policy = policy_ending(UserId::new(), now() + Duration::days(5));
        policy.status = PolicyStatus::Cancelled;
        assert!(expiring_within(vec![policy], 30, now()).is_empty());
    }
}

mod grace_period {
    use super::*;
    use test_utils::{TemporalFixtures, TestPolicyBuilder};

    #[test]
    fn test_issued_policy_stays_renewable_until_grace_runs_out() {
        let window = RenewalWindow::default();
        let mut policy = TestPolicyBuilder::new().build();
        let end = TemporalFixtures::one_year_later();
        assert_eq!(policy.end_date, end);

        assert!(!window.can_renew(&policy, end - Duration::days(61)));
        assert!(window.can_renew(&policy, end + Duration::days(30)));
        assert!(!policy.expire_if_lapsed(end + Duration::days(30), window.grace_period()).unwrap());

        assert!(policy.expire_if_lapsed(end + Duration::days(61), window.grace_period()).unwrap());
        assert!(!window.can_renew(&policy, end + Duration::days(30)));
    }

    #[test]
    fn test_grace_period_follows_configured_width() {
        assert_eq!(RenewalWindow::new(10).grace_period(), Duration::days(10));
        assert_eq!(RenewalWindow::default().grace_period(), Duration::days(60));
    }

    #[test]
    fn test_cancelled_policy_is_neither_renewed_nor_expired() {
        let mut policy = TestPolicyBuilder::new()
            .ending_in_days(20)
            .with_status(PolicyStatus::Cancelled)
            .build();
        let after_grace = policy.end_date + Duration::days(90);

        assert!(!RenewalWindow::default().can_renew(&policy, TemporalFixtures::now()));
        assert!(!policy.expire_if_lapsed(after_grace, Duration::zero()).unwrap());
        assert_eq!(policy.status, PolicyStatus::Cancelled);
    }
}
