//! Renewal window management
//!
//! A policy may be renewed while `now` lies within a configurable number of
//! days either side of its end date. Renewal extends the term by one calendar
//! year and opens a new payment cycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::{add_calendar_years, days_until_ceil};
use core_kernel::UserId;

use crate::aggregate::{Policy, PolicyPaymentStatus, PolicyStatus};
use crate::error::RenewalError;

/// Default half-width of the renewal window, in days
pub const DEFAULT_RENEWAL_WINDOW_DAYS: u32 = 60;

/// Default horizon for expiry alerts, in days
pub const DEFAULT_EXPIRY_HORIZON_DAYS: u32 = 30;

/// Decides renewal eligibility and computes the renewed term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalWindow {
    window_days: u32,
}

impl RenewalWindow {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// How long a policy stays renewable after its end date
    pub fn grace_period(&self) -> Duration {
        Duration::days(i64::from(self.window_days))
    }

    /// True when the policy is active and `now` is within the window around its end date
    pub fn can_renew(&self, policy: &Policy, now: DateTime<Utc>) -> bool {
        if policy.status != PolicyStatus::Active {
            return false;
        }
        let window = self.grace_period();
        now >= policy.end_date - window && now <= policy.end_date + window
    }

    /// Returns the renewed policy
    ///
    /// Ownership is checked before the window. On success `end_date` and
    /// `renewal_date` each move forward one calendar year, the reminder flag
    /// is cleared and the payment status returns to pending.
    pub fn renew(
        &self,
        policy: &Policy,
        requester: UserId,
        now: DateTime<Utc>,
    ) -> Result<Policy, RenewalError> {
        if !policy.is_owned_by(requester) {
            return Err(RenewalError::NotOwner {
                policy_number: policy.policy_number.clone(),
                requester,
            });
        }
        if !self.can_renew(policy, now) {
            return Err(RenewalError::OutsideRenewalWindow {
                policy_number: policy.policy_number.clone(),
            });
        }

        let mut renewed = policy.clone();
        renewed.end_date = add_calendar_years(policy.end_date, 1)?;
        renewed.renewal_date = add_calendar_years(policy.renewal_date, 1)?;
        renewed.renewal_reminder_sent = false;
        renewed.payment_status = PolicyPaymentStatus::Pending;
        renewed.updated_at = now;
        Ok(renewed)
    }
}

impl Default for RenewalWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RENEWAL_WINDOW_DAYS)
    }
}

/// A policy nearing its end date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringPolicy {
    #[serde(flatten)]
    pub policy: Policy,
    pub days_until_expiry: i64,
}

/// Active policies ending within the next `days` days, soonest first
///
/// Policies that have already ended are excluded; one ending exactly now is
/// included with zero days left.
pub fn expiring_within<I>(policies: I, days: u32, now: DateTime<Utc>) -> Vec<ExpiringPolicy>
where
    I: IntoIterator<Item = Policy>,
{
    let horizon = now + Duration::days(i64::from(days));

    let mut expiring: Vec<ExpiringPolicy> = policies
        .into_iter()
        .filter(|p| p.status == PolicyStatus::Active && p.end_date >= now && p.end_date <= horizon)
        .map(|policy| ExpiringPolicy {
            days_until_expiry: days_until_ceil(now, policy.end_date),
            policy,
        })
        .collect();

    expiring.sort_by_key(|e| e.policy.end_date);
    expiring
}
