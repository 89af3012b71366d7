//! Lifecycle configuration
//!
//! Every business constant the workflows depend on is configured here and
//! handed to [`LifecycleService`](crate::LifecycleService) at construction.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{CoreError, Timezone};
use domain_billing::DEFAULT_PAYMENT_TOLERANCE;
use domain_policy::premium::DEFAULT_BASE_PREMIUM;
use domain_policy::renewal::{DEFAULT_EXPIRY_HORIZON_DAYS, DEFAULT_RENEWAL_WINDOW_DAYS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Days either side of a policy's end date during which it may be renewed
    #[serde(default = "default_renewal_window_days")]
    pub renewal_window_days: u32,

    /// Default look-ahead for expiring-policy alerts
    #[serde(default = "default_expiry_horizon_days")]
    pub expiry_horizon_days: u32,

    #[serde(default = "default_policy_term_years")]
    pub policy_term_years: u32,

    /// Largest accepted difference between a payment and the amount due
    #[serde(default = "default_payment_tolerance")]
    pub payment_tolerance: Decimal,

    /// Attempts at allocating a unique number before giving up
    #[serde(default = "default_sequence_max_attempts")]
    pub sequence_max_attempts: u32,

    #[serde(default = "default_base_premium")]
    pub base_premium: Decimal,

    /// Calendar used for the year and day buckets of generated numbers
    #[serde(default)]
    pub timezone: Timezone,
}

fn default_renewal_window_days() -> u32 {
    DEFAULT_RENEWAL_WINDOW_DAYS
}

fn default_expiry_horizon_days() -> u32 {
    DEFAULT_EXPIRY_HORIZON_DAYS
}

fn default_policy_term_years() -> u32 {
    1
}

fn default_payment_tolerance() -> Decimal {
    DEFAULT_PAYMENT_TOLERANCE
}

fn default_sequence_max_attempts() -> u32 {
    5
}

fn default_base_premium() -> Decimal {
    DEFAULT_BASE_PREMIUM
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            renewal_window_days: default_renewal_window_days(),
            expiry_horizon_days: default_expiry_horizon_days(),
            policy_term_years: default_policy_term_years(),
            payment_tolerance: default_payment_tolerance(),
            sequence_max_attempts: default_sequence_max_attempts(),
            base_premium: default_base_premium(),
            timezone: Timezone::default(),
        }
    }
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.policy_term_years == 0 {
            return Err(CoreError::configuration("policy_term_years must be at least 1"));
        }
        if self.sequence_max_attempts == 0 {
            return Err(CoreError::configuration("sequence_max_attempts must be at least 1"));
        }
        if self.payment_tolerance < Decimal::ZERO {
            return Err(CoreError::configuration("payment_tolerance must not be negative"));
        }
        if self.base_premium <= dec!(0) {
            return Err(CoreError::configuration("base_premium must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LifecycleConfig::default();
        assert_eq!(config.renewal_window_days, 60);
        assert_eq!(config.expiry_horizon_days, 30);
        assert_eq!(config.payment_tolerance, dec!(0.01));
        assert_eq!(config.base_premium, dec!(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: LifecycleConfig =
            serde_json::from_str(r#"{"renewal_window_days": 45, "timezone": "Asia/Kolkata"}"#).unwrap();
        assert_eq!(config.renewal_window_days, 45);
        assert_eq!(config.sequence_max_attempts, 5);
        assert_eq!(config.timezone, "Asia/Kolkata".parse::<Timezone>().unwrap());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = LifecycleConfig {
            sequence_max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
