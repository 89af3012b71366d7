//! Monetary amount helpers
//!
//! The portal operates in a single currency, so amounts are plain
//! `rust_decimal::Decimal` values with two-decimal semantics. This module
//! centralises rounding and tolerance comparison so every workflow rounds
//! the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of decimal places carried by stored amounts
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to two decimal places, half away from zero
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole number, half away from zero
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true when `a` and `b` differ by no more than `tolerance`
pub fn amounts_match(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// Expresses `part` as a percentage of `whole`
///
/// Returns `None` when `whole` is zero; callers render that as "N/A".
pub fn percentage_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    Some(round_amount(part / whole * dec!(100)))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounding_is_idempotent(minor in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..6) {
            let value = Decimal::new(minor, scale);
            let once = round_amount(value);
            prop_assert_eq!(round_amount(once), once);
            prop_assert!(once.scale() <= AMOUNT_DECIMAL_PLACES);
        }
    }
}
