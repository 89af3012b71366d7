//! Premium quoting
//!
//! Vehicle premiums use a multiplicative factor model: a flat base premium
//! scaled by five independent risk factors, each looked up from a fixed
//! table. Health premiums are the selected plan's monthly base, unadjusted.
//!
//! ```text
//! final = round(base × vehicle_type × driver_age × experience × coverage × deductible)
//! ```
//!
//! Every function here is pure; nothing touches storage.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::money::{round_amount, round_whole};
use core_kernel::FieldError;

use crate::plan::Plan;

/// Default flat premium every vehicle quote starts from
pub const DEFAULT_BASE_PREMIUM: Decimal = dec!(500);

/// Body style of the insured vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Sedan,
    Suv,
    Truck,
    Motorcycle,
    Van,
}

impl VehicleType {
    pub fn factor(&self) -> Decimal {
        match self {
            VehicleType::Sedan => dec!(1.0),
            VehicleType::Suv => dec!(1.2),
            VehicleType::Truck => dec!(1.3),
            VehicleType::Motorcycle => dec!(1.5),
            VehicleType::Van => dec!(1.1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "sedan",
            VehicleType::Suv => "suv",
            VehicleType::Truck => "truck",
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Van => "van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sedan" => Ok(VehicleType::Sedan),
            "suv" => Ok(VehicleType::Suv),
            "truck" => Ok(VehicleType::Truck),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            "van" => Ok(VehicleType::Van),
            other => Err(FieldError::invalid("vehicle_type", format!("unknown vehicle type '{other}'"))),
        }
    }
}

/// Scope of vehicle cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageType {
    Liability,
    Collision,
    Comprehensive,
    Full,
}

impl CoverageType {
    pub fn factor(&self) -> Decimal {
        match self {
            CoverageType::Liability => dec!(1.0),
            CoverageType::Collision => dec!(1.2),
            CoverageType::Comprehensive => dec!(1.3),
            CoverageType::Full => dec!(1.5),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::Liability => "liability",
            CoverageType::Collision => "collision",
            CoverageType::Comprehensive => "comprehensive",
            CoverageType::Full => "full",
        }
    }
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liability" => Ok(CoverageType::Liability),
            "collision" => Ok(CoverageType::Collision),
            "comprehensive" => Ok(CoverageType::Comprehensive),
            "full" => Ok(CoverageType::Full),
            other => Err(FieldError::invalid("coverage_type", format!("unknown coverage type '{other}'"))),
        }
    }
}

/// Driver age bracket multiplier
pub fn driver_age_factor(age: u32) -> Decimal {
    match age {
        0..=24 => dec!(1.5),
        25..=35 => dec!(1.2),
        36..=50 => dec!(1.0),
        _ => dec!(1.1),
    }
}

/// Driving experience bracket multiplier, in whole years
pub fn driver_experience_factor(years: u32) -> Decimal {
    match years {
        0..=2 => dec!(1.4),
        3..=5 => dec!(1.2),
        6..=10 => dec!(1.0),
        _ => dec!(0.9),
    }
}

/// Deductible multiplier; amounts outside the table are neutral
pub fn deductible_factor(deductible: u32) -> Decimal {
    match deductible {
        250 => dec!(1.0),
        500 => dec!(0.9),
        1000 => dec!(0.8),
        2000 => dec!(0.7),
        _ => dec!(1.0),
    }
}

/// Risk attributes feeding a vehicle quote
///
/// Any attribute left as `None` contributes a neutral multiplier of 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub vehicle_type: Option<VehicleType>,
    pub driver_age: Option<u32>,
    pub driver_experience_years: Option<u32>,
    pub coverage_type: Option<CoverageType>,
    pub deductible: Option<u32>,
}

/// The five multipliers applied to the base premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumFactors {
    pub vehicle_type: Decimal,
    pub driver_age: Decimal,
    pub driver_experience: Decimal,
    pub coverage_type: Decimal,
    pub deductible: Decimal,
}

impl PremiumFactors {
    pub fn product(&self) -> Decimal {
        self.vehicle_type * self.driver_age * self.driver_experience * self.coverage_type * self.deductible
    }
}

/// A quoted premium together with how it was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    pub base_premium: Decimal,
    pub factors: PremiumFactors,
    pub final_premium: Decimal,
}

/// Quotes vehicle premiums from a risk profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumCalculator {
    base_premium: Decimal,
}

impl PremiumCalculator {
    pub fn new(base_premium: Decimal) -> Self {
        Self { base_premium }
    }

    pub fn base_premium(&self) -> Decimal {
        self.base_premium
    }

    /// Looks up each factor and multiplies them into the final premium
    pub fn quote(&self, profile: &RiskProfile) -> PremiumBreakdown {
        let neutral = dec!(1.0);
        let factors = PremiumFactors {
            vehicle_type: profile.vehicle_type.map_or(neutral, |v| v.factor()),
            driver_age: profile.driver_age.map_or(neutral, driver_age_factor),
            driver_experience: profile.driver_experience_years.map_or(neutral, driver_experience_factor),
            coverage_type: profile.coverage_type.map_or(neutral, |c| c.factor()),
            deductible: profile.deductible.map_or(neutral, deductible_factor),
        };

        PremiumBreakdown {
            base_premium: self.base_premium,
            factors,
            final_premium: round_whole(self.base_premium * factors.product()),
        }
    }
}

impl Default for PremiumCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PREMIUM)
    }
}

/// Health premium for a plan
///
/// The plan's monthly base is passed through unchanged; there is no
/// risk adjustment for health cover yet.
pub fn health_premium(plan: &Plan) -> Decimal {
    round_amount(plan.monthly_premium_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_quote() {
        let profile = RiskProfile {
            vehicle_type: Some(VehicleType::Sedan),
            driver_age: Some(30),
            driver_experience_years: Some(8),
            coverage_type: Some(CoverageType::Comprehensive),
            deductible: Some(500),
        };

        let quote = PremiumCalculator::default().quote(&profile);

        assert_eq!(quote.base_premium, dec!(500));
        assert_eq!(quote.factors.driver_age, dec!(1.2));
        assert_eq!(quote.final_premium, dec!(702));
    }

    #[test]
    fn test_empty_profile_is_base_premium() {
        let quote = PremiumCalculator::default().quote(&RiskProfile::default());
        assert_eq!(quote.factors.product(), dec!(1.0));
        assert_eq!(quote.final_premium, dec!(500));
    }

    #[test]
    fn test_bracket_edges() {
        assert_eq!(driver_age_factor(24), dec!(1.5));
        assert_eq!(driver_age_factor(25), dec!(1.2));
        assert_eq!(driver_age_factor(35), dec!(1.2));
        assert_eq!(driver_age_factor(36), dec!(1.0));
        assert_eq!(driver_age_factor(50), dec!(1.0));
        assert_eq!(driver_age_factor(51), dec!(1.1));

        assert_eq!(driver_experience_factor(2), dec!(1.4));
        assert_eq!(driver_experience_factor(3), dec!(1.2));
        assert_eq!(driver_experience_factor(5), dec!(1.2));
        assert_eq!(driver_experience_factor(6), dec!(1.0));
        assert_eq!(driver_experience_factor(10), dec!(1.0));
        assert_eq!(driver_experience_factor(11), dec!(0.9));
    }

    #[test]
    fn test_unlisted_deductible_is_neutral() {
        assert_eq!(deductible_factor(750), dec!(1.0));
        assert_eq!(deductible_factor(2000), dec!(0.7));
    }

    #[test]
    fn test_parse_vehicle_and_coverage_types() {
        assert_eq!("SUV".parse::<VehicleType>().unwrap(), VehicleType::Suv);
        assert_eq!(" full ".parse::<CoverageType>().unwrap(), CoverageType::Full);
        let err = "hovercraft".parse::<VehicleType>().unwrap_err();
        assert_eq!(err.field, "vehicle_type");
    }
}
