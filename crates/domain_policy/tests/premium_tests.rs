//! Premium Calculator Tests
//!
//! Covers the factor tables, the multiplicative formula and the health
//! pass-through. The calculator is pure, so none of these touch storage.

use domain_policy::premium::{
    deductible_factor, driver_age_factor, driver_experience_factor, health_premium, CoverageType,
    PremiumCalculator, RiskProfile, VehicleType,
};
use domain_policy::Plan;
use core_kernel::PlanId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn full_profile(
    vehicle_type: VehicleType,
    age: u32,
    experience: u32,
    coverage: CoverageType,
    deductible: u32,
) -> RiskProfile {
    RiskProfile {
        vehicle_type: Some(vehicle_type),
        driver_age: Some(age),
        driver_experience_years: Some(experience),
        coverage_type: Some(coverage),
        deductible: Some(deductible),
    }
}

mod factor_tables {
    use super::*;

    #[test]
    fn test_vehicle_type_factors() {
        assert_eq!(VehicleType::Sedan.factor(), dec!(1.0));
        assert_eq!(VehicleType::Suv.factor(), dec!(1.2));
        assert_eq!(VehicleType::Truck.factor(), dec!(1.3));
        assert_eq!(VehicleType::Motorcycle.factor(), dec!(1.5));
        assert_eq!(VehicleType::Van.factor(), dec!(1.1));
    }

    #[test]
    fn test_coverage_type_factors() {
        assert_eq!(CoverageType::Liability.factor(), dec!(1.0));
        assert_eq!(CoverageType::Collision.factor(), dec!(1.2));
        assert_eq!(CoverageType::Comprehensive.factor(), dec!(1.3));
        assert_eq!(CoverageType::Full.factor(), dec!(1.5));
    }

    #[test]
    fn test_deductible_factors() {
        assert_eq!(deductible_factor(250), dec!(1.0));
        assert_eq!(deductible_factor(500), dec!(0.9));
        assert_eq!(deductible_factor(1000), dec!(0.8));
        assert_eq!(deductible_factor(2000), dec!(0.7));
    }

    #[test]
    fn test_young_inexperienced_driver_is_most_expensive_bracket() {
        assert_eq!(driver_age_factor(18), dec!(1.5));
        assert_eq!(driver_experience_factor(0), dec!(1.4));
    }
}

mod quotes {
    use super::*;

    #[test]
    fn test_documented_example_quotes_702() {
        let profile = full_profile(VehicleType::Sedan, 28, 7, CoverageType::Comprehensive, 500);
        let quote = PremiumCalculator::default().quote(&profile);

        assert_eq!(quote.factors.vehicle_type, dec!(1.0));
        assert_eq!(quote.factors.driver_age, dec!(1.2));
        assert_eq!(quote.factors.driver_experience, dec!(1.0));
        assert_eq!(quote.factors.coverage_type, dec!(1.3));
        assert_eq!(quote.factors.deductible, dec!(0.9));
        assert_eq!(quote.final_premium, dec!(702));
    }

    #[test]
    fn test_high_risk_quote_rounds_to_whole_amount() {
        // 500 × 1.5 × 1.5 × 1.4 × 1.5 × 1.0 = 2362.5 -> 2363
        let profile = full_profile(VehicleType::Motorcycle, 19, 1, CoverageType::Full, 250);
        let quote = PremiumCalculator::default().quote(&profile);
        assert_eq!(quote.final_premium, dec!(2363));
    }

    #[test]
    fn test_missing_factors_default_to_neutral() {
        let profile = RiskProfile {
            vehicle_type: Some(VehicleType::Truck),
            ..Default::default()
        };
        let quote = PremiumCalculator::default().quote(&profile);

        assert_eq!(quote.factors.driver_age, dec!(1.0));
        assert_eq!(quote.factors.deductible, dec!(1.0));
        assert_eq!(quote.final_premium, dec!(650));
    }

    #[test]
    fn test_configured_base_premium() {
        let calculator = PremiumCalculator::new(dec!(800));
        let quote = calculator.quote(&RiskProfile {
            vehicle_type: Some(VehicleType::Suv),
            ..Default::default()
        });
        assert_eq!(quote.base_premium, dec!(800));
        assert_eq!(quote.final_premium, dec!(960));
    }

    #[test]
    fn test_health_premium_is_plan_base() {
        let plan = Plan {
            id: PlanId::new(),
            name: "Gold".to_string(),
            description: None,
            coverage_amount: dec!(1000000),
            monthly_premium_base: dec!(249.99),
            deductible: dec!(500),
            copay: dec!(10),
            features: vec!["dental".to_string()],
            active: true,
        };
        assert_eq!(health_premium(&plan), dec!(249.99));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{risk_profile_strategy, vehicle_details_strategy};

    proptest! {
        #[test]
        fn final_premium_is_rounded_base_times_factors(profile in risk_profile_strategy()) {
            let calculator = PremiumCalculator::default();

            let first = calculator.quote(&profile);
            let second = calculator.quote(&profile);
            prop_assert_eq!(&first, &second);

            let expected = (dec!(500)
                * profile.vehicle_type.unwrap().factor()
                * driver_age_factor(profile.driver_age.unwrap())
                * driver_experience_factor(profile.driver_experience_years.unwrap())
                * profile.coverage_type.unwrap().factor()
                * deductible_factor(profile.deductible.unwrap()))
                .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(first.final_premium, expected);
            prop_assert!(first.final_premium > Decimal::ZERO);
        }

        #[test]
        fn vehicle_quotes_stay_between_cheapest_and_riskiest(details in vehicle_details_strategy()) {
            let premium = PremiumCalculator::default().quote(&details.risk_profile()).final_premium;

            // 500 x 0.9 x 0.7 and 500 x 1.5 x 1.5 x 1.4 x 1.5, rounded
            prop_assert!(premium >= dec!(315), "premium {} below floor", premium);
            prop_assert!(premium <= dec!(2363), "premium {} above ceiling", premium);
        }
    }
}
