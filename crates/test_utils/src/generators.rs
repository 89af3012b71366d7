//! Test Data Generators
//!
//! Proptest strategies that respect domain invariants, plus `fake`-backed
//! helpers for realistic-looking applicant data.

use chrono::{Duration, NaiveDate};
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::{ClaimDetails, ClaimStatus, VehicleIncident};
use domain_policy::{CoverageType, HealthDetails, RiskProfile, VehicleDetails, VehicleType};

pub fn vehicle_type_strategy() -> impl Strategy<Value = VehicleType> {
    prop_oneof![
        Just(VehicleType::Sedan),
        Just(VehicleType::Suv),
        Just(VehicleType::Truck),
        Just(VehicleType::Motorcycle),
        Just(VehicleType::Van),
    ]
}

pub fn coverage_type_strategy() -> impl Strategy<Value = CoverageType> {
    prop_oneof![
        Just(CoverageType::Liability),
        Just(CoverageType::Collision),
        Just(CoverageType::Comprehensive),
        Just(CoverageType::Full),
    ]
}

/// Deductibles offered to applicants, plus a few off-menu values
pub fn deductible_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(250), Just(500), Just(1000), Just(2000), 0u32..5000]
}

/// Complete risk profiles for a licensed driver
pub fn risk_profile_strategy() -> impl Strategy<Value = RiskProfile> {
    (
        vehicle_type_strategy(),
        16u32..100,
        coverage_type_strategy(),
        deductible_strategy(),
    )
        .prop_flat_map(|(vehicle_type, age, coverage, deductible)| {
            (0..=age - 16).prop_map(move |experience| RiskProfile {
                vehicle_type: Some(vehicle_type),
                driver_age: Some(age),
                driver_experience_years: Some(experience),
                coverage_type: Some(coverage),
                deductible: Some(deductible),
            })
        })
}

/// Valid vehicle details for a car registered up to this year
pub fn vehicle_details_strategy() -> impl Strategy<Value = VehicleDetails> {
    (
        prop_oneof![Just("Toyota"), Just("Honda"), Just("Maruti"), Just("Tata")],
        "[A-Z][a-z]{3,8}",
        1990i32..=2025,
        "[A-Z]{2}-[0-9]{2}-[A-Z]{2}-[0-9]{4}",
        risk_profile_strategy(),
    )
        .prop_map(|(make, model, year, registration, profile)| VehicleDetails {
            make: make.to_string(),
            model,
            year,
            registration_number: registration,
            vehicle_type: profile.vehicle_type.unwrap_or(VehicleType::Sedan),
            driver_age: profile.driver_age.unwrap_or(30),
            driver_experience_years: profile.driver_experience_years.unwrap_or(0),
            coverage_type: profile.coverage_type.unwrap_or(CoverageType::Liability),
            deductible: profile.deductible.unwrap_or(0),
            document_names: vec![],
        })
}

/// Positive claim amounts with up to two decimal places
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Submitted),
        Just(ClaimStatus::UnderReview),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
        Just(ClaimStatus::Paid),
    ]
}

/// Dates within 2025
pub fn date_2025_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|days| NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(days))
}

/// Vehicle incidents on a date within 2025
pub fn vehicle_incident_strategy() -> impl Strategy<Value = ClaimDetails> {
    (date_2025_strategy(), "[A-Z][a-z]{4,10} Road").prop_map(|(incident_date, location)| {
        ClaimDetails::Vehicle(VehicleIncident {
            incident_date,
            location,
            description: "Rear-ended in traffic".to_string(),
            police_report_number: None,
            document_names: vec![],
        })
    })
}

/// A health applicant with faked personal details
pub fn fake_applicant() -> HealthDetails {
    let building: String = BuildingNumber().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let birth_year: i32 = (1945..2005).fake();

    HealthDetails {
        full_name: Name().fake(),
        date_of_birth: NaiveDate::from_ymd_opt(birth_year, 6, 15).unwrap(),
        gender: None,
        phone: PhoneNumber().fake(),
        address: format!("{building} {street}, {city}"),
        smoker: false,
        pre_existing_conditions: vec![],
        current_medications: vec![],
        document_names: vec![],
    }
}
