//! Pre-built Test Fixtures
//!
//! Ready-to-use lifecycle data. Values are fixed so that derived numbers
//! (premiums, dates, sequence numbers) are predictable in assertions.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::PlanId;
use domain_claims::{ClaimDetails, HealthTreatment, VehicleIncident};
use domain_policy::{ApplicationDetails, CoverageType, HealthDetails, Plan, VehicleDetails, VehicleType};

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant most tests run at (Mar 14, 2025 10:00 UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    /// One calendar year after [`TemporalFixtures::now`]
    pub fn one_year_later() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    }

    /// A loss or treatment date a few days before `now`
    pub fn incident_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    pub fn march_2025() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
    }
}

/// Fixture for health plans
pub struct PlanFixtures;

impl PlanFixtures {
    pub fn silver() -> Plan {
        Plan {
            id: PlanId::new(),
            name: "Silver".to_string(),
            description: Some("Individual cover".to_string()),
            coverage_amount: dec!(500000),
            monthly_premium_base: dec!(149.50),
            deductible: dec!(1000),
            copay: dec!(20),
            features: vec!["hospitalisation".to_string()],
            active: true,
        }
    }

    pub fn gold() -> Plan {
        Plan {
            id: PlanId::new(),
            name: "Gold".to_string(),
            description: Some("Family floater".to_string()),
            coverage_amount: dec!(1000000),
            monthly_premium_base: dec!(249.99),
            deductible: dec!(500),
            copay: dec!(10),
            features: vec!["hospitalisation".to_string(), "maternity".to_string()],
            active: true,
        }
    }

    /// A plan that may no longer be selected
    pub fn retired() -> Plan {
        Plan {
            name: "Bronze (retired)".to_string(),
            active: false,
            ..Self::silver()
        }
    }
}

/// Fixture for application and claim payloads
pub struct DetailFixtures;

impl DetailFixtures {
    /// Sedan, driver 30 with 8 years' experience, comprehensive, deductible 500
    pub fn sedan() -> VehicleDetails {
        VehicleDetails {
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2021,
            registration_number: "KA-01-AB-1234".to_string(),
            vehicle_type: VehicleType::Sedan,
            driver_age: 30,
            driver_experience_years: 8,
            coverage_type: CoverageType::Comprehensive,
            deductible: 500,
            document_names: vec!["rc.pdf".to_string()],
        }
    }

    /// The quote for [`DetailFixtures::sedan`]
    pub fn sedan_premium() -> Decimal {
        dec!(702)
    }

    pub fn vehicle_application() -> ApplicationDetails {
        ApplicationDetails::Vehicle(Self::sedan())
    }

    pub fn applicant() -> HealthDetails {
        HealthDetails {
            full_name: "Asha Rao".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            gender: Some("female".to_string()),
            phone: "+91 98450 00000".to_string(),
            address: "12 MG Road, Bengaluru".to_string(),
            smoker: false,
            pre_existing_conditions: vec![],
            current_medications: vec![],
            document_names: vec![],
        }
    }

    pub fn health_application() -> ApplicationDetails {
        ApplicationDetails::Health(Self::applicant())
    }

    pub fn collision() -> ClaimDetails {
        ClaimDetails::Vehicle(VehicleIncident {
            incident_date: TemporalFixtures::incident_date(),
            location: "Outer Ring Road".to_string(),
            description: "Side collision at junction".to_string(),
            police_report_number: Some("FIR-2025-0042".to_string()),
            document_names: vec!["photos.zip".to_string()],
        })
    }

    pub fn hospital_stay() -> ClaimDetails {
        ClaimDetails::Health(HealthTreatment {
            treatment_date: TemporalFixtures::incident_date(),
            hospital_name: "City General".to_string(),
            diagnosis: "Acute bronchitis".to_string(),
            treatment_description: Some("Two nights observation".to_string()),
            document_names: vec!["discharge.pdf".to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_details_are_valid() {
        let today = TemporalFixtures::now().date_naive();
        assert!(DetailFixtures::vehicle_application().validate(today).is_ok());
        assert!(DetailFixtures::health_application().validate(today).is_ok());
        assert!(DetailFixtures::collision().validate(today).is_ok());
        assert!(DetailFixtures::hospital_stay().validate(today).is_ok());
    }

    #[test]
    fn test_retired_plan_is_inactive() {
        assert!(!PlanFixtures::retired().active);
    }
}
