//! Report DTOs

use chrono::NaiveDate;
use serde::Deserialize;

use app_lifecycle::ReportRequest;
use domain_policy::InsuranceKind;

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub family: Option<InsuranceKind>,
}

impl From<GenerateReportRequest> for ReportRequest {
    fn from(request: GenerateReportRequest) -> Self {
        ReportRequest {
            start_date: request.start_date,
            end_date: request.end_date,
            family: request.family,
        }
    }
}
