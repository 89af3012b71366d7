//! Human-readable sequential identifiers
//!
//! Application, policy and claim numbers share one shape: a prefix bucket
//! followed by a zero-padded counter, e.g. `HLT-20250314-0007` or
//! `HCL-2025-012`. The counter restarts at 1 in every new bucket.
//!
//! Computing the next number is a pure read-max-then-increment over the
//! numbers already issued under the prefix. It is not atomic on its own: two
//! callers reading the same snapshot produce the same number. Callers must
//! insert behind a uniqueness guarantee and retry on collision.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::temporal::Timezone;

/// How a prefix bucket is derived from the issue date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// `YYYY`; the counter restarts every calendar year
    Year,
    /// `YYYYMMDD`; the counter restarts every calendar day
    Day,
}

/// The kinds of numbers the portal issues, each with its own prefix and width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    VehicleApplication,
    HealthApplication,
    VehiclePolicy,
    HealthPolicy,
    VehicleClaim,
    HealthClaim,
}

impl SequenceKind {
    /// The fixed code that starts every number of this kind
    pub fn code(&self) -> &'static str {
        match self {
            SequenceKind::VehicleApplication => "VEH",
            SequenceKind::HealthApplication => "HLT",
            SequenceKind::VehiclePolicy => "VP",
            SequenceKind::HealthPolicy => "HP",
            SequenceKind::VehicleClaim => "CLM",
            SequenceKind::HealthClaim => "HCL",
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            SequenceKind::VehicleClaim | SequenceKind::HealthClaim => Bucket::Year,
            _ => Bucket::Day,
        }
    }

    /// Zero-pad width of the counter
    pub fn width(&self) -> usize {
        match self.bucket() {
            Bucket::Year => 3,
            Bucket::Day => 4,
        }
    }

    /// Builds the prefix bucket for an instant, e.g. `HCL-2025-`
    pub fn prefix(&self, now: DateTime<Utc>, timezone: &Timezone) -> String {
        let date = timezone.local_date(now);
        match self.bucket() {
            Bucket::Year => format!("{}-{:04}-", self.code(), date.year()),
            Bucket::Day => format!(
                "{}-{:04}{:02}{:02}-",
                self.code(),
                date.year(),
                date.month(),
                date.day()
            ),
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceKind::VehicleApplication => "vehicle_application",
            SequenceKind::HealthApplication => "health_application",
            SequenceKind::VehiclePolicy => "vehicle_policy",
            SequenceKind::HealthPolicy => "health_policy",
            SequenceKind::VehicleClaim => "vehicle_claim",
            SequenceKind::HealthClaim => "health_claim",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence under prefix '{0}' is exhausted")]
    Exhausted(String),
}

/// Parses the counter of `value` if it was issued under `prefix`
///
/// Values under another prefix, or with a non-numeric suffix, yield `None`.
pub fn parse_suffix(prefix: &str, value: &str) -> Option<u64> {
    let suffix = value.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Returns the next identifier under `prefix`
///
/// Takes the largest counter among `existing`, adds one and zero-pads to
/// `width`. Starts at 1 when nothing has been issued yet. A counter wider than
/// `width` is rendered in full rather than truncated.
pub fn next<I, S>(prefix: &str, existing: I, width: usize) -> Result<String, SequenceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max = existing
        .into_iter()
        .filter_map(|value| parse_suffix(prefix, value.as_ref()))
        .max()
        .unwrap_or(0);

    let next = max
        .checked_add(1)
        .ok_or_else(|| SequenceError::Exhausted(prefix.to_string()))?;

    Ok(format!("{prefix}{next:0width$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_first_number_starts_at_one() {
        let empty: Vec<String> = vec![];
        assert_eq!(next("HCL-2025-", empty, 3).unwrap(), "HCL-2025-001");
    }

    #[test]
    fn test_next_takes_max_not_count() {
        let existing = vec!["HLT-20250101-0002", "HLT-20250101-0009", "HLT-20250101-0003"];
        assert_eq!(next("HLT-20250101-", existing, 4).unwrap(), "HLT-20250101-0010");
    }

    #[test]
    fn test_ignores_foreign_and_malformed_values() {
        let existing = vec!["HCL-2024-050", "HCL-2025-abc", "HCL-2025-", "HCL-2025-004"];
        assert_eq!(next("HCL-2025-", existing, 3).unwrap(), "HCL-2025-005");
    }

    #[test]
    fn test_counter_wider_than_pad_is_not_truncated() {
        let existing = vec!["CLM-2025-999"];
        assert_eq!(next("CLM-2025-", existing, 3).unwrap(), "CLM-2025-1000");
    }

    #[test]
    fn test_prefix_buckets() {
        let tz = Timezone::default();
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();

        assert_eq!(SequenceKind::HealthClaim.prefix(now, &tz), "HCL-2025-");
        assert_eq!(SequenceKind::VehicleClaim.prefix(now, &tz), "CLM-2025-");
        assert_eq!(SequenceKind::HealthApplication.prefix(now, &tz), "HLT-20250314-");
        assert_eq!(SequenceKind::HealthPolicy.prefix(now, &tz), "HP-20250314-");
        assert_eq!(SequenceKind::VehicleApplication.prefix(now, &tz), "VEH-20250314-");
        assert_eq!(SequenceKind::VehiclePolicy.prefix(now, &tz), "VP-20250314-");
    }

    #[test]
    fn test_widths() {
        assert_eq!(SequenceKind::HealthClaim.width(), 3);
        assert_eq!(SequenceKind::HealthApplication.width(), 4);
        assert_eq!(SequenceKind::VehiclePolicy.width(), 4);
    }
}
