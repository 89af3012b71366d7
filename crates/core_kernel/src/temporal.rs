//! Calendar handling for policy terms, renewal windows and report ranges
//!
//! Timestamps are always stored in UTC. A [`Timezone`] is only consulted when a
//! calendar date has to be derived from an instant, e.g. for the day bucket of
//! an application number.

use chrono::{DateTime, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Number of seconds in one day, used for day-granularity arithmetic
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Timezone wrapper used for calendar bucketing
///
/// Wraps chrono_tz::Tz with string (de)serialisation so it can sit in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC instant to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Returns the local calendar date of a UTC instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod { start: String, end: String },

    #[error("Date arithmetic overflowed for {0}")]
    OutOfRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// An inclusive calendar date range, used for report filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Both bounds are inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Advances an instant by whole calendar years
///
/// February 29th lands on February 28th in a non-leap target year.
pub fn add_calendar_years(instant: DateTime<Utc>, years: u32) -> Result<DateTime<Utc>, TemporalError> {
    instant
        .checked_add_months(Months::new(years.saturating_mul(12)))
        .ok_or_else(|| TemporalError::OutOfRange(instant.to_rfc3339()))
}

/// Whole days from `from` until `to`, rounded up
///
/// A partial day counts as a full day, so an instant 36 hours away is two days
/// away. Negative when `to` is in the past.
pub fn days_until_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let seconds = (to - from).num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();

        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
        assert_eq!(range.days(), 30);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let result = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_add_calendar_years_handles_leap_day() {
        let leap = Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap();
        let next = add_calendar_years(leap, 1).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_days_until_ceil_rounds_partial_days_up() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(days_until_ceil(now, now + Duration::hours(36)), 2);
        assert_eq!(days_until_ceil(now, now + Duration::days(3)), 3);
        assert_eq!(days_until_ceil(now, now), 0);
        assert_eq!(days_until_ceil(now, now - Duration::hours(12)), 0);
        assert_eq!(days_until_ceil(now, now - Duration::hours(36)), -1);
    }

    #[test]
    fn test_local_date_uses_timezone() {
        let tz: Timezone = "Asia/Kolkata".parse().unwrap();
        let late_utc = Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap();
        assert_eq!(tz.local_date(late_utc), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }
}
