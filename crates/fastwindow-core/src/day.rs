//! Calendar-day identity.
//!
//! All "same calendar day" decisions in the crate go through [`DayKey`],
//! a proleptic day number computed in UTC. This keeps day comparisons
//! free of time-zone boundary surprises and makes day equality a plain
//! integer compare.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Proleptic day number (days since CE) of a UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(i32);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.num_days_from_ce())
    }

    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self::from_date(at.date_naive())
    }

    /// The calendar date this key identifies.
    pub fn date(self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.0).unwrap_or(NaiveDate::MIN)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<DateTime<Utc>> for DayKey {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_utc(at)
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date())
    }
}
