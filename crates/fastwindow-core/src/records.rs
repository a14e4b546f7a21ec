//! Record types: daily weight entries and per-day fasting outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::day::DayKey;

/// A body-weight measurement, one conceptual record per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Kilograms.
    pub weight: f64,
}

impl WeightRecord {
    pub fn new(date: DateTime<Utc>, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            weight,
        }
    }

    pub fn day(&self) -> DayKey {
        DayKey::from_utc(self.date)
    }
}

/// Outcome of one day's fast.
///
/// `start_time` set with `end_time` unset marks the single in-progress
/// fast; the session engine enforces that at most one such record exists.
/// Serialized field names (`startTime`/`endTime`) are the wire format the
/// store round-trips, so they stay camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietRecord {
    pub id: Uuid,
    /// Anchor day for the record, by convention the day the fast started.
    pub date: DateTime<Utc>,
    pub success: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl DietRecord {
    pub fn new(date: DateTime<Utc>, success: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            success,
            start_time: None,
            end_time: None,
        }
    }

    /// A record for a fast that has begun but not yet ended.
    pub fn in_progress(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: start_time,
            success: false,
            start_time: Some(start_time),
            end_time: None,
        }
    }

    pub fn day(&self) -> DayKey {
        DayKey::from_utc(self.date)
    }

    pub fn is_in_progress(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_none()
    }

    /// Hours fasted, when both endpoints are known.
    pub fn fasted_hours(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some(end.signed_duration_since(start).num_milliseconds() as f64 / 3_600_000.0)
            }
            _ => None,
        }
    }
}
