//! History queries: period-bucketed date ranges and record filtering.
//!
//! The UI's week/month history views all reduce to the same question --
//! "which calendar interval am I looking at, `offset` periods back?" --
//! so the interval computation lives in exactly one place, [`range_for`].
//! Both week and month ranges are inclusive of their final day.

mod interpolate;
mod summary;

pub use interpolate::{interpolate_monthly, ChartSample, SampleSource, DEFAULT_STEP_DAYS};
pub use summary::{month_summary, month_stats, DaySummary, MonthStats};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::records::WeightRecord;

/// Bucketing granularity for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
}

/// A calendar interval, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, inclusive.
    pub fn len_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }
}

/// The calendar interval containing `reference`, shifted back by `offset`
/// whole periods.
///
/// Weeks start on Sunday and span 7 days. Months span first-of-month
/// through last-of-month.
pub fn range_for(period: Period, offset: u32, reference: NaiveDate) -> DateRange {
    match period {
        Period::Week => {
            let shifted = reference - Duration::weeks(i64::from(offset));
            let start = shifted - Duration::days(i64::from(shifted.weekday().num_days_from_sunday()));
            DateRange {
                start,
                end: start + Duration::days(6),
            }
        }
        Period::Month => {
            let shifted = reference
                .checked_sub_months(Months::new(offset))
                .unwrap_or(reference);
            let start = shifted.with_day(1).unwrap_or(shifted);
            let end = start
                .checked_add_months(Months::new(1))
                .map(|next| next - Duration::days(1))
                .unwrap_or(start);
            DateRange { start, end }
        }
    }
}

/// Records whose day falls inside `range`, ascending by date.
///
/// The sort is stable: records sharing a timestamp keep their input order.
pub fn filter_records(records: &[WeightRecord], range: DateRange) -> Vec<WeightRecord> {
    let mut filtered: Vec<WeightRecord> = records
        .iter()
        .filter(|r| range.contains(r.date.date_naive()))
        .cloned()
        .collect();
    filtered.sort_by_key(|r| r.date);
    filtered
}

/// Latest weight record in the collection, by date.
pub fn latest_weight(records: &[WeightRecord]) -> Option<&WeightRecord> {
    records.iter().max_by_key(|r| r.date)
}

/// The record for a given calendar day, if any.
pub fn weight_on(records: &[WeightRecord], day: DayKey) -> Option<&WeightRecord> {
    records.iter().find(|r| r.day() == day)
}
