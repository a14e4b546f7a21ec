//! Per-day calendar summaries joining diet and weight records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{range_for, DateRange, Period};
use crate::day::DayKey;
use crate::records::{DietRecord, WeightRecord};

/// Everything known about one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub diet: Option<DietRecord>,
    pub weight: Option<WeightRecord>,
}

impl DaySummary {
    pub fn is_empty(&self) -> bool {
        self.diet.is_none() && self.weight.is_none()
    }
}

/// Aggregate counts for a month of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthStats {
    pub successes: usize,
    pub failures: usize,
    pub weight_entries: usize,
}

/// One [`DaySummary`] per day of the month containing `reference`.
pub fn month_summary(
    diet_records: &[DietRecord],
    weight_records: &[WeightRecord],
    reference: NaiveDate,
) -> Vec<DaySummary> {
    let range = range_for(Period::Month, 0, reference);
    days_of(range)
        .map(|day| {
            let key = DayKey::from_date(day);
            DaySummary {
                day,
                diet: diet_records.iter().find(|r| r.day() == key).cloned(),
                weight: weight_records.iter().find(|r| r.day() == key).cloned(),
            }
        })
        .collect()
}

/// Success/failure/weight counts for the month containing `reference`.
///
/// In-progress fasts are not counted either way; their outcome is still
/// open.
pub fn month_stats(
    diet_records: &[DietRecord],
    weight_records: &[WeightRecord],
    reference: NaiveDate,
) -> MonthStats {
    let range = range_for(Period::Month, 0, reference);
    let mut stats = MonthStats::default();
    for record in diet_records {
        let day = record.date.date_naive();
        if !range.contains(day) || record.is_in_progress() {
            continue;
        }
        if record.success {
            stats.successes += 1;
        } else {
            stats.failures += 1;
        }
    }
    stats.weight_entries = weight_records
        .iter()
        .filter(|r| range.contains(r.date.date_naive()))
        .count();
    stats
}

fn days_of(range: DateRange) -> impl Iterator<Item = NaiveDate> {
    range.start.iter_days().take(range.len_days() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn diet(day: u32, success: bool) -> DietRecord {
        let date = Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap();
        let mut record = DietRecord::new(date, success);
        record.start_time = Some(date);
        record.end_time = Some(date + chrono::Duration::hours(16));
        record
    }

    fn weight(day: u32, kg: f64) -> WeightRecord {
        WeightRecord::new(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(), kg)
    }

    #[test]
    fn summary_has_one_entry_per_day_of_month() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let summary = month_summary(&[], &[], reference);
        assert_eq!(summary.len(), 31);
        assert!(summary.iter().all(DaySummary::is_empty));
    }

    #[test]
    fn summary_joins_records_by_day() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let summary = month_summary(&[diet(5, true)], &[weight(5, 68.0)], reference);
        let day5 = &summary[4];
        assert_eq!(day5.day, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(day5.diet.as_ref().is_some_and(|r| r.success));
        assert!(day5.weight.as_ref().is_some_and(|r| r.weight == 68.0));
    }

    #[test]
    fn stats_skip_in_progress_and_out_of_month_records() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let running =
            DietRecord::in_progress(Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap());
        let outside = {
            let date = Utc.with_ymd_and_hms(2024, 2, 10, 8, 0, 0).unwrap();
            DietRecord::new(date, true)
        };
        let stats = month_stats(
            &[diet(5, true), diet(6, false), running, outside],
            &[weight(5, 68.0), weight(12, 67.5)],
            reference,
        );
        assert_eq!(
            stats,
            MonthStats {
                successes: 1,
                failures: 1,
                weight_entries: 2,
            }
        );
    }
}
