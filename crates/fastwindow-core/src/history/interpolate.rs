//! Display sampling for sparse monthly weight data.
//!
//! A month of weight entries is usually sparse. Rather than plot raw
//! points, the chart walks the range in fixed-day steps and fills gaps by
//! linear interpolation between the nearest real measurements.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::records::WeightRecord;

/// Sample spacing used by the monthly chart.
pub const DEFAULT_STEP_DAYS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    /// An actual record exists on the sample day.
    Measured,
    /// Value derived from neighbouring records.
    Interpolated,
}

/// One plotted point of the monthly chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSample {
    pub day: NaiveDate,
    pub weight: f64,
    pub source: SampleSource,
}

/// Sample `range` every `step_days`, interpolating between measurements.
///
/// For each sample day: an exact same-day record is used as-is; otherwise
/// the value is linearly interpolated between the nearest earlier and
/// later records by day count. If only one side exists its value is
/// carried unchanged (no extrapolation); if neither exists the sample is
/// omitted. The final day of the range is always sampled, step-aligned
/// or not.
pub fn interpolate_monthly(
    records: &[WeightRecord],
    range: DateRange,
    step_days: u32,
) -> Vec<ChartSample> {
    let step = i64::from(step_days.max(1));
    let mut sorted: Vec<&WeightRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut days: Vec<NaiveDate> = Vec::new();
    let mut day = range.start;
    while day <= range.end {
        days.push(day);
        day += Duration::days(step);
    }
    if days.last() != Some(&range.end) {
        days.push(range.end);
    }

    days.into_iter()
        .filter_map(|day| sample_day(&sorted, day))
        .collect()
}

fn sample_day(sorted: &[&WeightRecord], day: NaiveDate) -> Option<ChartSample> {
    if let Some(exact) = sorted.iter().find(|r| r.date.date_naive() == day) {
        return Some(ChartSample {
            day,
            weight: exact.weight,
            source: SampleSource::Measured,
        });
    }

    let earlier = sorted.iter().rev().find(|r| r.date.date_naive() < day);
    let later = sorted.iter().find(|r| r.date.date_naive() > day);

    let weight = match (earlier, later) {
        (Some(e), Some(l)) => {
            let e_day = e.date.date_naive();
            let l_day = l.date.date_naive();
            let span = l_day.signed_duration_since(e_day).num_days();
            if span == 0 {
                e.weight
            } else {
                let t = day.signed_duration_since(e_day).num_days() as f64 / span as f64;
                e.weight + (l.weight - e.weight) * t
            }
        }
        (Some(e), None) => e.weight,
        (None, Some(l)) => l.weight,
        (None, None) => return None,
    };

    Some(ChartSample {
        day,
        weight,
        source: SampleSource::Interpolated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate, weight: f64) -> WeightRecord {
        WeightRecord::new(date.and_hms_opt(9, 0, 0).unwrap().and_utc(), weight)
    }

    fn march() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        }
    }

    #[test]
    fn interpolates_between_two_measurements() {
        // Records on day 1 (70.0) and day 10 (67.0); the day-6 sample sits
        // 5/9 of the way between them.
        let records = vec![
            record(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 70.0),
            record(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 67.0),
        ];
        let samples = interpolate_monthly(&records, march(), 5);

        let day6 = samples
            .iter()
            .find(|s| s.day == NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
            .expect("day-6 sample");
        assert_eq!(day6.source, SampleSource::Interpolated);
        let expected = 70.0 + (67.0 - 70.0) * (5.0 / 9.0);
        assert!((day6.weight - expected).abs() < 1e-9);

        // Final day carries the last real value, no extrapolation.
        let last = samples.last().expect("final sample");
        assert_eq!(last.day, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(last.weight, 67.0);
        assert_eq!(last.source, SampleSource::Interpolated);
    }

    #[test]
    fn exact_day_records_are_measured() {
        let records = vec![record(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), 68.2)];
        let samples = interpolate_monthly(&records, march(), 5);
        let day6 = samples
            .iter()
            .find(|s| s.day == NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
            .unwrap();
        assert_eq!(day6.source, SampleSource::Measured);
        assert_eq!(day6.weight, 68.2);
    }

    #[test]
    fn no_records_yields_no_samples() {
        let samples = interpolate_monthly(&[], march(), 5);
        assert!(samples.is_empty());
    }

    #[test]
    fn final_day_always_sampled_even_off_step() {
        // 31-day month with a 5-day step: 1, 6, 11, 16, 21, 26, 31.
        // A 30-day month misses the end on-step, so 30 must be appended.
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        };
        let records = vec![record(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(), 68.0)];
        let samples = interpolate_monthly(&records, range, 5);
        assert_eq!(
            samples.last().map(|s| s.day),
            Some(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap())
        );
    }

    #[test]
    fn leading_samples_carry_the_later_value() {
        let records = vec![record(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), 66.0)];
        let samples = interpolate_monthly(&records, march(), 5);
        let first = samples.first().unwrap();
        assert_eq!(first.day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(first.weight, 66.0);
        assert_eq!(first.source, SampleSource::Interpolated);
    }
}
