//! Weight entry: parse, upsert-by-day, delete.

use chrono::{DateTime, NaiveDate, Utc};

use crate::day::DayKey;
use crate::error::{CoreError, StoreError, ValidationError};
use crate::records::WeightRecord;
use crate::reminders::{self, ReminderScheduler};
use crate::storage::{NotificationSettings, RecordStore};

/// Parse user weight input. Rejected input is never persisted.
pub fn parse_weight(input: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidWeightInput {
        input: input.to_string(),
    };
    let weight: f64 = input.trim().parse().map_err(|_| invalid())?;
    if !weight.is_finite() || weight <= 0.0 {
        return Err(invalid());
    }
    Ok(weight)
}

/// Record a weight for `date`'s calendar day.
///
/// Re-entry on the same day updates the existing record in place (id and
/// original timestamp kept); otherwise a new record is appended. The
/// weekly weight reminder is rescheduled from the updated collection.
pub fn record_weight(
    store: &dyn RecordStore,
    scheduler: &dyn ReminderScheduler,
    settings: &NotificationSettings,
    date: DateTime<Utc>,
    weight: f64,
    now: DateTime<Utc>,
) -> Result<WeightRecord, CoreError> {
    let mut records = store.load_weight_records()?;
    let day = DayKey::from_utc(date);

    let record = match records.iter_mut().find(|r| r.day() == day) {
        Some(existing) => {
            existing.weight = weight;
            existing.clone()
        }
        None => {
            let record = WeightRecord::new(date, weight);
            records.push(record.clone());
            record
        }
    };

    store.save_weight_records(&records)?;
    reminders::schedule_weight_record_reminder(scheduler, &records, settings, now)?;
    Ok(record)
}

/// Delete the weight record for a calendar day. Returns whether one
/// existed.
pub fn delete_weight(store: &dyn RecordStore, date: NaiveDate) -> Result<bool, StoreError> {
    let mut records = store.load_weight_records()?;
    let day = DayKey::from_date(date);
    let before = records.len();
    records.retain(|r| r.day() != day);
    let removed = records.len() != before;
    if removed {
        store.save_weight_records(&records)?;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::testing::RecordingScheduler;
    use crate::storage::Database;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn parse_rejects_garbage_and_nonpositive() {
        assert_eq!(parse_weight(" 68.2 "), Ok(68.2));
        assert!(parse_weight("abc").is_err());
        assert!(parse_weight("").is_err());
        assert!(parse_weight("-3").is_err());
        assert!(parse_weight("0").is_err());
    }

    #[test]
    fn same_day_entry_updates_in_place() {
        let db = Database::open_memory().unwrap();
        let scheduler = RecordingScheduler::default();
        let settings = NotificationSettings::default();

        let first = record_weight(&db, &scheduler, &settings, now(), 68.0, now()).unwrap();
        let second = record_weight(
            &db,
            &scheduler,
            &settings,
            now() + chrono::Duration::hours(3),
            67.5,
            now(),
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        let records = db.load_weight_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weight, 67.5);
    }

    #[test]
    fn different_days_append() {
        let db = Database::open_memory().unwrap();
        let scheduler = RecordingScheduler::default();
        let settings = NotificationSettings::default();

        record_weight(&db, &scheduler, &settings, now(), 68.0, now()).unwrap();
        record_weight(
            &db,
            &scheduler,
            &settings,
            now() + chrono::Duration::days(1),
            67.8,
            now(),
        )
        .unwrap();
        assert_eq!(db.load_weight_records().unwrap().len(), 2);
    }

    #[test]
    fn recording_reschedules_weight_reminder() {
        let db = Database::open_memory().unwrap();
        let scheduler = RecordingScheduler::default();
        let settings = NotificationSettings::default();

        record_weight(&db, &scheduler, &settings, now(), 68.0, now()).unwrap();
        let reminder = scheduler.find(crate::reminders::WEIGHT_RECORD_ID).unwrap();
        assert_eq!(reminder.fire_at, now() + chrono::Duration::days(7));
    }

    #[test]
    fn delete_reports_existence() {
        let db = Database::open_memory().unwrap();
        let scheduler = RecordingScheduler::default();
        let settings = NotificationSettings::default();
        record_weight(&db, &scheduler, &settings, now(), 68.0, now()).unwrap();

        assert!(delete_weight(&db, now().date_naive()).unwrap());
        assert!(!delete_weight(&db, now().date_naive()).unwrap());
    }
}
