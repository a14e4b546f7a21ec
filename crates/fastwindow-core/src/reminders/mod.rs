//! Local reminder planning.
//!
//! The engine computes absolute fire times; actually delivering a
//! notification (and asking for permission to do so) belongs to the
//! platform shell. [`ReminderScheduler`] is that boundary: the production
//! implementation persists pending reminders in the store's `reminders`
//! table, and tests substitute a recording fake.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::records::{DietRecord, WeightRecord};
use crate::storage::NotificationSettings;

pub const FASTING_START_ID: &str = "fastingStart";
pub const FASTING_END_ID: &str = "fastingEnd";
pub const WEIGHT_RECORD_ID: &str = "weightRecord";
pub const FASTING_SUCCESS_ID: &str = "fastingSuccess";

/// Schedules and cancels local reminders at absolute fire times.
pub trait ReminderScheduler {
    fn schedule_at(
        &self,
        id: &str,
        fire_at: DateTime<Utc>,
        title: &str,
        body: &str,
    ) -> Result<(), StoreError>;
    fn cancel_all(&self) -> Result<(), StoreError>;
}

/// A scheduled reminder as the store reports it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

/// Target times that already slipped into the past fall back to an hour
/// from now rather than firing immediately.
fn clamp_to_future(target: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if target > now {
        target
    } else {
        now + Duration::hours(1)
    }
}

/// Remind the user to begin the next fast, 24 h after the last one ended.
///
/// No-op when no completed fast exists yet.
pub fn schedule_fasting_start_reminder(
    scheduler: &dyn ReminderScheduler,
    diet_records: &[DietRecord],
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let last_end = diet_records
        .iter()
        .max_by_key(|r| r.date)
        .and_then(|r| r.end_time);
    let Some(end) = last_end else {
        return Ok(());
    };
    let fire_at = clamp_to_future(end + Duration::hours(24), now);
    scheduler.schedule_at(
        FASTING_START_ID,
        fire_at,
        "Time to start fasting",
        "Begin your next fasting window.",
    )
}

/// Remind the user when the running (or latest) fast reaches its goal.
pub fn schedule_fasting_end_reminder(
    scheduler: &dyn ReminderScheduler,
    diet_records: &[DietRecord],
    duration_hours: f64,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let last_start = diet_records
        .iter()
        .max_by_key(|r| r.date)
        .and_then(|r| r.start_time);
    let Some(start) = last_start else {
        return Ok(());
    };
    let goal = start + Duration::milliseconds((duration_hours * 3_600_000.0).round() as i64);
    let fire_at = clamp_to_future(goal, now);
    scheduler.schedule_at(
        FASTING_END_ID,
        fire_at,
        "Fasting window complete",
        &format!("{duration_hours:.0} hours are up. Well done!"),
    )
}

/// Weekly weight reminder, seven days after the most recent entry.
pub fn schedule_weight_record_reminder(
    scheduler: &dyn ReminderScheduler,
    weight_records: &[WeightRecord],
    settings: &NotificationSettings,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let last = weight_records
        .iter()
        .max_by_key(|r| r.date)
        .map(|r| r.date)
        .unwrap_or(now - Duration::days(7));
    let fire_at = clamp_to_future(last + Duration::days(7), now);
    scheduler.schedule_at(
        WEIGHT_RECORD_ID,
        fire_at,
        "Time to weigh in",
        &format!("{} Record this week's weight.", settings.weight_emoji),
    )
}

/// Immediate success notification, gated by the user's setting.
pub fn send_fasting_success_notification(
    scheduler: &dyn ReminderScheduler,
    settings: &NotificationSettings,
    duration_hours: f64,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    if !settings.fasting_success_notification {
        return Ok(());
    }
    scheduler.schedule_at(
        FASTING_SUCCESS_ID,
        now,
        &format!("Fast succeeded {}", settings.fasting_emoji),
        &format!("You made it through {duration_hours:.0} hours of fasting."),
    )
}

/// Cancel everything pending and reschedule the three standing reminders.
pub fn update_all(
    scheduler: &dyn ReminderScheduler,
    diet_records: &[DietRecord],
    weight_records: &[WeightRecord],
    settings: &NotificationSettings,
    duration_hours: f64,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    scheduler.cancel_all()?;
    schedule_fasting_start_reminder(scheduler, diet_records, now)?;
    schedule_fasting_end_reminder(scheduler, diet_records, duration_hours, now)?;
    schedule_weight_record_reminder(scheduler, weight_records, settings, now)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Records every scheduling call for assertions.
    #[derive(Default)]
    pub struct RecordingScheduler {
        pub scheduled: RefCell<Vec<Reminder>>,
        pub cancel_count: RefCell<usize>,
    }

    impl RecordingScheduler {
        pub fn scheduled_ids(&self) -> Vec<String> {
            self.scheduled.borrow().iter().map(|r| r.id.clone()).collect()
        }

        pub fn find(&self, id: &str) -> Option<Reminder> {
            self.scheduled.borrow().iter().rev().find(|r| r.id == id).cloned()
        }
    }

    impl ReminderScheduler for RecordingScheduler {
        fn schedule_at(
            &self,
            id: &str,
            fire_at: DateTime<Utc>,
            title: &str,
            body: &str,
        ) -> Result<(), StoreError> {
            self.scheduled.borrow_mut().push(Reminder {
                id: id.to_string(),
                fire_at,
                title: title.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }

        fn cancel_all(&self) -> Result<(), StoreError> {
            *self.cancel_count.borrow_mut() += 1;
            self.scheduled.borrow_mut().clear();
            Ok(())
        }
    }
}
