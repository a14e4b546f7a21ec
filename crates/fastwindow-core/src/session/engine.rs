//! Fasting session engine.
//!
//! A wall-clock-based state machine with no internal thread: the caller
//! invokes `tick()` at whatever cadence it likes (the UI polls at about
//! 1 Hz) and every answer is re-derived from the persisted start time
//! and the clock, so arbitrary suspension gaps are harmless.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> Idle   (stop or scheduled completion)
//! ```
//!
//! The persisted form of `Running` is the day's DietRecord with a start
//! time and no end time; `resume()` rehydrates from it after a process
//! restart, completing on the spot when the deadline already passed.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::{CoreError, SessionError};
use crate::events::Event;
use crate::records::DietRecord;
use crate::reminders::{self, ReminderScheduler};
use crate::storage::{self, NotificationSettings, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
}

/// Canonical session state. The UI renders snapshots of this; it never
/// owns timer state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Running { .. } => SessionStatus::Running,
        }
    }
}

/// Result of one `tick()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub remaining: Duration,
    /// Set exactly once, on the tick that observes the deadline.
    pub completed: Option<DietRecord>,
}

/// Core fasting state machine over an injected store and scheduler.
pub struct FastingEngine<'a> {
    store: &'a dyn RecordStore,
    scheduler: &'a dyn ReminderScheduler,
    settings: NotificationSettings,
    duration_hours: f64,
    state: SessionState,
}

fn duration_of(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

impl<'a> FastingEngine<'a> {
    /// Rehydrate engine state from the store.
    ///
    /// An in-progress DietRecord whose deadline has not passed becomes
    /// `Running`; one past its deadline is completed immediately (the
    /// returned record reports it). No persisted session means `Idle`,
    /// which is the normal first-run state, not an error.
    pub fn resume(
        store: &'a dyn RecordStore,
        scheduler: &'a dyn ReminderScheduler,
        settings: NotificationSettings,
        now: DateTime<Utc>,
    ) -> Result<(Self, Option<DietRecord>), CoreError> {
        let duration_hours = store
            .load_fasting_duration()?
            .filter(|h| storage::validate_duration(*h).is_ok())
            .unwrap_or(storage::DEFAULT_DURATION_HOURS);

        let mut engine = Self {
            store,
            scheduler,
            settings,
            duration_hours,
            state: SessionState::Idle,
        };

        let records = store.load_diet_records()?;
        let Some(open) = records.iter().find(|r| r.is_in_progress()) else {
            return Ok((engine, None));
        };
        let Some(start_time) = open.start_time else {
            return Ok((engine, None));
        };

        let end_time = start_time + duration_of(duration_hours);
        if now < end_time {
            engine.state = SessionState::Running {
                start_time,
                end_time,
            };
            Ok((engine, None))
        } else {
            let record = engine.complete_running(start_time, end_time, now)?;
            Ok((engine, Some(record)))
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    /// Duration changes are only allowed between sessions.
    pub fn can_reconfigure(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    /// Time left until the scheduled end, floored at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.state {
            SessionState::Idle => Duration::zero(),
            SessionState::Running { end_time, .. } => (end_time - now).max(Duration::zero()),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let (start_time, end_time) = match self.state {
            SessionState::Idle => (None, None),
            SessionState::Running {
                start_time,
                end_time,
            } => (Some(start_time), Some(end_time)),
        };
        Event::StateSnapshot {
            state: self.state.status(),
            start_time,
            end_time,
            remaining_secs: self.remaining(now).num_seconds(),
            duration_hours: self.duration_hours,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fast at `now`.
    ///
    /// Rejected while any fast is running. A day that already holds a
    /// record needs `overwrite`; the stale record is then deleted, unlike
    /// `stop` which always keeps its record.
    pub fn start(&mut self, now: DateTime<Utc>, overwrite: bool) -> Result<DietRecord, CoreError> {
        if let SessionState::Running { .. } = self.state {
            return Err(SessionError::CannotStartWhileRunning.into());
        }

        let mut records = self.store.load_diet_records()?;
        let day = DayKey::from_utc(now);
        if records.iter().any(|r| r.day() == day) {
            if !overwrite {
                return Err(SessionError::DayAlreadyRecorded { day: day.date() }.into());
            }
            records.retain(|r| r.day() != day);
        }

        let record = DietRecord::in_progress(now);
        records.push(record.clone());
        self.store.save_diet_records(&records)?;
        // Pin the duration so a later config change cannot retroactively
        // alter this session's terms.
        self.store.save_fasting_duration(self.duration_hours)?;

        self.state = SessionState::Running {
            start_time: now,
            end_time: now + duration_of(self.duration_hours),
        };

        let weights = self.store.load_weight_records()?;
        reminders::update_all(
            self.scheduler,
            &records,
            &weights,
            &self.settings,
            self.duration_hours,
            now,
        )?;
        Ok(record)
    }

    /// Advance the clock. Completion fires exactly once: the transition
    /// into `Idle` happens on the first tick at or past the deadline, and
    /// later ticks see an idle engine.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, CoreError> {
        match self.state {
            SessionState::Idle => Ok(TickOutcome {
                remaining: Duration::zero(),
                completed: None,
            }),
            SessionState::Running {
                start_time,
                end_time,
            } => {
                if now < end_time {
                    Ok(TickOutcome {
                        remaining: end_time - now,
                        completed: None,
                    })
                } else {
                    let record = self.complete_running(start_time, end_time, now)?;
                    Ok(TickOutcome {
                        remaining: Duration::zero(),
                        completed: Some(record),
                    })
                }
            }
        }
    }

    /// User-initiated early stop. The record is always kept, with the
    /// wall-clock end time and the success verdict the elapsed time earns.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<DietRecord, CoreError> {
        let SessionState::Running { start_time, .. } = self.state else {
            return Err(SessionError::NotRunning.into());
        };

        let success = now - start_time >= duration_of(self.duration_hours);
        let record = self.close_open_record(start_time, now, success)?;
        self.state = SessionState::Idle;

        // Reschedule first: update_all cancels everything pending, which
        // would otherwise swallow the success ping.
        self.reschedule_standing_reminders(now)?;
        if success {
            reminders::send_fasting_success_notification(
                self.scheduler,
                &self.settings,
                self.duration_hours,
                now,
            )?;
        }
        Ok(record)
    }

    /// Natural completion: the record gets the *scheduled* end time, not
    /// the wall-clock moment the deadline was noticed.
    fn complete_running(
        &mut self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DietRecord, CoreError> {
        let record = self.close_open_record(start_time, end_time, true)?;
        self.state = SessionState::Idle;

        self.reschedule_standing_reminders(now)?;
        reminders::send_fasting_success_notification(
            self.scheduler,
            &self.settings,
            self.duration_hours,
            now,
        )?;
        Ok(record)
    }

    /// Delete the record for a calendar day.
    ///
    /// The day anchoring the active session is protected; everything else
    /// reports whether a record existed.
    pub fn clear_day(&mut self, date: NaiveDate) -> Result<bool, CoreError> {
        let day = DayKey::from_date(date);
        if let SessionState::Running { start_time, .. } = self.state {
            if DayKey::from_utc(start_time) == day {
                return Err(SessionError::CannotClearActiveSession { day: date }.into());
            }
        }

        let mut records = self.store.load_diet_records()?;
        let before = records.len();
        records.retain(|r| r.day() != day);
        let removed = records.len() != before;
        if removed {
            self.store.save_diet_records(&records)?;
        }
        Ok(removed)
    }

    /// Backfill or correct a past day's fast from explicit endpoints.
    /// Success is derived from the configured duration, never supplied.
    pub fn record_day(
        &mut self,
        date: NaiveDate,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<DietRecord, CoreError> {
        let day = DayKey::from_date(date);
        if let SessionState::Running {
            start_time: active, ..
        } = self.state
        {
            if DayKey::from_utc(active) == day {
                return Err(SessionError::CannotClearActiveSession { day: date }.into());
            }
        }

        let mut records = self.store.load_diet_records()?;
        records.retain(|r| r.day() != day);

        let mut record = DietRecord::new(
            date.and_hms_opt(0, 0, 0)
                .map(|d| d.and_utc())
                .unwrap_or(start_time),
            end_time - start_time >= duration_of(self.duration_hours),
        );
        record.start_time = Some(start_time);
        record.end_time = Some(end_time);
        records.push(record.clone());
        self.store.save_diet_records(&records)?;
        Ok(record)
    }

    /// Change the fasting duration preference. Rejected mid-session.
    pub fn set_duration(&mut self, hours: f64) -> Result<(), CoreError> {
        if !self.can_reconfigure() {
            return Err(SessionError::ReconfigureWhileRunning.into());
        }
        storage::validate_duration(hours)?;
        self.duration_hours = hours;
        self.store.save_fasting_duration(hours)?;
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn close_open_record(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        success: bool,
    ) -> Result<DietRecord, CoreError> {
        let mut records = self.store.load_diet_records()?;
        let record = match records.iter_mut().find(|r| r.is_in_progress()) {
            Some(open) => {
                open.end_time = Some(end_time);
                open.success = success;
                open.clone()
            }
            None => {
                // Store was edited out from under us; reconstruct rather
                // than lose the outcome.
                let mut record = DietRecord::new(start_time, success);
                record.start_time = Some(start_time);
                record.end_time = Some(end_time);
                records.push(record.clone());
                record
            }
        };
        self.store.save_diet_records(&records)?;
        Ok(record)
    }

    fn reschedule_standing_reminders(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        let records = self.store.load_diet_records()?;
        let weights = self.store.load_weight_records()?;
        reminders::update_all(
            self.scheduler,
            &records,
            &weights,
            &self.settings,
            self.duration_hours,
            now,
        )?;
        Ok(())
    }
}
