//! # Fastwindow Core Library
//!
//! Core business logic for Fastwindow, a fasting-window and weight
//! tracker. All operations are available through a standalone CLI binary;
//! any GUI shell is expected to be a thin renderer over the same library.
//!
//! ## Architecture
//!
//! - **Session Engine**: a wall-clock-based state machine for the fasting
//!   timer; the caller invokes `tick()` periodically and state survives
//!   restarts through the record store
//! - **History**: calendar-aligned week/month range queries, record
//!   filtering, and chart sampling over sparse data
//! - **Storage**: SQLite-backed record collections and TOML configuration
//! - **Reminders**: absolute-fire-time planning for fasting and weigh-in
//!   reminders; delivery itself stays with the platform shell
//!
//! ## Key components
//!
//! - [`FastingEngine`]: fasting session state machine
//! - [`Database`]: record and reminder persistence
//! - [`Config`]: application configuration
//! - [`range_for`] / [`interpolate_monthly`]: history queries

pub mod day;
pub mod error;
pub mod events;
pub mod history;
pub mod records;
pub mod reminders;
pub mod session;
pub mod storage;
pub mod weight;

pub use day::DayKey;
pub use error::{ConfigError, CoreError, SessionError, StoreError, ValidationError};
pub use events::Event;
pub use history::{
    filter_records, interpolate_monthly, month_stats, month_summary, range_for, ChartSample,
    DateRange, DaySummary, MonthStats, Period, SampleSource,
};
pub use records::{DietRecord, WeightRecord};
pub use reminders::{Reminder, ReminderScheduler};
pub use session::{FastingEngine, SessionState, SessionStatus, TickOutcome};
pub use storage::{Config, Database, FastingConfig, NotificationSettings, RecordStore};
