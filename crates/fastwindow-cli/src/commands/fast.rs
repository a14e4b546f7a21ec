use chrono::Utc;
use clap::Subcommand;
use fastwindow_core::storage::{Config, Database};
use fastwindow_core::{Event, FastingEngine, SessionState};

use super::common::{parse_date, parse_datetime};

#[derive(Subcommand)]
pub enum FastAction {
    /// Start a fast now
    Start {
        /// Override the fasting duration for this and future sessions
        #[arg(long)]
        hours: Option<f64>,
        /// Replace an existing record for today
        #[arg(long)]
        overwrite: bool,
    },
    /// Stop the running fast early
    Stop,
    /// Print current session state as JSON (advances the clock)
    Status,
    /// Show or change the fasting duration in hours
    Duration { hours: Option<f64> },
    /// Backfill a past day's fast from explicit start/end times
    Record {
        /// Day the record is anchored to (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Fast start (RFC 3339 or "YYYY-MM-DD HH:MM", UTC)
        #[arg(long)]
        start: String,
        /// Fast end
        #[arg(long)]
        end: String,
    },
    /// Delete the fasting record for a day (YYYY-MM-DD)
    Clear { date: String },
}

pub fn run(action: FastAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let now = Utc::now();
    let (mut engine, overdue) =
        FastingEngine::resume(&db, &db, config.notifications.clone(), now)?;

    // A fast that ran out while the process was gone completes on
    // rehydration; surface that before handling the command.
    if let Some(record) = overdue {
        let event = Event::FastCompleted { record, at: now };
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    match action {
        FastAction::Start { hours, overwrite } => {
            if let Some(hours) = hours {
                engine.set_duration(hours)?;
            }
            let record = engine.start(now, overwrite)?;
            let SessionState::Running { end_time, .. } = engine.state() else {
                unreachable!("start leaves the engine running");
            };
            let event = Event::FastStarted {
                start_time: record.start_time.unwrap_or(now),
                end_time,
                duration_hours: engine.duration_hours(),
                at: now,
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        FastAction::Stop => {
            let record = engine.stop(now)?;
            let fasted_hours = record.fasted_hours().unwrap_or(0.0);
            let event = Event::FastStopped {
                record,
                fasted_hours,
                at: now,
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        FastAction::Status => {
            let outcome = engine.tick(now)?;
            if let Some(record) = outcome.completed {
                let event = Event::FastCompleted { record, at: now };
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?);
        }
        FastAction::Duration { hours } => {
            if let Some(hours) = hours {
                engine.set_duration(hours)?;
            }
            println!(
                "{}",
                serde_json::json!({ "duration_hours": engine.duration_hours() })
            );
        }
        FastAction::Record { date, start, end } => {
            let record = engine.record_day(
                parse_date(&date)?,
                parse_datetime(&start)?,
                parse_datetime(&end)?,
            )?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        FastAction::Clear { date } => {
            let cleared = engine.clear_day(parse_date(&date)?)?;
            println!("{}", serde_json::json!({ "cleared": cleared }));
        }
    }

    Ok(())
}
