use chrono::Utc;
use clap::Subcommand;
use fastwindow_core::storage::{Config, Database, RecordStore};
use fastwindow_core::{filter_records, range_for, weight, Event};

use super::common::{parse_date, PeriodArg};

#[derive(Subcommand)]
pub enum WeightAction {
    /// Record a weight for today (or a given day); same-day entries update
    Add {
        /// Weight in kilograms
        weight: String,
        /// Day to record for (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
    },
    /// List records for a period bucket
    List {
        #[arg(long, value_enum, default_value = "week")]
        period: PeriodArg,
        /// Periods back from the current one (0 = current)
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Delete the record for a day (YYYY-MM-DD)
    Delete { date: String },
}

pub fn run(action: WeightAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let now = Utc::now();

    match action {
        WeightAction::Add { weight, date } => {
            let kg = weight::parse_weight(&weight)?;
            let at = match date {
                Some(raw) => parse_date(&raw)?
                    .and_hms_opt(0, 0, 0)
                    .map(|naive| naive.and_utc())
                    .unwrap_or(now),
                None => now,
            };
            let record =
                weight::record_weight(&db, &db, &config.notifications, at, kg, now)?;
            let event = Event::WeightRecorded {
                date: record.date,
                weight: record.weight,
                at: now,
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        WeightAction::List { period, offset } => {
            let range = range_for(period.into(), offset, now.date_naive());
            let records = filter_records(&db.load_weight_records()?, range);
            let out = serde_json::json!({ "range": range, "records": records });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        WeightAction::Delete { date } => {
            let deleted = weight::delete_weight(&db, parse_date(&date)?)?;
            println!("{}", serde_json::json!({ "deleted": deleted }));
        }
    }

    Ok(())
}
