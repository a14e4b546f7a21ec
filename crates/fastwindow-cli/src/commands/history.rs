use chrono::Utc;
use clap::Subcommand;
use fastwindow_core::history::DEFAULT_STEP_DAYS;
use fastwindow_core::storage::{Config, Database, RecordStore};
use fastwindow_core::{
    filter_records, interpolate_monthly, month_stats, month_summary, range_for, Period,
};

use super::common::{parse_month, PeriodArg};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Weight records inside a period bucket, as JSON
    Range {
        #[arg(long, value_enum, default_value = "week")]
        period: PeriodArg,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Interpolated chart samples for a month
    Chart {
        /// Months back from the current one
        #[arg(long, default_value = "0")]
        offset: u32,
        /// Sample spacing in days
        #[arg(long)]
        step: Option<u32>,
    },
    /// Calendar view of a month's fasting and weight records
    Month {
        /// Month to show (YYYY-MM), default current
        month: Option<String>,
    },
    /// Success/failure counts for a month
    Stats {
        month: Option<String>,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let today = Utc::now().date_naive();

    match action {
        HistoryAction::Range { period, offset } => {
            let range = range_for(period.into(), offset, today);
            let records = filter_records(&db.load_weight_records()?, range);
            let out = serde_json::json!({ "range": range, "records": records });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        HistoryAction::Chart { offset, step } => {
            let range = range_for(Period::Month, offset, today);
            let records = filter_records(&db.load_weight_records()?, range);
            let samples =
                interpolate_monthly(&records, range, step.unwrap_or(DEFAULT_STEP_DAYS));
            let out = serde_json::json!({ "range": range, "samples": samples });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        HistoryAction::Month { month } => {
            let reference = match month {
                Some(raw) => parse_month(&raw)?,
                None => today,
            };
            let summary = month_summary(
                &db.load_diet_records()?,
                &db.load_weight_records()?,
                reference,
            );
            let settings = &config.notifications;
            for day in summary.iter().filter(|d| !d.is_empty()) {
                let mut line = day.day.to_string();
                if let Some(diet) = &day.diet {
                    let verdict = if diet.is_in_progress() {
                        "running".to_string()
                    } else if diet.success {
                        "success".to_string()
                    } else {
                        "failed".to_string()
                    };
                    line.push_str(&format!("  {} {}", settings.fasting_emoji, verdict));
                    if let Some(hours) = diet.fasted_hours() {
                        line.push_str(&format!(" {hours:.1}h"));
                    }
                }
                if let Some(weight) = &day.weight {
                    line.push_str(&format!(
                        "  {} {:.1}kg",
                        settings.weight_emoji, weight.weight
                    ));
                }
                println!("{line}");
            }
        }
        HistoryAction::Stats { month } => {
            let reference = match month {
                Some(raw) => parse_month(&raw)?,
                None => today,
            };
            let stats = month_stats(
                &db.load_diet_records()?,
                &db.load_weight_records()?,
                reference,
            );
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
