//! Argument parsing helpers shared across commands.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::ValueEnum;
use fastwindow_core::Period;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Week,
    Month,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
        }
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}': expected YYYY-MM-DD").into())
}

/// Accepts RFC 3339 or a plain `YYYY-MM-DD HH:MM`, read as UTC.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            format!("invalid time '{input}': expected RFC 3339 or YYYY-MM-DD HH:MM").into()
        })
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{input}': expected YYYY-MM").into())
}
