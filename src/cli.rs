//! Command-line interface for bqsanity

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;

use crate::intervals::DateStep;
use crate::project::Project;

/// Format of dates when entered as command line arguments or printed to the
/// console.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser)]
#[command(name = "bqsanity")]
#[command(about = "Cross-table consistency checker for M-Lab BigQuery datasets")]
#[command(version)]
pub struct Cli {
    /// Numeric ID of the M-Lab project in BigQuery (NDT = 0, NPAD = 1,
    /// SideStream = 2, Paris Traceroute = 3)
    #[arg(short, long, value_parser = parse_project_arg)]
    pub project: Project,

    /// Start of the checked date range (inclusive), as YYYY-MM-DD
    #[arg(short, long, default_value = "2009-02-11", value_parser = parse_date_arg)]
    pub start_date: NaiveDateTime,

    /// End of the checked date range (exclusive), as YYYY-MM-DD
    /// (defaults to the current date)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub end_date: Option<NaiveDateTime>,

    /// Size of the time window for each check query, as "<value>_<units>"
    /// where units is "days" or "months", e.g. "30_days"
    #[arg(short, long, default_value = "1_months", value_parser = parse_interval_arg)]
    pub interval: DateStep,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter level implied by the verbosity flag.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Parses a project ID command line parameter into a `Project`.
fn parse_project_arg(project_arg: &str) -> Result<Project, String> {
    let id: u8 = project_arg
        .parse()
        .map_err(|_| format!("Invalid project ID: {}", project_arg))?;
    Project::from_id(id).map_err(|e| e.to_string())
}

/// Parses a date command line parameter string into a datetime at midnight.
pub fn parse_date_arg(date_arg: &str) -> Result<NaiveDateTime, String> {
    NaiveDate::parse_from_str(date_arg, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD.", date_arg))
}

/// Parses an interval command line parameter string into a `DateStep`.
///
/// The expected form is `<value>_<units>`, e.g. `3_months`. Supported units
/// are `days` and `months`; the value must be a positive integer.
pub fn parse_interval_arg(interval_arg: &str) -> Result<DateStep, String> {
    let parts: Vec<&str> = interval_arg.split('_').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid interval '{}'. Expected the form \"<value>_<units>\", e.g. \"3_months\".",
            interval_arg
        ));
    }
    let value: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Interval value must be a positive number: {}", parts[0]))?;
    if value == 0 {
        return Err(format!(
            "Interval value must be a positive number: {}",
            value
        ));
    }
    match parts[1] {
        "days" => Ok(DateStep::Days(value)),
        "months" => Ok(DateStep::Months(value)),
        units => Err(format!(
            "Unrecognized time units: {}. Supported units: days, months",
            units
        )),
    }
}
