//! Resolving time windows and projects to M-Lab BigQuery table names

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{BqsanityError, Result};
use crate::project::Project;

/// Unix timestamp of the first M-Lab test (2009-02-11).
pub const MLAB_EPOCH: i64 = 1234310400;

/// Naming configuration for the M-Lab BigQuery tables.
///
/// Constructed once at startup and passed explicitly to the query generator,
/// so the dataset prefix and epoch never live in process-global state.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Dataset prefix shared by every table, e.g. `plx.google:m_lab`.
    pub dataset: String,
    /// Earliest instant for which table data exists.
    pub data_epoch: NaiveDateTime,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            dataset: "plx.google:m_lab".to_string(),
            data_epoch: DateTime::from_timestamp(MLAB_EPOCH, 0)
                .expect("MLAB_EPOCH is a valid timestamp")
                .naive_utc(),
        }
    }
}

impl TableConfig {
    /// Returns the names of all per-month tables covering a time range.
    ///
    /// Tests that occur near the border of a month (e.g. midnight on the first
    /// or last day of the month) may be placed in the adjacent month's table,
    /// so the range is padded by one day on each side before resolving table
    /// names. The padding is clamped to the valid data range; the unpadded
    /// bounds themselves must lie within `[first month of data, now]`.
    pub fn monthly_tables(
        &self,
        time_range_start: NaiveDateTime,
        time_range_end: NaiveDateTime,
    ) -> Result<Vec<String>> {
        // The epoch's whole month is valid: the first month's table exists
        // even for days before the first recorded test.
        let min_table_month = self.min_table_month();
        let max_table_month = Utc::now().naive_utc();
        if !(min_table_month <= time_range_start && time_range_start <= max_table_month) {
            return Err(BqsanityError::date_out_of_range(format!(
                "time_range_start ({}) is out of range",
                time_range_start
            )));
        }
        if !(min_table_month <= time_range_end && time_range_end <= max_table_month) {
            return Err(BqsanityError::date_out_of_range(format!(
                "time_range_end ({}) is out of range",
                time_range_end
            )));
        }

        let day_delta = Duration::days(1);
        let mut tables = BTreeSet::new();
        let mut current_time = (time_range_start - day_delta).max(min_table_month);
        let time_limit = (time_range_end + day_delta).min(max_table_month);
        while current_time < time_limit {
            tables.insert(self.monthly_table(current_time));
            current_time += day_delta;
        }
        Ok(tables.into_iter().collect())
    }

    /// Translates a time into the corresponding per-month table, e.g.
    /// `plx.google:m_lab.2015_02.all`.
    pub fn monthly_table(&self, table_time: NaiveDateTime) -> String {
        self.format_table(&table_time.format("%Y_%m").to_string())
    }

    /// Returns the project-specific table, e.g. `plx.google:m_lab.ndt.all`.
    pub fn per_project_table(&self, project: Project) -> String {
        self.format_table(project.name())
    }

    fn min_table_month(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.data_epoch.year(), self.data_epoch.month(), 1)
            .expect("first day of a month is always valid")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
    }

    fn format_table(&self, table_name: &str) -> String {
        format!("{}.{}.all", self.dataset, table_name)
    }
}
