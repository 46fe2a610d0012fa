//! Running consistency checks across a date range

use chrono::NaiveDateTime;
use log::{error, info};

use crate::check::TableEquivalenceChecker;
use crate::cli::DATE_FORMAT;
use crate::error::Result;
use crate::intervals::{date_limits_to_intervals, DateStep};
use crate::project::Project;
use crate::query_construct::TableEquivalenceQueryGenerator;
use crate::query_execution::QueryExecutor;
use crate::table_names::TableConfig;

/// Performs table equivalence checks on every time window in a date range.
///
/// Each window is checked independently: a failed check is logged and the run
/// continues with the next window, so every discrepancy in the range gets
/// reported. Infrastructure and validation errors abort the run immediately.
///
/// Returns whether every window passed.
pub fn run_consistency_check<E: QueryExecutor>(
    query_executor: E,
    config: &TableConfig,
    project: Project,
    date_start: NaiveDateTime,
    date_end: NaiveDateTime,
    date_step: DateStep,
) -> Result<bool> {
    let checker = TableEquivalenceChecker::new(
        |project, start, end| {
            TableEquivalenceQueryGenerator::new(config, project, start, end).generate_query()
        },
        query_executor,
    );
    let mut all_passed = true;
    for window in date_limits_to_intervals(date_start, date_end, date_step) {
        info!(
            "Checking cross-table consistency for project={}, {} -> {}",
            project.id(),
            window.start.format(DATE_FORMAT),
            window.end.format(DATE_FORMAT)
        );
        let check_result = checker.check(project, window.start, window.end)?;
        if !check_result.is_success() {
            error!("{}", check_result.message().unwrap_or_default());
            all_passed = false;
        }
    }
    Ok(all_passed)
}
