//! Table equivalence checking and failure reporting

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::error::{BqsanityError, Result};
use crate::formatting;
use crate::project::Project;
use crate::query_execution::QueryExecutor;

/// Maximum number of test_id values listed per table in a failure message.
const MAX_LISTED_IDS: usize = 10;

const PER_MONTH_ID_COLUMN: &str = "per_month_test_id";
const PER_PROJECT_ID_COLUMN: &str = "per_project_test_id";

/// The outcome of a single equivalence check.
///
/// A message is present exactly when the check failed; the constructors
/// enforce this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    success: bool,
    message: Option<String>,
}

impl CheckResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Indicates whether the check succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// On check failure, contains a message explaining the failure.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Checker to verify that two table families contain equivalent rows.
///
/// Glue between query generation and query execution: generates a table
/// equivalence query for a window, executes it, and interprets the result.
/// The generator is a plain function value so tests can substitute it freely.
pub struct TableEquivalenceChecker<G, E> {
    generate_query: G,
    query_executor: E,
}

impl<G, E> TableEquivalenceChecker<G, E>
where
    G: Fn(Project, NaiveDateTime, NaiveDateTime) -> Result<String>,
    E: QueryExecutor,
{
    pub fn new(generate_query: G, query_executor: E) -> Self {
        Self {
            generate_query,
            query_executor,
        }
    }

    /// Performs a table equivalence check for a project in a time window.
    ///
    /// An empty query result means the tables agree. A non-empty result is the
    /// expected shape of a failed check and becomes a failure `CheckResult`;
    /// generator and executor errors are a different failure class and
    /// propagate unchanged.
    pub fn check(
        &self,
        project: Project,
        time_range_start: NaiveDateTime,
        time_range_end: NaiveDateTime,
    ) -> Result<CheckResult> {
        let query = (self.generate_query)(project, time_range_start, time_range_end)?;
        let query_result = self.query_executor.execute_query(&query)?;
        if query_result.trim().is_empty() {
            return Ok(CheckResult::success());
        }
        let (per_month_ids, per_project_ids) = parse_query_result(&query_result)?;
        Ok(CheckResult::failure(format_check_failure_message(
            &per_month_ids,
            &per_project_ids,
            &query,
        )))
    }
}

/// Parses the CSV output of a table equivalence query into the lists of
/// test_id values that failed to match, per table family.
///
/// Each row carries at most one populated cell; empty cells are skipped. The
/// raw lists may contain duplicates.
fn parse_query_result(query_result: &str) -> Result<(Vec<String>, Vec<String>)> {
    let mut reader = csv::Reader::from_reader(query_result.as_bytes());
    let headers = reader.headers()?.clone();
    let per_month_column = column_index(&headers, PER_MONTH_ID_COLUMN)?;
    let per_project_column = column_index(&headers, PER_PROJECT_ID_COLUMN)?;

    let mut per_month_ids = Vec::new();
    let mut per_project_ids = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(id) = record.get(per_month_column).filter(|id| !id.is_empty()) {
            per_month_ids.push(id.to_string());
        }
        if let Some(id) = record.get(per_project_column).filter(|id| !id.is_empty()) {
            per_project_ids.push(id.to_string());
        }
    }
    Ok((per_month_ids, per_project_ids))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| {
            BqsanityError::malformed_result(format!("missing expected column: {}", name))
        })
}

/// Creates a user-friendly message explaining an equivalence check failure.
fn format_check_failure_message(
    per_month_ids: &[String],
    per_project_ids: &[String],
    query: &str,
) -> String {
    let mut message = String::from("Check failed: TABLE EQUIVALENCE\n");
    if !per_month_ids.is_empty() {
        message.push_str(
            "test_id values present in per-month table, but NOT present in per-project table:\n",
        );
        message.push_str(&formatting::indent(&format_id_list(per_month_ids), 2));
        message.push('\n');
    }
    if !per_project_ids.is_empty() {
        message.push_str(
            "test_id values present in per-project table, but NOT present in per-month table:\n",
        );
        message.push_str(&formatting::indent(&format_id_list(per_project_ids), 2));
        message.push('\n');
    }
    message.push_str("BigQuery SQL:\n");
    message.push_str(&formatting::indent(query, 2));
    message
}

/// Renders an id list for display: deduplicated, sorted, and capped.
///
/// The omitted count is the raw (pre-dedup) row count minus the display cap,
/// so it folds duplicate rows and entries beyond the cap into one number.
/// That matches the long-observed report format and is pinned by tests.
fn format_id_list(ids: &[String]) -> String {
    let unique: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
    let mut lines: Vec<String> = unique.into_iter().map(str::to_string).collect();
    if ids.len() > MAX_LISTED_IDS {
        lines.truncate(MAX_LISTED_IDS);
        lines.push(format!(
            "({} additional or duplicate test_id values omitted)",
            ids.len() - MAX_LISTED_IDS
        ));
    }
    lines.join("\n")
}
