//! Generating BigQuery SQL for table equivalence checks

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::project::Project;
use crate::table_names::TableConfig;

/// Generates queries to test the equivalence of two M-Lab table families.
pub struct TableEquivalenceQueryGenerator<'a> {
    config: &'a TableConfig,
    project: Project,
    time_range_start: NaiveDateTime,
    time_range_end: NaiveDateTime,
}

impl<'a> TableEquivalenceQueryGenerator<'a> {
    /// Creates a generator for one project and one half-open time window.
    pub fn new(
        config: &'a TableConfig,
        project: Project,
        time_range_start: NaiveDateTime,
        time_range_end: NaiveDateTime,
    ) -> Self {
        Self {
            config,
            project,
            time_range_start,
            time_range_end,
        }
    }

    /// Generates a query demonstrating equivalence between two table types.
    ///
    /// The query yields 0 rows if the per-month and per-project tables contain
    /// equivalent data within the window. Non-NULL values in the
    /// `per_month.test_id` column indicate test_ids present only in the
    /// per-month tables; non-NULL values in `per_project.test_id` indicate
    /// test_ids present only in the per-project table.
    pub fn generate_query(&self) -> Result<String> {
        Ok(construct_equivalence_query(
            &self.generate_per_month_query()?,
            &self.generate_per_project_query(),
        ))
    }

    fn generate_per_month_query(&self) -> Result<String> {
        let mut conditions = vec![format_project_condition(self.project)];
        if self.project.has_intermediate_snapshots() {
            conditions.push("web100_log_entry.is_last_entry = True".to_string());
        }
        conditions.push(self.format_time_range_condition());
        let tables = self
            .config
            .monthly_tables(self.time_range_start, self.time_range_end)?;
        Ok(construct_test_id_subquery(&tables, &conditions))
    }

    fn generate_per_project_query(&self) -> String {
        let tables = vec![self.config.per_project_table(self.project)];
        let conditions = vec![self.format_time_range_condition()];
        construct_test_id_subquery(&tables, &conditions)
    }

    fn format_time_range_condition(&self) -> String {
        format!(
            "((web100_log_entry.log_time >= {start_time}) AND  -- {start_time_human}\n         \
             (web100_log_entry.log_time < {end_time}))  -- {end_time_human}",
            start_time = self.time_range_start.and_utc().timestamp(),
            start_time_human = to_human_readable_date(self.time_range_start),
            end_time = self.time_range_end.and_utc().timestamp(),
            end_time_human = to_human_readable_date(self.time_range_end),
        )
    }
}

/// Wraps two test_id subqueries into a single equivalence query.
///
/// The subqueries are joined with a full outer join on test_id, keeping only
/// rows where exactly one side is NULL, i.e. the asymmetric test_ids.
fn construct_equivalence_query(per_month_query: &str, per_project_query: &str) -> String {
    // Extra whitespace keeps the generated SQL readable in failure reports.
    let per_month_query_indented = per_month_query.replace('\n', "\n        ");
    let per_project_query_indented = per_project_query.replace('\n', "\n        ");
    format!(
        "\
SELECT
    per_month.test_id,
    per_project.test_id
FROM
    (
        {per_month_query_indented}
    ) AS per_month
    FULL OUTER JOIN EACH
    (
        {per_project_query_indented}
    ) AS per_project
ON
    per_month.test_id=per_project.test_id
WHERE
    per_month.test_id IS NULL
    OR per_project.test_id IS NULL"
    )
}

/// Builds SQL that retrieves test_id values from the given tables, subject to
/// the given WHERE clauses.
fn construct_test_id_subquery(tables: &[String], conditions: &[String]) -> String {
    format!(
        "\
SELECT
    test_id
FROM
    {tables}
WHERE
    {conditions}",
        tables = tables.join(",\n    "),
        conditions = conditions.join("\n    AND ")
    )
}

fn format_project_condition(project: Project) -> String {
    format!("project = {}", project.id())
}

/// Formats a datetime as a YYYY-MM-DD annotation for generated SQL.
fn to_human_readable_date(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}
