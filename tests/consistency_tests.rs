//! End-to-end tests for running consistency checks across a date range

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use bqsanity::commands::run_consistency_check;
use bqsanity::error::BqsanityError;
use bqsanity::intervals::DateStep;
use bqsanity::query_execution::QueryExecutor;
use bqsanity::{Project, Result, TableConfig};

const DISCREPANCY_RESULT: &str = "per_month_test_id,per_project_test_id\nmock_id_1,\n";

fn dt(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

/// Executor that replays scripted responses in order and records every
/// executed query. Responses past the end of the script succeed empty.
struct ScriptedExecutor {
    responses: RefCell<VecDeque<Result<String>>>,
    executed: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            executed: RefCell::new(Vec::new()),
        }
    }

    fn executed_count(&self) -> usize {
        self.executed.borrow().len()
    }
}

impl QueryExecutor for ScriptedExecutor {
    fn execute_query(&self, query: &str) -> Result<String> {
        self.executed.borrow_mut().push(query.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[test]
fn test_run_passes_when_every_window_is_equivalent() {
    let executor = ScriptedExecutor::new(vec![]);
    let all_passed = run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Ndt,
        dt(2015, 1, 1),
        dt(2015, 4, 1),
        DateStep::Months(1),
    )
    .unwrap();

    assert!(all_passed);
    // One query per monthly window.
    assert_eq!(3, executor.executed_count());
}

#[test]
fn test_run_checks_every_window_despite_a_mid_run_discrepancy() {
    let executor = ScriptedExecutor::new(vec![
        Ok(String::new()),
        Ok(DISCREPANCY_RESULT.to_string()),
        Ok(String::new()),
    ]);
    let all_passed = run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Ndt,
        dt(2015, 1, 1),
        dt(2015, 4, 1),
        DateStep::Months(1),
    )
    .unwrap();

    // The second window failed, but the third was still checked.
    assert!(!all_passed);
    assert_eq!(3, executor.executed_count());
}

#[test]
fn test_run_aborts_immediately_on_executor_errors() {
    let executor = ScriptedExecutor::new(vec![
        Ok(String::new()),
        Err(BqsanityError::bq_failed("mock query")),
        Ok(String::new()),
    ]);
    let result = run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Ndt,
        dt(2015, 1, 1),
        dt(2015, 4, 1),
        DateStep::Months(1),
    );

    assert!(matches!(result, Err(BqsanityError::BqFailed { .. })));
    // The third window was never attempted.
    assert_eq!(2, executor.executed_count());
}

#[test]
fn test_run_aborts_before_executing_anything_for_out_of_range_dates() {
    let executor = ScriptedExecutor::new(vec![]);
    // 2008 predates the first M-Lab test, so query generation fails on the
    // first window.
    let result = run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Ndt,
        dt(2008, 1, 1),
        dt(2008, 3, 1),
        DateStep::Months(1),
    );

    assert!(matches!(result, Err(BqsanityError::DateOutOfRange { .. })));
    assert_eq!(0, executor.executed_count());
}

#[test]
fn test_run_generates_window_scoped_queries() {
    let executor = ScriptedExecutor::new(vec![]);
    run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Sidestream,
        dt(2015, 1, 10),
        dt(2015, 1, 20),
        DateStep::Days(5),
    )
    .unwrap();

    let executed = executor.executed.borrow();
    assert_eq!(2, executed.len());
    // Each query carries its own window bounds (as unix timestamps with
    // human-readable annotations) and the project filter.
    assert!(executed[0].contains("-- 2015-01-10"));
    assert!(executed[0].contains("-- 2015-01-15"));
    assert!(executed[1].contains("-- 2015-01-15"));
    assert!(executed[1].contains("-- 2015-01-20"));
    for query in executed.iter() {
        assert!(query.contains("project = 2"));
        assert!(query.contains("plx.google:m_lab.sidestream.all"));
        assert!(query.contains("plx.google:m_lab.2015_01.all"));
    }
}

#[test]
fn test_empty_date_range_passes_without_executing_queries() {
    let executor = ScriptedExecutor::new(vec![]);
    let all_passed = run_consistency_check(
        &executor,
        &TableConfig::default(),
        Project::Ndt,
        dt(2015, 4, 1),
        dt(2015, 4, 1),
        DateStep::Months(1),
    )
    .unwrap();

    assert!(all_passed);
    assert_eq!(0, executor.executed_count());
}
