//! # bqsanity
//!
//! A consistency checker for the M-Lab BigQuery datasets. Verifies that the
//! per-month tables and the per-project tables contain the same test records,
//! one time window at a time across a date range, and reports any asymmetric
//! test_ids as actionable diagnostics.

pub mod check;
pub mod cli;
pub mod commands;
pub mod error;
pub mod formatting;
pub mod intervals;
pub mod project;
pub mod query_construct;
pub mod query_execution;
pub mod table_names;

pub use check::{CheckResult, TableEquivalenceChecker};
pub use error::{BqsanityError, Result};
pub use project::Project;
pub use table_names::TableConfig;
