//! Executing BigQuery SQL through the bq command line utility

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{BqsanityError, Result};

/// Executes BigQuery SQL and returns the results in CSV format.
///
/// Implementations must distinguish "the tool could not run at all" from "the
/// tool ran and reported failure"; both are infrastructure errors that callers
/// treat as fatal rather than as a failed check.
pub trait QueryExecutor {
    fn execute_query(&self, query: &str) -> Result<String>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute_query(&self, query: &str) -> Result<String> {
        (**self).execute_query(query)
    }
}

/// Executes queries by shelling out to the bq command line utility.
pub struct BqQueryExecutor {
    program: String,
}

impl Default for BqQueryExecutor {
    fn default() -> Self {
        Self {
            program: "bq".to_string(),
        }
    }
}

impl BqQueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the program invoked in place of bq, so the spawn and exit
    /// status handling can be exercised without bq installed.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl QueryExecutor for BqQueryExecutor {
    fn execute_query(&self, query: &str) -> Result<String> {
        let mut bq_proc = Command::new(&self.program)
            .args([
                "query",
                "--format=csv",
                "--headless",
                "--quiet",
                "--max_rows=2000000000",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BqsanityError::BqNotInstalled
                } else {
                    BqsanityError::Io(e)
                }
            })?;

        if let Some(mut stdin) = bq_proc.stdin.take() {
            if let Err(e) = stdin.write_all(query.as_bytes()) {
                // A broken pipe means the tool exited before reading the
                // query; let its exit status decide the outcome below.
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            // Dropping stdin closes the pipe so the tool sees EOF.
        }

        let output = bq_proc.wait_with_output()?;
        if !output.status.success() {
            return Err(BqsanityError::bq_failed(query));
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}
