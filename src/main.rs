//! Main entry point for the bqsanity CLI

use bqsanity::cli::Cli;
use bqsanity::commands::run_consistency_check;
use bqsanity::query_execution::BqQueryExecutor;
use bqsanity::table_names::TableConfig;
use chrono::Utc;
use clap::Parser;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; the filter level must be chosen before init for
    // the verbose flag to take effect.
    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .init();

    let config = TableConfig::default();
    let end_date = cli.end_date.unwrap_or_else(|| Utc::now().naive_utc());

    match run_consistency_check(
        BqQueryExecutor::new(),
        &config,
        cli.project,
        cli.start_date,
        end_date,
        cli.interval,
    ) {
        Ok(true) => {}
        Ok(false) => {
            // Every failed window was already logged; signal failure to the
            // caller through the exit status.
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
