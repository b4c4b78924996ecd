//! Ledger Engine CLI
//!
//! Command-line interface for processing ledger entries from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv > accounts.csv
//! cargo run -- --report summary ledger.csv > summary.csv
//! cargo run -- --seed-defaults ledger.csv > accounts.csv
//! ```
//!
//! The program reads ledger entries from the input CSV file, applies them
//! through the ledger engine (creating accounts on first reference), and
//! writes the selected report to stdout. Row-level problems are logged and
//! skipped; set `RUST_LOG=warn` (or finer) to see them.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;

use tracing_subscriber::EnvFilter;

use rust_ledger_engine::cli;
use rust_ledger_engine::pipeline;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    // Reports go to stdout; diagnostics stay on stderr.
    let mut output = std::io::stdout();
    if let Err(e) = pipeline::process_ledger(
        &args.input_file,
        &mut output,
        args.report,
        args.seed_defaults,
        &args.owner,
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
