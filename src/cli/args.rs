use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Track accounts and transactions, reporting balances or the dashboard summary
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Process a ledger CSV into account balances or a dashboard summary", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger entries
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Report written to stdout after processing
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "accounts",
        help = "Report to produce: 'accounts' for the balance table or 'summary' for dashboard figures"
    )]
    pub report: ReportKind,

    /// Seed the default Cash/Bank/Investment accounts before processing
    #[arg(long = "seed-defaults", help = "Create the default account set first")]
    pub seed_defaults: bool,

    /// Owner namespace the run operates in
    #[arg(
        long = "owner",
        value_name = "OWNER",
        default_value = "local",
        help = "Owner whose accounts the ledger belongs to"
    )]
    pub owner: String,
}

/// Available reports for CSV output
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Accounts,
    Summary,
}
