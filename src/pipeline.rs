//! Ledger processing pipeline
//!
//! Orchestrates the CLI flow: stream ledger entries from a CSV file, resolve
//! account names to accounts (creating them on first reference), drive every
//! row through the ledger engine, and write the requested report.
//!
//! # Error Handling
//!
//! Fatal errors (file not found, output failures) are returned immediately.
//! Individual row errors — parse failures, unknown extra accounts, rejected
//! requests — are logged and processing continues with the next row.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ReportKind;
use crate::core::LedgerEngine;
use crate::io::csv_format::{write_accounts_csv, write_summary_csv, LedgerEntry};
use crate::io::reader::LedgerReader;
use crate::store::{AccountStore, MemoryStore};
use crate::types::{AccountId, TransactionRequest};

/// Process a ledger CSV file and write the requested report
///
/// Accounts are addressed by name in the input; the first row naming an
/// account creates it with the row's type, later rows reuse it (their type
/// column is ignored). The `extra` column must name an account that already
/// exists — either seeded via `seed_defaults` or created by an earlier row —
/// because a bare name carries no type to create one from.
///
/// # Arguments
///
/// * `input_path` - Path to the input CSV file
/// * `output` - Writer receiving the report CSV
/// * `report` - Which report to write: final account table or summary
/// * `seed_defaults` - Seed Cash/Bank/Investment before processing
/// * `owner` - Owner namespace the run operates in
///
/// # Returns
///
/// * `Ok(())` if processing completed (possibly with skipped rows)
/// * `Err(String)` if a fatal error occurred
pub fn process_ledger(
    input_path: &Path,
    output: &mut dyn Write,
    report: ReportKind,
    seed_defaults: bool,
    owner: &str,
) -> Result<(), String> {
    let engine = LedgerEngine::new(Arc::new(MemoryStore::new()));

    if seed_defaults {
        engine
            .ensure_default_accounts(owner)
            .map_err(|e| format!("Failed to seed default accounts: {}", e))?;
    }

    // Name -> id map for the accounts seen so far (includes seeded ones).
    let mut accounts_by_name: HashMap<String, AccountId> = engine
        .store()
        .list_accounts(owner)
        .into_iter()
        .map(|account| (account.name, account.id))
        .collect();

    let reader = LedgerReader::new(input_path)?;
    for result in reader {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unparsable row");
                continue;
            }
        };

        if let Err(e) = apply_entry(&engine, owner, &mut accounts_by_name, entry) {
            tracing::warn!(error = %e, "skipping rejected row");
        }
    }

    match report {
        ReportKind::Accounts => {
            write_accounts_csv(&engine.store().list_accounts(owner), output)
        }
        ReportKind::Summary => write_summary_csv(&engine.summary(owner), output),
    }
}

/// Resolve one entry's account names and record it through the engine
fn apply_entry(
    engine: &LedgerEngine<MemoryStore>,
    owner: &str,
    accounts_by_name: &mut HashMap<String, AccountId>,
    entry: LedgerEntry,
) -> Result<(), String> {
    let account_id = match accounts_by_name.get(&entry.account) {
        Some(id) => *id,
        None => {
            let id = engine
                .create_account(owner, entry.account.clone(), entry.account_type)
                .map_err(|e| format!("Failed to create account '{}': {}", entry.account, e))?;
            accounts_by_name.insert(entry.account.clone(), id);
            id
        }
    };

    let extra_account_id = match &entry.extra {
        Some(name) => Some(
            accounts_by_name
                .get(name)
                .copied()
                .ok_or_else(|| format!("Unknown extra account '{}'", name))?,
        ),
        None => None,
    };

    let mut request = TransactionRequest::new(account_id, entry.direction, entry.amount);
    request.note = entry.note;
    request.extra_account_id = extra_account_id;

    engine
        .record_transaction(owner, request)
        .map(|_| ())
        .map_err(|e| format!("Transaction on '{}' rejected: {}", entry.account, e))
}
