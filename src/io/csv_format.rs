//! CSV format handling for ledger input and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger entries
//! - Account table and summary report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use serde::Deserialize;
use std::io::Write;

use crate::types::{Account, AccountType, Direction, Summary};

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// `account,type,direction,amount,note,extra`. The trailing columns are
/// optional; `extra` names the secondary account when the classification
/// rules call for one.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub account: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub direction: String,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub extra: Option<String>,
}

/// A parsed input row, addressed by account name
///
/// The pipeline resolves names to account ids (creating accounts on first
/// reference) before handing the intent to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub account: String,
    pub account_type: AccountType,
    pub direction: Direction,
    pub amount: i64,
    pub note: Option<String>,
    pub extra: Option<String>,
}

/// Convert a CsvRecord to a LedgerEntry
///
/// This function:
/// - Rejects empty account names
/// - Parses the account type and direction enumerations (case-insensitive)
/// - Parses the amount as a positive integer in minor units
/// - Normalizes empty optional fields to `None`
///
/// # Returns
///
/// Result containing either:
/// - Ok(LedgerEntry) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(record: CsvRecord) -> Result<LedgerEntry, String> {
    let account = record.account.trim().to_string();
    if account.is_empty() {
        return Err("Row requires an account name".to_string());
    }

    let account_type = AccountType::parse(record.account_type.trim())
        .ok_or_else(|| format!("Invalid account type: '{}'", record.account_type))?;

    let direction = Direction::parse(record.direction.trim())
        .ok_or_else(|| format!("Invalid direction: '{}'", record.direction))?;

    let amount = match record.amount {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid amount '{}'", raw))?,
        _ => return Err(format!("Row for account '{}' requires an amount", account)),
    };
    if amount <= 0 {
        return Err(format!(
            "Invalid amount {}: amount must be a positive integer",
            amount
        ));
    }

    let normalize = |field: Option<String>| {
        field.and_then(|value| {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    };

    Ok(LedgerEntry {
        account,
        account_type,
        direction,
        amount,
        note: normalize(record.note),
        extra: normalize(record.extra),
    })
}

/// Write the final account table as CSV
///
/// Columns: `name,type,balance`, sorted by name for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["name", "type", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.name.cmp(&b.name));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.name.clone(),
                account.account_type.to_string(),
                account.balance.to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the dashboard summary as CSV
///
/// Columns: `metric,value`, one row per figure, in dashboard order.
pub fn write_summary_csv(summary: &Summary, output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let rows = [
        ("total_everything", summary.total_everything),
        ("total_excluding_funds", summary.total_excluding_funds),
        ("cash_balance", summary.cash_balance),
        ("investment_only", summary.investment_only),
        ("total_funds", summary.total_funds),
        (
            "total_to_take_from_parties",
            summary.total_to_take_from_parties,
        ),
        ("total_to_pay_to_parties", summary.total_to_pay_to_parties),
    ];

    let mut writer = Writer::from_writer(output);
    writer
        .write_record(["metric", "value"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;
    for (metric, value) in rows {
        writer
            .write_record(&[metric.to_string(), value.to_string()])
            .map_err(|e| format!("Failed to write summary record: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
