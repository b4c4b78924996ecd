//! Transaction query filtering
//!
//! Predicate composition over an already-loaded transaction list. Type and
//! account filters match the snapshots stored on the transaction, so the
//! feed keeps filtering correctly after an account is renamed or retyped.

use chrono::{DateTime, Datelike, Utc};

use crate::types::{AccountType, Transaction};

/// Composable transaction filter
///
/// Every field is optional; set fields are combined with AND, and an empty
/// filter matches everything. Membership lists use OR within the list.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Snapshot account types to include
    pub account_types: Vec<AccountType>,

    /// Accounts to include, matched by snapshot name or by account id string
    pub accounts: Vec<String>,

    /// Inclusive lower bound on `created_at`
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `created_at`
    pub to: Option<DateTime<Utc>>,

    /// Calendar month of `created_at` (1-12)
    pub month: Option<u32>,

    /// Calendar year of `created_at`
    pub year: Option<i32>,
}

impl TransactionFilter {
    /// Whether a single transaction passes every set predicate
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if !self.account_types.is_empty()
            && !self.account_types.contains(&transaction.account_type)
        {
            return false;
        }

        if !self.accounts.is_empty() {
            let id = transaction.account_id.to_string();
            let named = self
                .accounts
                .iter()
                .any(|wanted| *wanted == transaction.account_name || *wanted == id);
            if !named {
                return false;
            }
        }

        if let Some(from) = self.from {
            if transaction.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if transaction.created_at > to {
                return false;
            }
        }
        if let Some(month) = self.month {
            if transaction.created_at.month() != month {
                return false;
            }
        }
        if let Some(year) = self.year {
            if transaction.created_at.year() != year {
                return false;
            }
        }

        true
    }

    /// Filter a loaded list, preserving its order
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}
