//! Error types for the ledger engine
//!
//! This module defines all error conditions the engine and its CLI driver
//! can surface.
//!
//! # Error Categories
//!
//! - **Validation errors**: malformed request (missing account, non-positive
//!   amount) — rejected before any mutation, fully recoverable.
//! - **Not-found errors**: referenced account or transaction does not exist —
//!   rejected before mutation.
//! - **Conflict**: a concurrent balance mutation won the race and the bounded
//!   retries ran out — surfaced to the caller as a request to retry.
//! - **Arithmetic errors**: a balance update would overflow i64.
//! - **File I/O / CSV errors**: CLI-boundary failures.
//!
//! All errors are terminal to the single operation; none are process-fatal
//! to the library.

use thiserror::Error;

use super::account::AccountId;
use super::transaction::TransactionId;

/// Main error type for the ledger engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    ///
    /// Fatal to the CLI run; it prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The request named no primary account
    ///
    /// Validation error, rejected before any mutation.
    #[error("Transaction request requires an account")]
    MissingAccount,

    /// The request's amount is not a positive integer
    ///
    /// Validation error, rejected before any mutation.
    #[error("Invalid amount {amount}: amount must be a positive integer")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// A referenced account does not exist for this owner
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// The account that was not found
        account_id: AccountId,
    },

    /// A referenced transaction does not exist for this owner
    #[error("Transaction {transaction_id} not found")]
    TransactionNotFound {
        /// The transaction that was not found
        transaction_id: TransactionId,
    },

    /// A concurrent balance mutation lost the race after bounded retries
    ///
    /// The operation did not apply; the caller may retry the whole request.
    #[error("Concurrent update on account {account_id}: balance changed underneath, retry")]
    Conflict {
        /// The contended account
        account_id: AccountId,
    },

    /// A balance update would overflow the i64 minor-unit range
    #[error("Arithmetic overflow in {operation} for account {account_id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// The affected account
        account_id: AccountId,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

// Helper constructors for the variants built in more than one place
impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: AccountId) -> Self {
        LedgerError::AccountNotFound { account_id }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(transaction_id: TransactionId) -> Self {
        LedgerError::TransactionNotFound { transaction_id }
    }

    /// Create a Conflict error
    pub fn conflict(account_id: AccountId) -> Self {
        LedgerError::Conflict { account_id }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account_id: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_id,
        }
    }

    /// Whether the error is a malformed-request rejection
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::MissingAccount | LedgerError::InvalidAmount { .. }
        )
    }
}
