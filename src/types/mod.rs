//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account-related types and identifiers
//! - `transaction`: Transaction direction, requests, and stored records
//! - `summary`: Dashboard summary figures
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod error;
pub mod summary;
pub mod transaction;

pub use account::{Account, AccountId, AccountType, NewAccount, OwnerId};
pub use error::LedgerError;
pub use summary::Summary;
pub use transaction::{Direction, Transaction, TransactionId, TransactionRequest};
