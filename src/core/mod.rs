//! Core business logic module
//!
//! This module contains the core ledger components:
//! - `classify` - Classification rule table for secondary effects
//! - `engine` - Ledger update engine (balance propagation)
//! - `summary` - Summary aggregation over the account set
//! - `filter` - Transaction query filtering

pub mod classify;
pub mod engine;
pub mod filter;
pub mod summary;

pub use classify::{classify, SecondaryEffect};
pub use engine::LedgerEngine;
pub use filter::TransactionFilter;
pub use summary::summarize;
