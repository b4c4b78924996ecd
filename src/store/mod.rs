//! Account/transaction persistence abstraction
//!
//! The ledger engine consumes this seam instead of a concrete store, so any
//! backend that supports conditional writes and change notification can sit
//! behind it. The bundled [`MemoryStore`] is the concurrent in-memory
//! reference implementation.

pub mod memory;
pub mod subscription;

pub use memory::MemoryStore;
pub use subscription::Subscription;

use crate::types::{Account, AccountId, LedgerError, NewAccount, Transaction, TransactionId};

/// Persistence contract the ledger engine is written against
///
/// Implementations must serialize nothing beyond the per-account conditional
/// balance write: `update_account_balance` succeeds only while the stored
/// balance still equals `expected_prior_balance`, which is what lets the
/// engine run a bounded read-compare-retry loop without lost updates.
///
/// Owner isolation is part of the contract: every method scopes to the given
/// owner, and a lookup under the wrong owner behaves as not-found.
pub trait AccountStore: Send + Sync {
    /// Create an account with balance 0; the store assigns id and timestamp
    fn create_account(&self, owner: &str, account: NewAccount)
        -> Result<AccountId, LedgerError>;

    /// Fetch a single account, or `None` if absent for this owner
    fn get_account(&self, owner: &str, account_id: AccountId) -> Option<Account>;

    /// All accounts for the owner, ordered by creation time (name tie-break)
    fn list_accounts(&self, owner: &str) -> Vec<Account>;

    /// Conditional balance write
    ///
    /// # Errors
    ///
    /// * `Conflict` - the stored balance no longer equals
    ///   `expected_prior_balance`; nothing was written
    /// * `AccountNotFound` - no such account for this owner
    fn update_account_balance(
        &self,
        owner: &str,
        account_id: AccountId,
        expected_prior_balance: i64,
        new_balance: i64,
    ) -> Result<(), LedgerError>;

    /// Persist a transaction record and return its id
    fn create_transaction(
        &self,
        owner: &str,
        transaction: Transaction,
    ) -> Result<TransactionId, LedgerError>;

    /// Fetch a single transaction, or `None` if absent for this owner
    fn get_transaction(&self, owner: &str, transaction_id: TransactionId) -> Option<Transaction>;

    /// All transactions for the owner, newest first
    fn list_transactions(&self, owner: &str) -> Vec<Transaction>;

    /// Rewrite the fields of an existing transaction record
    ///
    /// Balance effects are the engine's responsibility; the store only
    /// replaces the record.
    ///
    /// # Errors
    ///
    /// * `TransactionNotFound` - no such transaction for this owner
    fn update_transaction(&self, owner: &str, transaction: Transaction)
        -> Result<(), LedgerError>;

    /// Subscribe to the owner's account set
    ///
    /// Each account mutation pushes the full ordered set. The subscription
    /// is cancellable at any time with no residual effect on the store.
    fn subscribe_accounts(&self, owner: &str) -> Subscription<Vec<Account>>;

    /// Subscribe to the owner's transaction feed (newest first)
    fn subscribe_transactions(&self, owner: &str) -> Subscription<Vec<Transaction>>;
}
