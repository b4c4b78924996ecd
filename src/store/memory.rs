//! Concurrent in-memory account store
//!
//! Reference implementation of [`AccountStore`] backed by a `DashMap` keyed
//! by owner. Entry locking scopes every operation to one owner's state, so
//! different owners never contend; the conditional balance write is the only
//! coordination point the engine relies on.
//!
//! Every mutation publishes the full re-sorted snapshot (accounts by
//! creation time ascending, transactions newest first) to that owner's
//! subscribers, mirroring a change-notification feed over the whole set.

use std::collections::HashMap;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{AccountStore, Subscription};
use crate::types::{
    Account, AccountId, LedgerError, NewAccount, OwnerId, Transaction, TransactionId,
};

/// Snapshots buffered per subscriber before old ones are dropped
const EVENT_BUFFER: usize = 32;

#[derive(Debug)]
struct OwnerState {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, Transaction>,
    account_events: broadcast::Sender<Vec<Account>>,
    transaction_events: broadcast::Sender<Vec<Transaction>>,
}

impl Default for OwnerState {
    fn default() -> Self {
        let (account_events, _) = broadcast::channel(EVENT_BUFFER);
        let (transaction_events, _) = broadcast::channel(EVENT_BUFFER);
        OwnerState {
            accounts: HashMap::new(),
            transactions: HashMap::new(),
            account_events,
            transaction_events,
        }
    }
}

impl OwnerState {
    fn sorted_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        accounts
    }

    fn sorted_transactions(&self) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self.transactions.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        transactions
    }

    fn publish_accounts(&self) {
        // No subscribers is fine; the send result only reports that.
        let _ = self.account_events.send(self.sorted_accounts());
    }

    fn publish_transactions(&self) {
        let _ = self.transaction_events.send(self.sorted_transactions());
    }
}

/// In-memory [`AccountStore`] with per-owner isolation
#[derive(Debug, Default)]
pub struct MemoryStore {
    owners: DashMap<OwnerId, OwnerState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename an account, keeping id, type, balance, and history
    ///
    /// Transactions hold name snapshots, so past records are unaffected.
    /// Returns false when the account does not exist for this owner.
    pub fn rename_account(&self, owner: &str, account_id: AccountId, name: &str) -> bool {
        let Some(mut state) = self.owners.get_mut(owner) else {
            return false;
        };
        match state.accounts.get_mut(&account_id) {
            Some(account) => {
                account.name = name.to_string();
                state.publish_accounts();
                true
            }
            None => false,
        }
    }
}

impl AccountStore for MemoryStore {
    fn create_account(
        &self,
        owner: &str,
        account: NewAccount,
    ) -> Result<AccountId, LedgerError> {
        let mut state = self.owners.entry(owner.to_string()).or_insert_with(OwnerState::default);

        let id = Uuid::new_v4();
        state.accounts.insert(
            id,
            Account {
                id,
                name: account.name,
                account_type: account.account_type,
                balance: 0,
                created_at: Utc::now(),
            },
        );
        state.publish_accounts();
        Ok(id)
    }

    fn get_account(&self, owner: &str, account_id: AccountId) -> Option<Account> {
        self.owners
            .get(owner)
            .and_then(|state| state.accounts.get(&account_id).cloned())
    }

    fn list_accounts(&self, owner: &str) -> Vec<Account> {
        self.owners
            .get(owner)
            .map(|state| state.sorted_accounts())
            .unwrap_or_default()
    }

    fn update_account_balance(
        &self,
        owner: &str,
        account_id: AccountId,
        expected_prior_balance: i64,
        new_balance: i64,
    ) -> Result<(), LedgerError> {
        let mut state = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        // The compare and the write happen under the owner's entry lock.
        if account.balance != expected_prior_balance {
            return Err(LedgerError::conflict(account_id));
        }
        account.balance = new_balance;
        state.publish_accounts();
        Ok(())
    }

    fn create_transaction(
        &self,
        owner: &str,
        transaction: Transaction,
    ) -> Result<TransactionId, LedgerError> {
        let mut state = self.owners.entry(owner.to_string()).or_insert_with(OwnerState::default);

        let id = transaction.id;
        state.transactions.insert(id, transaction);
        state.publish_transactions();
        Ok(id)
    }

    fn get_transaction(&self, owner: &str, transaction_id: TransactionId) -> Option<Transaction> {
        self.owners
            .get(owner)
            .and_then(|state| state.transactions.get(&transaction_id).cloned())
    }

    fn list_transactions(&self, owner: &str) -> Vec<Transaction> {
        self.owners
            .get(owner)
            .map(|state| state.sorted_transactions())
            .unwrap_or_default()
    }

    fn update_transaction(
        &self,
        owner: &str,
        transaction: Transaction,
    ) -> Result<(), LedgerError> {
        let mut state = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction.id))?;

        match state.transactions.get_mut(&transaction.id) {
            Some(existing) => {
                *existing = transaction;
                state.publish_transactions();
                Ok(())
            }
            None => Err(LedgerError::transaction_not_found(transaction.id)),
        }
    }

    fn subscribe_accounts(&self, owner: &str) -> Subscription<Vec<Account>> {
        let state = self.owners.entry(owner.to_string()).or_insert_with(OwnerState::default);
        Subscription::new(state.account_events.subscribe())
    }

    fn subscribe_transactions(&self, owner: &str) -> Subscription<Vec<Transaction>> {
        let state = self.owners.entry(owner.to_string()).or_insert_with(OwnerState::default);
        Subscription::new(state.transaction_events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountType, Direction};
    use std::time::Duration;

    const OWNER: &str = "owner-1";

    fn transaction_record(account_id: AccountId, amount: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            account_id,
            direction: Direction::Credit,
            amount,
            note: None,
            extra_account_id: None,
            account_type: AccountType::Asset,
            account_name: "Bank".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_account_starts_at_zero() {
        let store = MemoryStore::new();
        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        let account = store.get_account(OWNER, id).unwrap();
        assert_eq!(account.name, "Bank");
        assert_eq!(account.account_type, AccountType::Asset);
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_get_account_wrong_owner_is_none() {
        let store = MemoryStore::new();
        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        assert!(store.get_account("other-owner", id).is_none());
        assert!(store.list_accounts("other-owner").is_empty());
    }

    #[test]
    fn test_list_accounts_ordered_by_creation() {
        let store = MemoryStore::new();
        let first = store
            .create_account(OWNER, NewAccount::new("Zebra", AccountType::Asset))
            .unwrap();
        std::thread::sleep(Duration::from_millis(2));
        let second = store
            .create_account(OWNER, NewAccount::new("Alpha", AccountType::Party))
            .unwrap();

        let listed: Vec<AccountId> = store.list_accounts(OWNER).iter().map(|a| a.id).collect();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn test_conditional_write_applies_when_prior_matches() {
        let store = MemoryStore::new();
        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        store.update_account_balance(OWNER, id, 0, 250).unwrap();
        assert_eq!(store.get_account(OWNER, id).unwrap().balance, 250);
    }

    #[test]
    fn test_conditional_write_conflicts_on_stale_prior() {
        let store = MemoryStore::new();
        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        store.update_account_balance(OWNER, id, 0, 100).unwrap();

        // A writer that still believes the balance is 0 must lose.
        let result = store.update_account_balance(OWNER, id, 0, 300);
        assert_eq!(result, Err(LedgerError::conflict(id)));
        assert_eq!(store.get_account(OWNER, id).unwrap().balance, 100);
    }

    #[test]
    fn test_conditional_write_unknown_account() {
        let store = MemoryStore::new();
        store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        let ghost = Uuid::new_v4();

        let result = store.update_account_balance(OWNER, ghost, 0, 10);
        assert_eq!(result, Err(LedgerError::account_not_found(ghost)));
    }

    #[test]
    fn test_transactions_listed_newest_first() {
        let store = MemoryStore::new();
        let account = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        let older = transaction_record(account, 1);
        store.create_transaction(OWNER, older.clone()).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        let newer = transaction_record(account, 2);
        store.create_transaction(OWNER, newer.clone()).unwrap();

        let listed: Vec<TransactionId> = store
            .list_transactions(OWNER)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![newer.id, older.id]);
    }

    #[test]
    fn test_update_transaction_rewrites_fields() {
        let store = MemoryStore::new();
        let account = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        let mut record = transaction_record(account, 100);
        store.create_transaction(OWNER, record.clone()).unwrap();

        record.amount = 350;
        record.note = Some("corrected".to_string());
        store.update_transaction(OWNER, record.clone()).unwrap();

        let stored = store.get_transaction(OWNER, record.id).unwrap();
        assert_eq!(stored.amount, 350);
        assert_eq!(stored.note.as_deref(), Some("corrected"));
    }

    #[test]
    fn test_update_unknown_transaction_is_not_found() {
        let store = MemoryStore::new();
        let record = transaction_record(Uuid::new_v4(), 100);

        let result = store.update_transaction(OWNER, record.clone());
        assert_eq!(result, Err(LedgerError::transaction_not_found(record.id)));
    }

    #[test]
    fn test_rename_account_keeps_balance() {
        let store = MemoryStore::new();
        let id = store
            .create_account(OWNER, NewAccount::new("Investment", AccountType::Asset))
            .unwrap();
        store.update_account_balance(OWNER, id, 0, 500).unwrap();

        assert!(store.rename_account(OWNER, id, "Brokerage"));
        let account = store.get_account(OWNER, id).unwrap();
        assert_eq!(account.name, "Brokerage");
        assert_eq!(account.balance, 500);

        assert!(!store.rename_account(OWNER, Uuid::new_v4(), "Nope"));
    }

    #[tokio::test]
    async fn test_account_subscription_pushes_full_snapshot() {
        let store = MemoryStore::new();
        let mut subscription = store.subscribe_accounts(OWNER);

        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        let snapshot = subscription.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);

        store.update_account_balance(OWNER, id, 0, 75).unwrap();
        let snapshot = subscription.recv().await.unwrap();
        assert_eq!(snapshot[0].balance, 75);
    }

    #[tokio::test]
    async fn test_transaction_subscription_pushes_feed() {
        let store = MemoryStore::new();
        let account = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        let mut subscription = store.subscribe_transactions(OWNER);

        let record = transaction_record(account, 40);
        store.create_transaction(OWNER, record.clone()).unwrap();

        let snapshot = subscription.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, record.id);
    }

    #[tokio::test]
    async fn test_cancelled_subscription_receives_nothing() {
        let store = MemoryStore::new();
        let mut subscription = store.subscribe_accounts(OWNER);
        subscription.cancel();

        store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        assert_eq!(subscription.recv().await, None);
    }

    #[tokio::test]
    async fn test_subscriptions_are_per_owner() {
        let store = MemoryStore::new();
        let mut other = store.subscribe_accounts("other-owner");

        store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();
        assert_eq!(other.try_recv(), None);
    }

    #[test]
    fn test_concurrent_conditional_writes_single_winner() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        let id = store
            .create_account(OWNER, NewAccount::new("Bank", AccountType::Asset))
            .unwrap();

        let mut handles = vec![];
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.update_account_balance(OWNER, id, 0, 42).is_ok()
            }));
        }

        // All writers raced with the same expected prior balance, so
        // exactly one wins and the rest conflict.
        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.get_account(OWNER, id).unwrap().balance, 42);
    }
}
