//! Ledger update engine
//!
//! This module provides the `LedgerEngine`, which turns transaction requests
//! into balance movements by coordinating the classification rules and the
//! account store.
//!
//! # Design
//!
//! The engine owns no state of its own; it holds an `Arc` to an
//! [`AccountStore`] and can be cloned and shared across threads. Every
//! balance mutation goes through the store's conditional write: the engine
//! reads the account fresh, computes the new balance with checked
//! arithmetic, and issues a write keyed on the balance it read. A concurrent
//! writer makes the conditional write fail, and the engine re-reads and
//! retries a bounded number of times before surfacing `Conflict`.
//!
//! # Atomicity
//!
//! An operation that moves more than one account first merges its deltas per
//! account, then applies them one at a time. If a later delta fails after
//! its retries, the already-applied deltas are rolled back in reverse order,
//! so a failed secondary update never leaves the primary moved. The
//! transaction record is only persisted after every delta committed.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::classify::classify;
use crate::core::summary::summarize;
use crate::store::AccountStore;
use crate::types::{
    AccountId, AccountType, LedgerError, NewAccount, Summary, Transaction, TransactionId,
    TransactionRequest,
};

/// Attempts allowed for one conditional balance write before giving up
const MAX_BALANCE_RETRIES: u32 = 5;

/// Names of the accounts seeded for a new owner, all Asset with balance 0
const DEFAULT_ACCOUNT_NAMES: [&str; 3] = ["Cash", "Bank", "Investment"];

/// Transaction processing engine over a pluggable account store
///
/// The engine is cheap to clone; clones share the same underlying store.
#[derive(Debug)]
pub struct LedgerEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for LedgerEngine<S> {
    fn clone(&self) -> Self {
        LedgerEngine {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: AccountStore> LedgerEngine<S> {
    /// Create an engine over the given store
    pub fn new(store: Arc<S>) -> Self {
        LedgerEngine { store }
    }

    /// Access the underlying store (listing, subscriptions)
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Seed the default account set for an owner with no accounts yet
    ///
    /// Creates Cash, Bank, and Investment (all Asset, balance 0) exactly
    /// once; an owner that already has any account is left untouched.
    ///
    /// # Returns
    ///
    /// The ids of the accounts created, empty when seeding was skipped.
    pub fn ensure_default_accounts(&self, owner: &str) -> Result<Vec<AccountId>, LedgerError> {
        if !self.store.list_accounts(owner).is_empty() {
            return Ok(Vec::new());
        }

        let mut created = Vec::with_capacity(DEFAULT_ACCOUNT_NAMES.len());
        for name in DEFAULT_ACCOUNT_NAMES {
            let id = self
                .store
                .create_account(owner, NewAccount::new(name, AccountType::Asset))?;
            created.push(id);
        }
        tracing::debug!(owner, count = created.len(), "seeded default accounts");
        Ok(created)
    }

    /// Create an account for the owner
    pub fn create_account(
        &self,
        owner: &str,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Result<AccountId, LedgerError> {
        self.store
            .create_account(owner, NewAccount::new(name, account_type))
    }

    /// Record a transaction and apply its balance effects
    ///
    /// Steps:
    /// 1. Validate the request (account present, amount a positive integer).
    /// 2. Resolve the primary account and snapshot its name/type.
    /// 3. Classify the snapshot; when the rules require a secondary effect
    ///    and the request names an extra account, resolve it and compute its
    ///    delta. An extra account without a required effect is ignored; a
    ///    required effect without an extra account is skipped without error.
    /// 4. Apply all balance deltas atomically (conditional writes with
    ///    bounded retry, rollback of applied deltas on failure).
    /// 5. Persist the transaction record; subscribers are notified by the
    ///    store.
    ///
    /// # Errors
    ///
    /// * `MissingAccount` / `InvalidAmount` - malformed request, nothing mutated
    /// * `AccountNotFound` - primary or referenced extra account absent, nothing mutated
    /// * `Conflict` - a balance write lost the race after bounded retries
    /// * `ArithmeticOverflow` - a balance would leave the i64 range
    pub fn record_transaction(
        &self,
        owner: &str,
        request: TransactionRequest,
    ) -> Result<TransactionId, LedgerError> {
        let (account_id, amount) = validate(&request)?;

        let primary = self
            .store
            .get_account(owner, account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        let effect = classify(&primary.name, primary.account_type, request.direction);
        let extra_account_id = match (effect, request.extra_account_id) {
            (Some(_), Some(extra_id)) => {
                // Resolved up front so a dangling reference is rejected
                // before any mutation.
                self.store
                    .get_account(owner, extra_id)
                    .ok_or_else(|| LedgerError::account_not_found(extra_id))?;
                Some(extra_id)
            }
            _ => None,
        };

        let mut deltas = vec![(account_id, request.direction.signed(amount))];
        if let (Some(effect), Some(extra_id)) = (effect, extra_account_id) {
            deltas.push((extra_id, effect.direction.signed(amount)));
        }
        self.apply_deltas(owner, deltas)?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            account_id,
            direction: request.direction,
            amount,
            note: request.note,
            extra_account_id,
            account_type: primary.account_type,
            account_name: primary.name,
            created_at: Utc::now(),
        };
        let transaction_id = self.store.create_transaction(owner, transaction)?;
        tracing::debug!(owner, %transaction_id, "recorded transaction");
        Ok(transaction_id)
    }

    /// Edit a transaction, re-deriving all balance effects
    ///
    /// Reverses the stored transaction's effects (inverse deltas from the
    /// stored amount, direction, and extra account, with the secondary
    /// direction re-derived from the stored name/type snapshots), applies
    /// the new request's effects per [`Self::record_transaction`], and
    /// rewrites the record. Reversal and re-application are merged into one
    /// delta set, so the whole edit is a single atomic operation. The record
    /// keeps its id and creation timestamp.
    ///
    /// # Errors
    ///
    /// As [`Self::record_transaction`], plus `TransactionNotFound` when the
    /// edited transaction does not exist for this owner.
    pub fn update_transaction(
        &self,
        owner: &str,
        transaction_id: TransactionId,
        request: TransactionRequest,
    ) -> Result<(), LedgerError> {
        let (account_id, amount) = validate(&request)?;

        let original = self
            .store
            .get_transaction(owner, transaction_id)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction_id))?;

        // Inverse of the original effects, from the stored snapshot.
        let mut deltas = vec![(
            original.account_id,
            original.direction.inverse().signed(original.amount),
        )];
        if let (Some(effect), Some(extra_id)) = (
            classify(
                &original.account_name,
                original.account_type,
                original.direction,
            ),
            original.extra_account_id,
        ) {
            deltas.push((extra_id, effect.direction.inverse().signed(original.amount)));
        }

        // New effects, resolved fresh.
        let primary = self
            .store
            .get_account(owner, account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        let effect = classify(&primary.name, primary.account_type, request.direction);
        let extra_account_id = match (effect, request.extra_account_id) {
            (Some(_), Some(extra_id)) => {
                self.store
                    .get_account(owner, extra_id)
                    .ok_or_else(|| LedgerError::account_not_found(extra_id))?;
                Some(extra_id)
            }
            _ => None,
        };
        deltas.push((account_id, request.direction.signed(amount)));
        if let (Some(effect), Some(extra_id)) = (effect, extra_account_id) {
            deltas.push((extra_id, effect.direction.signed(amount)));
        }

        self.apply_deltas(owner, deltas)?;

        let updated = Transaction {
            id: original.id,
            account_id,
            direction: request.direction,
            amount,
            note: request.note,
            extra_account_id,
            account_type: primary.account_type,
            account_name: primary.name,
            created_at: original.created_at,
        };
        self.store.update_transaction(owner, updated)?;
        tracing::debug!(owner, %transaction_id, "updated transaction");
        Ok(())
    }

    /// Current dashboard summary for the owner
    pub fn summary(&self, owner: &str) -> Summary {
        summarize(&self.store.list_accounts(owner))
    }

    /// Apply a set of balance deltas as one atomic operation
    ///
    /// Deltas are merged per account first (one conditional write per
    /// account, zero deltas dropped). On failure the already-applied deltas
    /// are rolled back in reverse order.
    fn apply_deltas(
        &self,
        owner: &str,
        deltas: Vec<(AccountId, i64)>,
    ) -> Result<(), LedgerError> {
        let merged = merge_deltas(deltas)?;

        let mut applied: Vec<(AccountId, i64)> = Vec::with_capacity(merged.len());
        for (account_id, delta) in merged {
            match self.apply_delta(owner, account_id, delta) {
                Ok(()) => applied.push((account_id, delta)),
                Err(err) => {
                    for &(rolled_id, rolled_delta) in applied.iter().rev() {
                        if let Err(rollback_err) = self.apply_delta(owner, rolled_id, -rolled_delta)
                        {
                            tracing::error!(
                                owner,
                                account = %rolled_id,
                                error = %rollback_err,
                                "failed to roll back balance delta"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Apply one delta through the store's conditional write
    ///
    /// Reads the current balance fresh on every attempt; a conditional-write
    /// conflict triggers a re-read and retry up to `MAX_BALANCE_RETRIES`.
    fn apply_delta(
        &self,
        owner: &str,
        account_id: AccountId,
        delta: i64,
    ) -> Result<(), LedgerError> {
        for attempt in 0..MAX_BALANCE_RETRIES {
            let account = self
                .store
                .get_account(owner, account_id)
                .ok_or_else(|| LedgerError::account_not_found(account_id))?;

            let new_balance = account
                .balance
                .checked_add(delta)
                .ok_or_else(|| LedgerError::arithmetic_overflow("apply_delta", account_id))?;

            match self
                .store
                .update_account_balance(owner, account_id, account.balance, new_balance)
            {
                Ok(()) => return Ok(()),
                Err(LedgerError::Conflict { .. }) => {
                    tracing::debug!(owner, account = %account_id, attempt, "balance write conflict, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(owner, account = %account_id, "balance write retries exhausted");
        Err(LedgerError::conflict(account_id))
    }
}

/// Reject malformed requests before anything is read or written
fn validate(request: &TransactionRequest) -> Result<(AccountId, i64), LedgerError> {
    let account_id = request.account_id.ok_or(LedgerError::MissingAccount)?;
    if request.amount <= 0 {
        return Err(LedgerError::invalid_amount(request.amount));
    }
    Ok((account_id, request.amount))
}

/// Merge deltas per account, preserving first-occurrence order
///
/// A zero merged delta is dropped entirely, so an account whose movements
/// cancel out is not written at all.
fn merge_deltas(deltas: Vec<(AccountId, i64)>) -> Result<Vec<(AccountId, i64)>, LedgerError> {
    let mut merged: Vec<(AccountId, i64)> = Vec::with_capacity(deltas.len());
    for (account_id, delta) in deltas {
        match merged.iter_mut().find(|(id, _)| *id == account_id) {
            Some((_, existing)) => {
                *existing = existing
                    .checked_add(delta)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("merge_deltas", account_id))?;
            }
            None => merged.push((account_id, delta)),
        }
    }
    merged.retain(|&(_, delta)| delta != 0);
    Ok(merged)
}
