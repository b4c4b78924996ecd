//! Transaction-related types for the ledger engine
//!
//! This module defines the transaction direction, the caller-facing request,
//! and the stored transaction record with its account snapshot fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{AccountId, AccountType};

/// Opaque transaction identifier, assigned at creation, immutable
pub type TransactionId = Uuid;

/// Transaction direction, relative to the account it applies to
///
/// In this engine's sign convention a credit increases the stored balance
/// and a debit decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// Signed balance delta for `amount` applied in this direction
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }

    /// The opposite direction
    pub fn inverse(&self) -> Direction {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }

    /// Parse a direction from user input (case-insensitive)
    pub fn parse(value: &str) -> Option<Direction> {
        match value.to_lowercase().as_str() {
            "debit" => Some(Direction::Debit),
            "credit" => Some(Direction::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller's intent to move value
///
/// `account_id` is optional so that a missing account surfaces as a
/// validation error instead of a panic; `amount` must be a positive integer.
/// `extra_account_id` names the secondary account when the classification
/// rules call for one; leaving it out skips the secondary effect.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Primary account reference (required for a valid request)
    pub account_id: Option<AccountId>,

    /// Direction relative to the primary account
    pub direction: Direction,

    /// Positive amount in integer minor units
    pub amount: i64,

    /// Optional free text, no semantic effect
    pub note: Option<String>,

    /// Optional secondary account reference
    pub extra_account_id: Option<AccountId>,
}

impl TransactionRequest {
    pub fn new(account_id: AccountId, direction: Direction, amount: i64) -> Self {
        TransactionRequest {
            account_id: Some(account_id),
            direction,
            amount,
            note: None,
            extra_account_id: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_extra_account(mut self, extra_account_id: AccountId) -> Self {
        self.extra_account_id = Some(extra_account_id);
        self
    }
}

/// A persisted transaction record
///
/// `account_type` and `account_name` are snapshots of the primary account at
/// transaction time, stored redundantly so the record stays self-describing
/// (filtering and classification re-derivation keep working after the account
/// is renamed or retyped). `extra_account_id` is present only when a
/// secondary effect was actually applied.
///
/// Once its balance effects are applied a record is immutable except through
/// the engine's edit operation, which reverses the old effects and applies
/// the new ones before rewriting the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned at creation
    pub id: TransactionId,

    /// Primary account reference
    pub account_id: AccountId,

    /// Direction relative to the primary account
    pub direction: Direction,

    /// Positive amount in integer minor units
    pub amount: i64,

    /// Optional free text
    pub note: Option<String>,

    /// Secondary account whose balance moved in tandem, if any
    pub extra_account_id: Option<AccountId>,

    /// Snapshot of the primary account's type at transaction time
    pub account_type: AccountType,

    /// Snapshot of the primary account's name at transaction time
    pub account_name: String,

    /// Creation timestamp; orders the owner's transaction feed
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Credit, 500, 500)]
    #[case(Direction::Debit, 500, -500)]
    #[case(Direction::Credit, 0, 0)]
    fn test_signed_delta(#[case] direction: Direction, #[case] amount: i64, #[case] expected: i64) {
        assert_eq!(direction.signed(amount), expected);
    }

    #[test]
    fn test_inverse_flips_direction() {
        assert_eq!(Direction::Debit.inverse(), Direction::Credit);
        assert_eq!(Direction::Credit.inverse(), Direction::Debit);
    }

    #[rstest]
    #[case("debit", Some(Direction::Debit))]
    #[case("Credit", Some(Direction::Credit))]
    #[case("transfer", None)]
    fn test_direction_parse(#[case] input: &str, #[case] expected: Option<Direction>) {
        assert_eq!(Direction::parse(input), expected);
    }
}
