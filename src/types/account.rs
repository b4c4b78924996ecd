//! Account-related types for the ledger engine
//!
//! This module defines the Account structure, the closed account-type
//! enumeration, and the identifier aliases used throughout the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner identifier
///
/// Each owner has an isolated namespace of accounts and transactions.
pub type OwnerId = String;

/// Opaque account identifier, assigned at creation, immutable
pub type AccountId = Uuid;

/// Closed enumeration of account classifiers
///
/// - `Asset`: an owned resource (cash, bank balance, investments)
/// - `Party`: a counterparty the owner owes or is owed by
/// - `Fund`: an earmarked/reserved pool, set aside from free assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Party,
    Fund,
}

impl AccountType {
    /// Stable lowercase name, used for CSV output and filter matching
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Party => "party",
            AccountType::Fund => "fund",
        }
    }

    /// Parse a classifier from user input (case-insensitive)
    pub fn parse(value: &str) -> Option<AccountType> {
        match value.to_lowercase().as_str() {
            "asset" => Some(AccountType::Asset),
            "party" => Some(AccountType::Party),
            "fund" => Some(AccountType::Fund),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named account holding a running balance
///
/// The balance is a signed amount in integer minor units and must always
/// equal the fold of signed effects of every transaction that named this
/// account as primary or secondary. Only the ledger engine writes it, through
/// the store's conditional update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, assigned by the store at creation
    pub id: AccountId,

    /// Free-text label
    ///
    /// Two names carry semantic weight by case-insensitive match:
    /// "investment" (classification rule) and "bank"/"cash" (summary's
    /// cash balance).
    pub name: String,

    /// Classifier driving the secondary-effect rules and summary buckets
    pub account_type: AccountType,

    /// Running balance in integer minor units, 0 at creation
    pub balance: i64,

    /// Creation timestamp, set once; orders the owner's account list
    pub created_at: DateTime<Utc>,
}

/// Request to create an account
///
/// The store assigns the id and timestamp; the balance starts at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        NewAccount {
            name: name.into(),
            account_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asset", Some(AccountType::Asset))]
    #[case("Party", Some(AccountType::Party))]
    #[case("FUND", Some(AccountType::Fund))]
    #[case("vault", None)]
    #[case("", None)]
    fn test_account_type_parse(#[case] input: &str, #[case] expected: Option<AccountType>) {
        assert_eq!(AccountType::parse(input), expected);
    }

    #[test]
    fn test_account_type_round_trips_through_as_str() {
        for account_type in [AccountType::Asset, AccountType::Party, AccountType::Fund] {
            assert_eq!(
                AccountType::parse(account_type.as_str()),
                Some(account_type)
            );
        }
    }
}
