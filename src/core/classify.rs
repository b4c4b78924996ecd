//! Transaction classification rules
//!
//! This module decides whether a transaction on a primary account requires a
//! second ("extra") account to move in tandem, and in which direction.
//!
//! # Rule Table
//!
//! | Primary classifier           | Primary direction | Secondary direction |
//! |------------------------------|-------------------|---------------------|
//! | name == "investment"         | credit            | debit               |
//! | name == "investment"         | debit             | credit              |
//! | type == Party                | debit             | debit               |
//! | type == Party                | credit            | credit              |
//! | type == Fund                 | credit            | debit               |
//! | type == Fund                 | debit             | none                |
//! | type == Asset (other names)  | either            | none                |
//!
//! Crediting an investment account means capital left a funding account, so
//! that account is debited; debiting investment means capital returned. A
//! party's movement is mirrored in the same direction on the settlement
//! account the caller chooses. Crediting a fund (money set aside) draws from
//! the chosen source account; releasing a fund has no required counterpart
//! here, the caller records the destination as an ordinary transaction.
//!
//! The name rule matches on the lowercased account name and is checked before
//! the type rules; the two are otherwise independent, so an account literally
//! named "investment" need not have type Fund.

use crate::types::{AccountType, Direction};

/// UI label for a secondary effect that debits the extra account
pub const DEBIT_FROM_ACCOUNT: &str = "Debit from account";

/// UI label for a secondary effect that credits the extra account
pub const CREDIT_TO_ACCOUNT: &str = "Credit to account";

/// A required movement on a secondary account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryEffect {
    /// Direction applied to the secondary account
    pub direction: Direction,

    /// Label shown when asking the caller which account to move
    pub label: &'static str,
}

impl SecondaryEffect {
    fn debit_from() -> Self {
        SecondaryEffect {
            direction: Direction::Debit,
            label: DEBIT_FROM_ACCOUNT,
        }
    }

    fn credit_to() -> Self {
        SecondaryEffect {
            direction: Direction::Credit,
            label: CREDIT_TO_ACCOUNT,
        }
    }
}

/// Classify a transaction on the primary account
///
/// Returns the required secondary effect, or `None` when the transaction
/// stands alone. Matching uses the primary account's name (lowercased) for
/// the "investment" rule and its type for the party/fund rules.
///
/// # Arguments
///
/// * `account_name` - The primary account's name (snapshot at transaction time)
/// * `account_type` - The primary account's type (snapshot at transaction time)
/// * `direction` - The transaction direction on the primary account
pub fn classify(
    account_name: &str,
    account_type: AccountType,
    direction: Direction,
) -> Option<SecondaryEffect> {
    if account_name.to_lowercase() == "investment" {
        return Some(match direction {
            Direction::Credit => SecondaryEffect::debit_from(),
            Direction::Debit => SecondaryEffect::credit_to(),
        });
    }

    match (account_type, direction) {
        (AccountType::Party, Direction::Debit) => Some(SecondaryEffect::debit_from()),
        (AccountType::Party, Direction::Credit) => Some(SecondaryEffect::credit_to()),
        (AccountType::Fund, Direction::Credit) => Some(SecondaryEffect::debit_from()),
        (AccountType::Fund, Direction::Debit) => None,
        (AccountType::Asset, _) => None,
    }
}
