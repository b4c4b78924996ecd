//! Dashboard summary figures
//!
//! The aggregate totals derived from an owner's full account set. Produced
//! by [`crate::core::summary::summarize`]; every field defaults to 0 on an
//! empty account list.

use serde::{Deserialize, Serialize};

/// Aggregate dashboard figures, all in integer minor units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Net assets: assets + funds + receivables from parties
    pub total_everything: i64,

    /// Assets excluding reserved funds: assets + receivables from parties
    pub total_excluding_funds: i64,

    /// Balance of the single Asset account named "investment", or 0 if none
    pub investment_only: i64,

    /// Sum over Asset accounts named "bank" or "cash"
    pub cash_balance: i64,

    /// Receivables: sum of |balance| over parties with negative balance
    /// (a negative party balance means the counterparty owes the owner)
    pub total_to_take_from_parties: i64,

    /// Payables: sum of balance over parties with positive balance
    /// (a positive party balance means the owner owes the counterparty)
    pub total_to_pay_to_parties: i64,

    /// Reserved funds: sum over Fund accounts
    pub total_funds: i64,
}
