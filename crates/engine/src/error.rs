//! The module contains the errors the ledger engine can raise.
//!
//! All failures are surfaced to the caller untouched: the engine never
//! retries and never returns a partial result, since a partial ledger would
//! break the closed-balance invariant.
use thiserror::Error;

use crate::{Currency, ExpenseId, GroupId, MemberId, Money, Percent};

/// Ledger engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A money operation combined two different currencies.
    #[error("currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    /// A currency code at the boundary is not one the engine models.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    /// A money computation exceeded the i64 minor-unit range.
    #[error("amount overflow")]
    AmountOverflow,
    /// Scalar division of a money value by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A textual amount or percentage that cannot be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Exact splits do not add up to the expense total. `delta` is the
    /// provided sum minus the total.
    #[error("exact splits are off by {delta} against the expense total")]
    SplitSumMismatch { delta: Money },
    /// Percentage splits do not sum to 100 within tolerance.
    #[error("percentages sum to {sum}, expected 100%")]
    InvalidPercentageSum { sum: Percent },
    /// Weighted splits carry a non-positive weight.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    /// A split would assign a negative amount to a member.
    #[error("negative share for member {0}")]
    NegativeShare(MemberId),
    /// An expense with an empty participant list cannot be resolved.
    #[error("expense has no participants")]
    NoParticipants,
    /// An expense references a member outside the group member set.
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),
    /// A failure while processing one expense, tagged with its id.
    #[error("expense {expense_id}: {source}")]
    Expense {
        expense_id: ExpenseId,
        #[source]
        source: Box<LedgerError>,
    },
    /// A failure while summarizing one group, tagged with its id.
    #[error("group {group_id}: {source}")]
    Group {
        group_id: GroupId,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    /// Tag an error with the expense it occurred in.
    pub(crate) fn in_expense(self, expense_id: ExpenseId) -> Self {
        Self::Expense {
            expense_id,
            source: Box::new(self),
        }
    }

    /// Tag an error with the group it occurred in.
    pub(crate) fn in_group(self, group_id: GroupId) -> Self {
        Self::Group {
            group_id,
            source: Box::new(self),
        }
    }
}
