//! Expense snapshot records.
//!
//! An `Expense` is an immutable event: one member advanced money for the
//! group and a split policy says how the total divides among participants.
//! Edits are modeled as delete+recreate at the data layer, so the engine only
//! ever reads a consistent snapshot.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MemberId, Money, Percent};

/// Stable identifier of a group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(pub Uuid);

impl GroupId {
    /// Generates a fresh random group id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable identifier of an expense.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExpenseId(pub Uuid);

impl ExpenseId {
    /// Generates a fresh random expense id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One member's explicit money share in an exact split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactShare {
    pub member: MemberId,
    pub amount: Money,
}

/// One member's percentage in a percentage split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentShare {
    pub member: MemberId,
    pub percent: Percent,
}

/// One member's positive integer weight in a weighted split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightShare {
    pub member: MemberId,
    pub weight: u64,
}

/// How an expense total divides among participants.
///
/// The order of the lists is significant: rounding remainders are handed out
/// in input order, so the same snapshot always resolves to the same shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SplitSpec {
    /// Even division; the total splits into equal shares, leftover minor
    /// units go one-by-one to the first participants.
    Equal { participants: Vec<MemberId> },
    /// Explicit per-member amounts; must sum exactly to the expense total.
    Exact { shares: Vec<ExactShare> },
    /// Per-member percentages; must sum to 100% within one basis point.
    Percentage { shares: Vec<PercentShare> },
    /// Per-member positive integer weights.
    Shares { shares: Vec<WeightShare> },
}

impl SplitSpec {
    /// Canonical policy name, as stored/transported at the boundary.
    #[must_use]
    pub const fn policy(&self) -> &'static str {
        match self {
            Self::Equal { .. } => "equal",
            Self::Exact { .. } => "exact",
            Self::Percentage { .. } => "percentage",
            Self::Shares { .. } => "shares",
        }
    }

    /// Participant ids in input order.
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        let ids: Vec<MemberId> = match self {
            Self::Equal { participants } => participants.clone(),
            Self::Exact { shares } => shares.iter().map(|s| s.member).collect(),
            Self::Percentage { shares } => shares.iter().map(|s| s.member).collect(),
            Self::Shares { shares } => shares.iter().map(|s| s.member).collect(),
        };
        ids.into_iter()
    }

    /// Number of participants in the split.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        match self {
            Self::Equal { participants } => participants.len(),
            Self::Exact { shares } => shares.len(),
            Self::Percentage { shares } => shares.len(),
            Self::Shares { shares } => shares.len(),
        }
    }
}

/// An expense recorded against a group.
///
/// The engine reads these as already-loaded records; it performs no storage
/// I/O of its own. The payer advanced `total` and need not be a participant
/// of the split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub payer: MemberId,
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub split: SplitSpec,
}

impl Expense {
    /// Builds a new expense record with a fresh id.
    pub fn new(
        group_id: GroupId,
        payer: MemberId,
        total: Money,
        occurred_at: DateTime<Utc>,
        note: Option<String>,
        split: SplitSpec,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            group_id,
            payer,
            total,
            occurred_at,
            note,
            split,
        }
    }
}
