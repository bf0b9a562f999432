//! Balance aggregation: fold a group's expenses into net member balances.
//!
//! A balance is derived, never stored: positive means the group owes the
//! member, negative means the member owes the group. For every currency the
//! balances of all members sum to zero (closed ledger), because each expense
//! credits the payer with exactly what the resolved splits debit.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    Currency, Expense, GroupId, LedgerError, MemberId, Money, ResultLedger, splits,
};

/// Net balance per member within one currency.
pub type MemberBalances = BTreeMap<MemberId, Money>;

/// Per-currency member balances for one group snapshot.
///
/// Currencies never mix: each observed currency gets its own closed
/// sub-ledger, and every known member appears in it (zero-balance members
/// included, so "you're settled" is representable downstream).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    by_currency: BTreeMap<Currency, MemberBalances>,
}

impl BalanceSheet {
    /// Currencies observed in the snapshot, in stable order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.by_currency.keys().copied()
    }

    /// Balances for one currency, if any expense used it.
    #[must_use]
    pub fn for_currency(&self, currency: Currency) -> Option<&MemberBalances> {
        self.by_currency.get(&currency)
    }

    /// Iterates `(currency, balances)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &MemberBalances)> {
        self.by_currency.iter().map(|(c, b)| (*c, b))
    }

    /// Returns `true` if no expense has been folded in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_currency.is_empty()
    }

    fn adjust(&mut self, member: MemberId, delta: Money) -> ResultLedger<()> {
        let balances = self.by_currency.entry(delta.currency()).or_default();
        let entry = balances
            .entry(member)
            .or_insert_with(|| Money::zero(delta.currency()));
        *entry = entry.checked_add(delta)?;
        Ok(())
    }
}

/// Folds all expenses of a group into one net balance per member and
/// currency.
///
/// The fold runs in a single pass and is order-independent (addition is
/// commutative), so recomputation from the same snapshot is deterministic.
/// The caller provides the expenses already filtered to the group and the
/// set of member ids valid for it; an expense referencing anyone else fails
/// with `UnknownMember`, tagged with the expense id, and aborts the whole
/// computation.
pub fn balances_for_group(
    group_id: GroupId,
    expenses: &[Expense],
    members: &BTreeSet<MemberId>,
) -> ResultLedger<BalanceSheet> {
    let mut sheet = BalanceSheet::default();

    for expense in expenses {
        debug_assert_eq!(
            expense.group_id, group_id,
            "caller must pre-filter expenses to the group"
        );
        fold_expense(&mut sheet, expense, members)
            .map_err(|err| err.in_expense(expense.id))?;
    }

    // Known members that never took part in a currency still belong in its
    // sub-ledger, at zero.
    for (&currency, balances) in sheet.by_currency.iter_mut() {
        for &member in members {
            balances
                .entry(member)
                .or_insert_with(|| Money::zero(currency));
        }
    }

    Ok(sheet)
}

fn fold_expense(
    sheet: &mut BalanceSheet,
    expense: &Expense,
    members: &BTreeSet<MemberId>,
) -> ResultLedger<()> {
    if !members.contains(&expense.payer) {
        return Err(LedgerError::UnknownMember(expense.payer));
    }
    for member in expense.split.members() {
        if !members.contains(&member) {
            return Err(LedgerError::UnknownMember(member));
        }
    }

    let resolved = splits::resolve_splits(expense)?;

    // The payer advanced the whole total; every participant owes their
    // resolved share. A payer who also participates gets both entries.
    sheet.adjust(expense.payer, expense.total)?;
    for (member, share) in resolved {
        sheet.adjust(member, share.checked_neg()?)?;
    }
    Ok(())
}
