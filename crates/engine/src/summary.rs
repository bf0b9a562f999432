//! The group debt summary: the read model the request layer consumes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    Currency, Debt, Expense, GroupId, MemberBalances, MemberId, Money, ResultLedger,
    balances::balances_for_group, settlement::simplify_debts,
};

/// Settlement state of one currency: raw balances plus suggested payments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettlement {
    /// Net balance per member (positive = the group owes the member).
    pub balances: MemberBalances,
    /// Suggested payer→payee transactions that re-zero the balances.
    pub suggested: Vec<Debt>,
}

/// Per-currency debt summary for one group snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub currencies: BTreeMap<Currency, CurrencySettlement>,
}

impl GroupSummary {
    /// A member's net balance in one currency, if that currency was observed.
    ///
    /// Handy for "you owe / you are owed" displays.
    #[must_use]
    pub fn balance_of(&self, member: MemberId, currency: Currency) -> Option<Money> {
        self.currencies
            .get(&currency)?
            .balances
            .get(&member)
            .copied()
    }
}

/// Computes the full debt summary for a group snapshot.
///
/// Aggregates balances over all expenses, then simplifies each currency's
/// balances into suggested transactions. Either a full consistent summary is
/// returned or one error tagged with the group id, never a mix, since a
/// partial ledger could mislead users about real debts.
pub fn summarize_group(
    group_id: GroupId,
    expenses: &[Expense],
    members: &BTreeSet<MemberId>,
) -> ResultLedger<GroupSummary> {
    let sheet = balances_for_group(group_id, expenses, members)
        .map_err(|err| err.in_group(group_id))?;

    let mut currencies = BTreeMap::new();
    for (currency, balances) in sheet.iter() {
        let suggested =
            simplify_debts(currency, balances).map_err(|err| err.in_group(group_id))?;
        currencies.insert(
            currency,
            CurrencySettlement {
                balances: balances.clone(),
                suggested,
            },
        );
    }

    Ok(GroupSummary {
        group_id,
        currencies,
    })
}
