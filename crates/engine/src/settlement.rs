//! Debt simplification: turn net balances into few settle-up transactions.
//!
//! The exact minimum-transaction matching is NP-hard for arbitrary debt
//! graphs, so the engine uses the standard greedy netting instead: always
//! match the largest debtor against the largest creditor. That is optimal
//! for two parties, near-optimal in practice, runs in `O(n log n)` and emits
//! at most `n - 1` transactions for `n` nonzero parties.

use std::{cmp::Ordering, collections::BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::{Currency, LedgerError, MemberBalances, MemberId, Money, ResultLedger};

/// A suggested settle-up payment from one member to another.
///
/// Derived, never stored, and never executed by the engine: `amount` is
/// always positive and `from != to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// One side of the matching: a member with a positive outstanding magnitude.
///
/// Heap order is by magnitude, ties resolved toward the smaller member id so
/// equal balances still settle in a reproducible order.
#[derive(Debug, PartialEq, Eq)]
struct Party {
    magnitude: i64,
    member: MemberId,
}

impl Ord for Party {
    fn cmp(&self, other: &Self) -> Ordering {
        self.magnitude
            .cmp(&other.magnitude)
            .then_with(|| other.member.cmp(&self.member))
    }
}

impl PartialOrd for Party {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Produces settle-up transactions that re-zero one currency's balances.
///
/// Balances of other currencies are simplified by separate calls and never
/// mixed; a balance carrying a different currency than `currency` fails with
/// `CurrencyMismatch`. Given the same balance snapshot the output list is
/// identical across runs.
pub fn simplify_debts(
    currency: Currency,
    balances: &MemberBalances,
) -> ResultLedger<Vec<Debt>> {
    let mut debtors: BinaryHeap<Party> = BinaryHeap::new();
    let mut creditors: BinaryHeap<Party> = BinaryHeap::new();

    for (&member, &balance) in balances {
        if balance.currency() != currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: currency,
                found: balance.currency(),
            });
        }
        match balance.minor() {
            0 => {}
            minor if minor < 0 => {
                let magnitude = minor.checked_neg().ok_or(LedgerError::AmountOverflow)?;
                debtors.push(Party { magnitude, member });
            }
            minor => creditors.push(Party {
                magnitude: minor,
                member,
            }),
        }
    }

    let mut transactions = Vec::new();
    while let (Some(mut debtor), Some(mut creditor)) = (debtors.pop(), creditors.pop()) {
        let amount = debtor.magnitude.min(creditor.magnitude);
        transactions.push(Debt {
            from: debtor.member,
            to: creditor.member,
            amount: Money::new(amount, currency),
        });
        debtor.magnitude -= amount;
        creditor.magnitude -= amount;
        if debtor.magnitude > 0 {
            debtors.push(debtor);
        }
        if creditor.magnitude > 0 {
            creditors.push(creditor);
        }
    }
    debug_assert!(
        debtors.is_empty() && creditors.is_empty(),
        "input balances must sum to zero per currency"
    );

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn member(n: u8) -> MemberId {
        MemberId(Uuid::from_bytes([n; 16]))
    }

    fn balances(entries: &[(MemberId, i64)]) -> MemberBalances {
        entries
            .iter()
            .map(|&(m, v)| (m, Money::new(v, Currency::Eur)))
            .collect()
    }

    #[test]
    fn two_party_debt_settles_in_one_transaction() {
        let a = member(1);
        let b = member(2);
        let result =
            simplify_debts(Currency::Eur, &balances(&[(a, 500), (b, -500)])).unwrap();
        assert_eq!(
            result,
            vec![Debt {
                from: b,
                to: a,
                amount: Money::new(500, Currency::Eur),
            }]
        );
    }

    #[test]
    fn largest_debtor_matches_largest_creditor_first() {
        let a = member(1);
        let b = member(2);
        let c = member(3);
        let result = simplify_debts(
            Currency::Eur,
            &balances(&[(a, 700), (b, -300), (c, -400)]),
        )
        .unwrap();
        assert_eq!(
            result,
            vec![
                Debt {
                    from: c,
                    to: a,
                    amount: Money::new(400, Currency::Eur),
                },
                Debt {
                    from: b,
                    to: a,
                    amount: Money::new(300, Currency::Eur),
                },
            ]
        );
    }

    #[test]
    fn equal_magnitudes_tie_break_on_member_id() {
        let a = member(1);
        let b = member(2);
        let c = member(3);
        let d = member(4);
        // b and a tie as creditors, c and d tie as debtors; the smaller ids
        // must be picked first on both sides.
        let result = simplify_debts(
            Currency::Eur,
            &balances(&[(a, 100), (b, 100), (c, -100), (d, -100)]),
        )
        .unwrap();
        assert_eq!(
            result,
            vec![
                Debt {
                    from: c,
                    to: a,
                    amount: Money::new(100, Currency::Eur),
                },
                Debt {
                    from: d,
                    to: b,
                    amount: Money::new(100, Currency::Eur),
                },
            ]
        );
    }

    #[test]
    fn zero_balances_produce_no_transactions() {
        let a = member(1);
        let b = member(2);
        let result = simplify_debts(Currency::Eur, &balances(&[(a, 0), (b, 0)])).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn emits_at_most_n_minus_one_transactions() {
        let entries: Vec<(MemberId, i64)> = (1..=6)
            .map(|n| (member(n), if n == 1 { 500 } else { -100 }))
            .collect();
        let result = simplify_debts(Currency::Eur, &balances(&entries)).unwrap();
        assert!(result.len() <= 5);
    }

    #[test]
    fn foreign_currency_balance_is_rejected() {
        let a = member(1);
        let mut map: MemberBalances = BTreeMap::new();
        map.insert(a, Money::new(100, Currency::Usd));
        let result = simplify_debts(Currency::Eur, &map);
        assert_eq!(
            result,
            Err(LedgerError::CurrencyMismatch {
                expected: Currency::Eur,
                found: Currency::Usd,
            })
        );
    }

    #[test]
    fn transactions_reproduce_the_original_balances() {
        let entries = &[
            (member(1), 1250),
            (member(2), -411),
            (member(3), -839),
            (member(4), 0),
        ];
        let result = simplify_debts(Currency::Eur, &balances(entries)).unwrap();

        let mut net: BTreeMap<MemberId, i64> =
            entries.iter().map(|&(m, _)| (m, 0)).collect();
        for debt in &result {
            assert!(debt.amount.is_positive());
            assert_ne!(debt.from, debt.to);
            // Paying raises the debtor's balance and lowers the creditor's.
            *net.get_mut(&debt.from).unwrap() += debt.amount.minor();
            *net.get_mut(&debt.to).unwrap() -= debt.amount.minor();
        }
        for &(m, balance) in entries {
            assert_eq!(net[&m], -balance, "paying debts must re-zero {m}");
        }
    }
}
