use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use engine::{
    Currency, ExactShare, Expense, GroupId, MemberId, Money, Percent, PercentShare, SplitSpec,
    WeightShare, balances_for_group, resolve_splits, simplify_debts, summarize_group,
};

fn member(n: usize) -> MemberId {
    MemberId(Uuid::from_u128(n as u128 + 1))
}

fn group() -> GroupId {
    GroupId(Uuid::from_u128(0xF00D))
}

fn make_expense(total: i64, split: SplitSpec) -> Expense {
    Expense::new(
        group(),
        member(0),
        Money::new(total, Currency::Eur),
        Utc::now(),
        None,
        split,
    )
}

/// n percentages in basis points that sum exactly to 10000.
fn percent_partition() -> impl Strategy<Value = Vec<i64>> {
    (1usize..=6).prop_flat_map(|n| {
        proptest::collection::vec(0i64..=10_000, n - 1).prop_map(move |mut cuts| {
            cuts.sort_unstable();
            let mut parts = Vec::with_capacity(n);
            let mut prev = 0;
            for cut in cuts {
                parts.push(cut - prev);
                prev = cut;
            }
            parts.push(10_000 - prev);
            parts
        })
    })
}

/// A group snapshot: equal-split expenses over rotating member subsets.
fn snapshot() -> impl Strategy<Value = (Vec<Expense>, BTreeSet<MemberId>)> {
    (2usize..=6).prop_flat_map(|n| {
        let ids: Vec<MemberId> = (0..n).map(member).collect();
        let members: BTreeSet<MemberId> = ids.iter().copied().collect();
        let one = (0..n, 1i64..=1_000_000, 0..n, 1..=n).prop_map(
            move |(payer, total, rotation, len)| {
                let participants: Vec<MemberId> =
                    (0..len).map(|i| ids[(rotation + i) % n]).collect();
                Expense::new(
                    group(),
                    ids[payer],
                    Money::new(total, Currency::Eur),
                    Utc::now(),
                    None,
                    SplitSpec::Equal { participants },
                )
            },
        );
        (proptest::collection::vec(one, 1..=8), Just(members))
    })
}

/// Zero-sum balances: n random values plus one balancing entry.
fn zero_sum_balances() -> impl Strategy<Value = BTreeMap<MemberId, Money>> {
    proptest::collection::vec(-1_000_000i64..=1_000_000, 1..=10).prop_map(|mut minors| {
        let balancing: i64 = -minors.iter().sum::<i64>();
        minors.push(balancing);
        minors
            .into_iter()
            .enumerate()
            .map(|(i, minor)| (member(i), Money::new(minor, Currency::Eur)))
            .collect()
    })
}

proptest! {
    #[test]
    fn equal_splits_always_reconstruct_the_total(
        total in -1_000_000_000i64..=1_000_000_000,
        n in 1usize..=12,
    ) {
        let participants: Vec<MemberId> = (0..n).map(member).collect();
        let resolved = resolve_splits(&make_expense(
            total,
            SplitSpec::Equal { participants },
        )).unwrap();
        let sum: i64 = resolved.iter().map(|(_, m)| m.minor()).sum();
        prop_assert_eq!(sum, total);
        // Even split: no two shares differ by more than one minor unit.
        let min = resolved.iter().map(|(_, m)| m.minor()).min().unwrap();
        let max = resolved.iter().map(|(_, m)| m.minor()).max().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn percentage_splits_always_reconstruct_the_total(
        total in 0i64..=1_000_000_000,
        parts in percent_partition(),
    ) {
        let shares: Vec<PercentShare> = parts
            .iter()
            .enumerate()
            .map(|(i, &bps)| PercentShare {
                member: member(i),
                percent: Percent::from_basis_points(bps),
            })
            .collect();
        let resolved = resolve_splits(&make_expense(
            total,
            SplitSpec::Percentage { shares },
        )).unwrap();
        let sum: i64 = resolved.iter().map(|(_, m)| m.minor()).sum();
        prop_assert_eq!(sum, total);
    }

    #[test]
    fn weighted_splits_always_reconstruct_the_total(
        total in 0i64..=1_000_000_000,
        weights in proptest::collection::vec(1u64..=1_000, 1..=8),
    ) {
        let shares: Vec<WeightShare> = weights
            .iter()
            .enumerate()
            .map(|(i, &weight)| WeightShare {
                member: member(i),
                weight,
            })
            .collect();
        let resolved = resolve_splits(&make_expense(
            total,
            SplitSpec::Shares { shares },
        )).unwrap();
        let sum: i64 = resolved.iter().map(|(_, m)| m.minor()).sum();
        prop_assert_eq!(sum, total);
    }

    #[test]
    fn exact_splits_pass_through_when_they_sum(
        minors in proptest::collection::vec(0i64..=1_000_000, 1..=8),
    ) {
        let total: i64 = minors.iter().sum();
        let shares: Vec<ExactShare> = minors
            .iter()
            .enumerate()
            .map(|(i, &minor)| ExactShare {
                member: member(i),
                amount: Money::new(minor, Currency::Eur),
            })
            .collect();
        let resolved = resolve_splits(&make_expense(
            total,
            SplitSpec::Exact { shares },
        )).unwrap();
        let got: Vec<i64> = resolved.iter().map(|(_, m)| m.minor()).collect();
        prop_assert_eq!(got, minors);
    }

    #[test]
    fn balances_always_sum_to_zero((expenses, members) in snapshot()) {
        let sheet = balances_for_group(group(), &expenses, &members).unwrap();
        for (_, balances) in sheet.iter() {
            let sum: i64 = balances.values().map(|m| m.minor()).sum();
            prop_assert_eq!(sum, 0);
        }
    }

    #[test]
    fn settlement_re_zeroes_every_balance(balances in zero_sum_balances()) {
        let debts = simplify_debts(Currency::Eur, &balances).unwrap();

        let mut remaining: BTreeMap<MemberId, i64> = balances
            .iter()
            .map(|(&m, &b)| (m, b.minor()))
            .collect();
        for debt in &debts {
            prop_assert!(debt.amount.is_positive());
            prop_assert_ne!(debt.from, debt.to);
            *remaining.get_mut(&debt.from).unwrap() += debt.amount.minor();
            *remaining.get_mut(&debt.to).unwrap() -= debt.amount.minor();
        }
        for (_, minor) in remaining {
            prop_assert_eq!(minor, 0);
        }

        let nonzero = balances.values().filter(|m| !m.is_zero()).count();
        if nonzero == 0 {
            prop_assert!(debts.is_empty());
        } else {
            prop_assert!(debts.len() <= nonzero - 1);
        }
    }

    #[test]
    fn summary_is_deterministic((expenses, members) in snapshot()) {
        let first = summarize_group(group(), &expenses, &members).unwrap();
        let second = summarize_group(group(), &expenses, &members).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
