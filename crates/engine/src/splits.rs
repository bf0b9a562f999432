//! Split resolution: from an expense's policy to exact per-member amounts.
//!
//! Resolution is a pure function of the expense. Whatever the policy, the
//! resolved shares sum exactly to the expense total in the same currency:
//! rounding never loses or manufactures a minor unit.

use crate::{
    Expense, LedgerError, MemberId, Money, Percent, ResultLedger, SplitSpec, util,
};

/// Tolerance on the sum of percentage splits, in basis points.
const PERCENT_SUM_EPSILON_BPS: i64 = 1;

/// Resolves an expense's split policy into `(member, amount)` pairs.
///
/// The output preserves participant input order and sums exactly to
/// `expense.total` whenever resolution succeeds.
pub fn resolve_splits(expense: &Expense) -> ResultLedger<Vec<(MemberId, Money)>> {
    match &expense.split {
        SplitSpec::Equal { participants } => resolve_equal(expense.total, participants),
        SplitSpec::Exact { shares } => {
            if shares.is_empty() {
                return Err(LedgerError::NoParticipants);
            }
            let mut sum = Money::zero(expense.total.currency());
            for share in shares {
                if share.amount.currency() != expense.total.currency() {
                    return Err(LedgerError::CurrencyMismatch {
                        expected: expense.total.currency(),
                        found: share.amount.currency(),
                    });
                }
                if share.amount.is_negative() {
                    return Err(LedgerError::NegativeShare(share.member));
                }
                sum = sum.checked_add(share.amount)?;
            }
            let delta = sum.checked_sub(expense.total)?;
            if !delta.is_zero() {
                return Err(LedgerError::SplitSumMismatch { delta });
            }
            Ok(shares.iter().map(|s| (s.member, s.amount)).collect())
        }
        SplitSpec::Percentage { shares } => {
            if shares.is_empty() {
                return Err(LedgerError::NoParticipants);
            }
            let mut sum_bps: i64 = 0;
            for share in shares {
                if share.percent.is_negative() {
                    return Err(LedgerError::NegativeShare(share.member));
                }
                sum_bps = sum_bps
                    .checked_add(share.percent.basis_points())
                    .ok_or(LedgerError::AmountOverflow)?;
            }
            if (sum_bps - Percent::ONE_HUNDRED.basis_points()).abs() > PERCENT_SUM_EPSILON_BPS {
                return Err(LedgerError::InvalidPercentageSum {
                    sum: Percent::from_basis_points(sum_bps),
                });
            }
            let entries: Vec<(MemberId, i128)> = shares
                .iter()
                .map(|s| (s.member, i128::from(s.percent.basis_points())))
                .collect();
            // Normalize by the actual sum: within the tolerance this keeps
            // the leftover below one unit per participant, so the
            // largest-remainder pass always reconstructs the total.
            apportion(expense.total, &entries, i128::from(sum_bps))
        }
        SplitSpec::Shares { shares } => {
            if shares.is_empty() {
                return Err(LedgerError::NoParticipants);
            }
            let mut weight_sum: u128 = 0;
            for share in shares {
                if share.weight == 0 {
                    return Err(LedgerError::InvalidWeights(format!(
                        "member {} has zero weight",
                        share.member
                    )));
                }
                weight_sum += u128::from(share.weight);
            }
            // Weights are all positive here, so the sum cannot be zero.
            let denominator =
                i128::try_from(weight_sum).map_err(|_| LedgerError::AmountOverflow)?;
            let entries: Vec<(MemberId, i128)> = shares
                .iter()
                .map(|s| (s.member, i128::from(s.weight)))
                .collect();
            apportion(expense.total, &entries, denominator)
        }
    }
}

/// Even division: truncate toward zero, then hand the leftover minor units
/// one-by-one to the first participants in input order.
fn resolve_equal(total: Money, participants: &[MemberId]) -> ResultLedger<Vec<(MemberId, Money)>> {
    if participants.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    let n = i64::try_from(participants.len()).map_err(|_| LedgerError::AmountOverflow)?;
    let base = total.minor() / n;
    let remainder = total.minor() - base * n;
    let unit = remainder.signum();
    let extra = remainder.unsigned_abs() as usize;

    Ok(participants
        .iter()
        .enumerate()
        .map(|(i, &member)| {
            let minor = if i < extra { base + unit } else { base };
            (member, Money::new(minor, total.currency()))
        })
        .collect())
}

/// Largest-remainder apportionment over integer ratios.
///
/// Each entry first gets `round_half_away(total * numerator / denominator)`;
/// the leftover against the total (at most half a unit per entry) is then
/// handed out unit-by-unit in descending order of the entries' fractional
/// remainders, ties broken by input order.
fn apportion(
    total: Money,
    entries: &[(MemberId, i128)],
    denominator: i128,
) -> ResultLedger<Vec<(MemberId, Money)>> {
    let total_minor = i128::from(total.minor());

    let mut minors: Vec<i64> = Vec::with_capacity(entries.len());
    let mut fractions: Vec<(usize, u128)> = Vec::with_capacity(entries.len());
    let mut assigned: i128 = 0;
    for (index, (_, numerator)) in entries.iter().enumerate() {
        let exact = total_minor
            .checked_mul(*numerator)
            .ok_or(LedgerError::AmountOverflow)?;
        let rounded = util::div_round_half_away(exact, denominator);
        minors.push(util::narrow_minor(rounded)?);
        fractions.push((index, (exact % denominator).unsigned_abs()));
        assigned += rounded;
    }

    let mut leftover = total_minor - assigned;
    let unit: i64 = if leftover > 0 { 1 } else { -1 };
    fractions.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in &fractions {
        if leftover == 0 {
            break;
        }
        minors[*index] += unit;
        leftover -= i128::from(unit);
    }
    debug_assert_eq!(leftover, 0, "apportionment must reconstruct the total");

    Ok(entries
        .iter()
        .zip(minors)
        .map(|(&(member, _), minor)| (member, Money::new(minor, total.currency())))
        .collect())
}
