//! Internal numeric helpers.
//!
//! These utilities are **not** part of the public API. They centralize the
//! integer rounding rules so every split policy and money operation shares
//! the same deterministic arithmetic.

use crate::{LedgerError, ResultLedger};

/// Integer division rounding half away from zero.
///
/// The divisor must be nonzero (callers validate before reaching this).
pub(crate) fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder == 0 {
        return quotient;
    }
    let negative = (numerator < 0) != (denominator < 0);
    if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
        if negative { quotient - 1 } else { quotient + 1 }
    } else {
        quotient
    }
}

/// Narrow an i128 intermediate back into the i64 minor-unit range.
pub(crate) fn narrow_minor(value: i128) -> ResultLedger<i64> {
    i64::try_from(value).map_err(|_| LedgerError::AmountOverflow)
}
