use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::{Currency, LedgerError, ResultLedger, util};

/// Money amount represented as **integer minor units** tagged with a currency.
///
/// Use this type for **all** monetary values in the engine (expense totals,
/// resolved shares, balances, settlement amounts) to avoid floating-point
/// drift. There is no conversion to or from floating point anywhere.
///
/// The value is signed:
/// - positive = amount owed *to* a member / money advanced
/// - negative = amount owed *by* a member
///
/// Every binary operation checks that both operands carry the same currency
/// and fails with [`LedgerError::CurrencyMismatch`] otherwise; amounts of
/// different currencies are never coerced or netted against each other.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34, Currency::Eur);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34 EUR");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// The zero amount of a currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    /// Returns the currency of the amount.
    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.minor == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.minor > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.minor < 0
    }

    fn ensure_currency(self, other: Money) -> ResultLedger<()> {
        if self.currency != other.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(())
    }

    /// Currency-checked addition; fails on mismatch or i64 overflow.
    pub fn checked_add(self, rhs: Money) -> ResultLedger<Money> {
        self.ensure_currency(rhs)?;
        let minor = self
            .minor
            .checked_add(rhs.minor)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Currency-checked subtraction; fails on mismatch or i64 overflow.
    pub fn checked_sub(self, rhs: Money) -> ResultLedger<Money> {
        self.ensure_currency(rhs)?;
        let minor = self
            .minor
            .checked_sub(rhs.minor)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Negation; fails on i64 overflow (`-i64::MIN`).
    pub fn checked_neg(self) -> ResultLedger<Money> {
        let minor = self
            .minor
            .checked_neg()
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Multiplication by an integer scalar; fails on i64 overflow.
    pub fn checked_mul(self, scalar: i64) -> ResultLedger<Money> {
        let minor = self
            .minor
            .checked_mul(scalar)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Division by an integer scalar, rounded to the nearest minor unit with
    /// halves away from zero, so results are reproducible across platforms.
    pub fn div_round(self, divisor: i64) -> ResultLedger<Money> {
        if divisor == 0 {
            return Err(LedgerError::DivisionByZero);
        }
        let minor = util::div_round_half_away(i128::from(self.minor), i128::from(divisor));
        Ok(Money::new(util::narrow_minor(minor)?, self.currency))
    }

    /// Currency-checked comparison.
    ///
    /// `Money` deliberately does not implement `PartialOrd`: ordering two
    /// amounts of different currencies is a programming error, not a silent
    /// `false`.
    pub fn checked_cmp(self, other: Money) -> ResultLedger<Ordering> {
        self.ensure_currency(other)?;
        Ok(self.minor.cmp(&other.minor))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let digits = u32::from(self.currency.minor_units());
        if digits == 0 {
            return write!(f, "{sign}{abs} {}", self.currency.code());
        }
        let scale = 10u64.pow(digits);
        let major = abs / scale;
        let frac = abs % scale;
        write!(
            f,
            "{sign}{major}.{frac:0width$} {}",
            self.currency.code(),
            width = digits as usize
        )
    }
}
