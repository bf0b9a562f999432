use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger};

/// Percentage with two fractional digits, stored as **integer basis points**.
///
/// A percentage split carries fractional precision (e.g. `33.33%`), so the
/// engine keeps it fixed point like money: `33.33%` is stored as `3333`
/// basis points. No float ever enters the split arithmetic.
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use engine::Percent;
///
/// assert_eq!("50".parse::<Percent>().unwrap().basis_points(), 5000);
/// assert_eq!("33,33".parse::<Percent>().unwrap().basis_points(), 3333);
/// assert!("12.345".parse::<Percent>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    /// 100%, the required sum of a percentage split.
    pub const ONE_HUNDRED: Percent = Percent(10_000);

    /// Creates a percentage from integer basis points (hundredths of a
    /// percent): `from_basis_points(3333)` is `33.33%`.
    #[must_use]
    pub const fn from_basis_points(basis_points: i64) -> Self {
        Self(basis_points)
    }

    /// Returns the raw value in basis points.
    #[must_use]
    pub const fn basis_points(self) -> i64 {
        self.0
    }

    /// Returns `true` if the percentage is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let frac = abs % 100;
        if frac == 0 {
            write!(f, "{sign}{units}%")
        } else {
            write!(f, "{sign}{units}.{frac:02}%")
        }
    }
}

impl FromStr for Percent {
    type Err = LedgerError;

    /// Parses a decimal percentage string into basis points.
    ///
    /// Accepts `.` or `,` as decimal separator. Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings and signs (percentages are 0–100)
    fn from_str(s: &str) -> ResultLedger<Self> {
        let invalid = || LedgerError::InvalidAmount(format!("invalid percentage: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(invalid()),
                }
            }
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .map(Percent)
            .ok_or_else(invalid)
    }
}
