//! Money in minor currency units.
//!
//! All arithmetic is integer arithmetic on cents; floating point only appears
//! at the JSON boundary, where a catalog price is rounded to the nearest cent
//! exactly once.

use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Minor units per major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Currency prefix of the shop's single fixed locale.
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Basis points in a whole (100%).
pub const BPS_SCALE: i64 = 10_000;

/// A signed amount of money, stored as a count of cents.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money {
    minor: i64,
}

impl ValueObject for Money {}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,
    #[error("not a decimal amount: {0:?}")]
    Invalid(String),
    #[error("at most two decimal places are allowed")]
    TooManyDecimals,
    #[error("amount out of range")]
    Overflow,
    #[error("amount is not a finite number")]
    NotFinite,
}

impl Money {
    pub const ZERO: Money = Money { minor: 0 };

    pub const fn from_minor(minor: i64) -> Self {
        Self { minor }
    }

    /// Whole major units (e.g. `from_major(1200)` is Rs. 1,200.00).
    pub const fn from_major(major: i64) -> Self {
        Self {
            minor: major.saturating_mul(MINOR_PER_MAJOR),
        }
    }

    /// Convert a floating-point major amount, rounding to the nearest cent.
    pub fn from_major_f64(major: f64) -> Result<Self, MoneyParseError> {
        if !major.is_finite() {
            return Err(MoneyParseError::NotFinite);
        }
        let minor = (major * MINOR_PER_MAJOR as f64).round();
        if minor.abs() >= i64::MAX as f64 {
            return Err(MoneyParseError::Overflow);
        }
        Ok(Self {
            minor: minor as i64,
        })
    }

    pub const fn minor(self) -> i64 {
        self.minor
    }

    pub const fn is_negative(self) -> bool {
        self.minor < 0
    }

    pub const fn is_zero(self) -> bool {
        self.minor == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.minor.checked_add(other.minor).map(Money::from_minor)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.minor.checked_sub(other.minor).map(Money::from_minor)
    }

    /// Multiply by a quantity (price × quantity).
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.minor
            .checked_mul(i64::from(quantity))
            .map(Money::from_minor)
    }

    /// Apply a rate expressed in basis points, rounding half away from zero to
    /// the nearest cent.
    pub fn checked_apply_bps(self, bps: u32) -> Option<Money> {
        let scaled = i128::from(self.minor).checked_mul(i128::from(bps))?;
        let scale = i128::from(BPS_SCALE);
        let mut quotient = scaled / scale;
        let remainder = scaled % scale;
        if remainder.abs() * 2 >= scale {
            quotient += scaled.signum();
        }
        i64::try_from(quotient).ok().map(Money::from_minor)
    }

    /// Amount in major units as a float (JSON boundary only).
    pub fn to_major_f64(self) -> f64 {
        self.minor as f64 / MINOR_PER_MAJOR as f64
    }

    /// Plain decimal form without currency prefix or grouping: `-1234.50`.
    pub fn to_plain_string(self) -> String {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        format!("{sign}{}.{:02}", abs / per, abs % per)
    }

    /// Sum of an iterator of amounts; `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl core::fmt::Display for Money {
    /// Shop locale: `Rs. 1,234.50`, negatives as `Rs. -465.00`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        write!(
            f,
            "{CURRENCY_PREFIX} {sign}{}.{:02}",
            group_thousands(abs / per),
            abs % per
        )
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    /// Strict decimal parse: optional `-`, digits, optional `.` and up to two
    /// fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals);
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyParseError::Overflow)?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyParseError::Invalid(s.to_string()))? * 10,
            _ => fraction.parse::<i64>().map_err(|_| MoneyParseError::Invalid(s.to_string()))?,
        };

        let minor = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(cents))
            .ok_or(MoneyParseError::Overflow)?;

        Ok(Money::from_minor(if negative { -minor } else { minor }))
    }
}

impl Serialize for Money {
    /// Major units as a JSON number (`1200`, `333.33`), matching the stored
    /// cart blob written by the browser front-end.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.minor % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.minor / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.to_major_f64())
        }
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money::from_minor)
            .ok_or_else(|| E::custom(MoneyParseError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyParseError::Overflow))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_major_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
