//! Validation of the tendered amount typed at the till.

use thiserror::Error;

use pizzeria_core::money::{CURRENCY_PREFIX, MoneyParseError};
use pizzeria_core::Money;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenderError {
    #[error("enter the amount paid")]
    Empty,
    #[error("not an amount: {0:?}")]
    Malformed(String),
    #[error("amount paid cannot be negative")]
    Negative,
    #[error("amount paid has more than two decimal places")]
    TooPrecise,
    #[error("amount paid is too large")]
    TooLarge,
}

/// Parse free-form till input into a non-negative amount.
///
/// Accepts an optional `Rs.`/`Rs` prefix and `,` thousands separators:
/// `"3465"`, `"Rs. 3,465.00"`, `"  1200.5 "`. Separators must group the
/// whole part in threes (`1,234,567`); `1,2,3` or `12,34.5` are malformed.
pub fn parse_tendered(input: &str) -> Result<Money, TenderError> {
    let trimmed = input.trim();
    let unprefixed = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .or_else(|| trimmed.strip_prefix("Rs"))
        .or_else(|| trimmed.strip_prefix("rs."))
        .unwrap_or(trimmed)
        .trim();

    if unprefixed.is_empty() {
        return Err(TenderError::Empty);
    }

    let normalized = ungroup(unprefixed).ok_or_else(|| TenderError::Malformed(trimmed.to_string()))?;
    let amount = normalized.parse::<Money>().map_err(|err| match err {
        MoneyParseError::Empty | MoneyParseError::Invalid(_) | MoneyParseError::NotFinite => {
            TenderError::Malformed(input.trim().to_string())
        }
        MoneyParseError::TooManyDecimals => TenderError::TooPrecise,
        MoneyParseError::Overflow => TenderError::TooLarge,
    })?;

    if amount.is_negative() {
        return Err(TenderError::Negative);
    }
    Ok(amount)
}

/// Remove thousands separators, or `None` when they are misplaced.
fn ungroup(amount: &str) -> Option<String> {
    if !amount.contains(',') {
        return Some(amount.to_string());
    }

    let (sign, unsigned) = match amount.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", amount),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let all_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
    let mut groups = whole.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !all_digits(head) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && all_digits(g)) {
        return None;
    }

    let mut out = String::with_capacity(amount.len());
    out.push_str(sign);
    out.extend(whole.chars().filter(|c| *c != ','));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_formatted_amounts() {
        assert_eq!(parse_tendered("3465"), Ok(Money::from_major(3465)));
        assert_eq!(parse_tendered(" Rs. 3,465.00 "), Ok(Money::from_major(3465)));
        assert_eq!(parse_tendered("Rs 1200.5"), Ok(Money::from_minor(120_050)));
        assert_eq!(parse_tendered("0"), Ok(Money::ZERO));
    }

    #[test]
    fn rejects_bad_input_with_specific_errors() {
        assert_eq!(parse_tendered("   "), Err(TenderError::Empty));
        assert_eq!(parse_tendered("Rs."), Err(TenderError::Empty));
        assert_eq!(parse_tendered("-50"), Err(TenderError::Negative));
        assert_eq!(parse_tendered("10.005"), Err(TenderError::TooPrecise));
        assert_eq!(
            parse_tendered("ten"),
            Err(TenderError::Malformed("ten".to_string()))
        );
        assert_eq!(
            parse_tendered("999999999999999999999"),
            Err(TenderError::TooLarge)
        );
    }

    #[test]
    fn thousands_separators_must_group_by_three() {
        assert_eq!(parse_tendered("1,234,567.50"), Ok(Money::from_minor(123_456_750)));
        assert_eq!(parse_tendered("Rs. 12,000"), Ok(Money::from_major(12_000)));
        assert_eq!(parse_tendered("-1,000"), Err(TenderError::Negative));

        for bad in ["1,2,3", "12,34.5", ",,,5", "1234,567", "1,000.5,0", "1,,000", "1,000,"] {
            assert_eq!(
                parse_tendered(bad),
                Err(TenderError::Malformed(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }
}
