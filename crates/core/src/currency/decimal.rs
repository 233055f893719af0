//! Fixed-scale decimal parsing.
//!
//! Monetary inputs arrive as strings and stay in base 10 the whole way:
//! the text is validated, cut to one digit past the target scale, parsed into
//! a [`Decimal`] and rounded half-up. No binary float is ever involved.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Scale used for foreign amounts.
pub const AMOUNT_SCALE: u32 = 4;

/// Scale used for exchange rates.
pub const RATE_SCALE: u32 = 6;

/// Scale used for THB amounts.
pub const THB_SCALE: u32 = 2;

/// Largest scale a [`Decimal`] can carry.
pub const MAX_SCALE: u32 = 28;

/// Largest target scale [`parse_decimal`] accepts; one digit past it must
/// still fit for the rounding decision.
pub const MAX_TARGET_SCALE: u32 = MAX_SCALE - 1;

/// Errors from decimal parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// Input is not a base-10 number, or does not fit the decimal range.
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),
}

impl DecimalError {
    fn invalid(value: &str) -> Self {
        Self::InvalidDecimal(value.to_string())
    }
}

/// Splits a number into sign, integer digits and fraction digits.
///
/// Accepts `[+-]?digits[.digits]`, `[+-]?.digits` and `[+-]?digits.`; at least
/// one digit overall. Whitespace, exponents, separators and `NaN`/`Infinity`
/// are rejected.
fn split_number(value: &str) -> Option<(bool, &str, &str)> {
    let (negative, unsigned) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    Some((negative, int_part, frac_part))
}

/// Parses a decimal string exactly, without rounding.
///
/// Inputs with more fractional digits than [`MAX_SCALE`] are rejected rather
/// than silently rounded.
///
/// # Errors
///
/// Returns [`DecimalError::InvalidDecimal`] for malformed or out-of-range input.
pub fn parse_exact(value: &str) -> Result<Decimal, DecimalError> {
    let (negative, int_part, frac_part) =
        split_number(value).ok_or_else(|| DecimalError::invalid(value))?;

    if frac_part.len() > MAX_SCALE as usize {
        return Err(DecimalError::invalid(value));
    }

    to_decimal(negative, int_part, frac_part).ok_or_else(|| DecimalError::invalid(value))
}

fn to_decimal(negative: bool, int_part: &str, frac_part: &str) -> Option<Decimal> {
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let text = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let mut parsed = Decimal::from_str_exact(&text).ok()?;
    if negative {
        parsed.set_sign_negative(true);
    }
    Some(parsed)
}

/// Rounds half-up to `scale` places and pads to exactly `scale` digits.
///
/// Returns `None` when the padded value no longer fits.
#[must_use]
pub fn round_half_up(value: Decimal, scale: u32) -> Option<Decimal> {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    if rounded.scale() != scale {
        return None;
    }
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded)
}

/// Parses `value` and rounds it half-up to `scale` places.
///
/// Only the first digit past `scale` decides the rounding direction, so the
/// fraction is cut there before parsing. Arbitrarily long fractions are
/// therefore accepted and rounded exactly once.
///
/// # Errors
///
/// Returns [`DecimalError::InvalidDecimal`] if the value is malformed, if the
/// result does not fit a [`Decimal`], or if `scale` exceeds [`MAX_TARGET_SCALE`].
pub fn parse_decimal_value(value: &str, scale: u32) -> Result<Decimal, DecimalError> {
    if scale > MAX_TARGET_SCALE {
        return Err(DecimalError::invalid(value));
    }

    let (negative, int_part, frac_part) =
        split_number(value).ok_or_else(|| DecimalError::invalid(value))?;

    let keep = scale as usize + 1;
    let frac_part = &frac_part[..frac_part.len().min(keep)];

    let parsed =
        to_decimal(negative, int_part, frac_part).ok_or_else(|| DecimalError::invalid(value))?;

    round_half_up(parsed, scale).ok_or_else(|| DecimalError::invalid(value))
}

/// Parses `value` and returns its canonical string with exactly `scale`
/// fractional digits, rounding half-up.
///
/// # Errors
///
/// Returns [`DecimalError::InvalidDecimal`] when the input is not a number.
///
/// # Example
///
/// ```
/// use thbfx_core::currency::parse_decimal;
///
/// assert_eq!(parse_decimal("10", 4).unwrap(), "10.0000");
/// assert_eq!(parse_decimal("12.345", 2).unwrap(), "12.35");
/// assert!(parse_decimal("abc", 2).is_err());
/// ```
pub fn parse_decimal(value: &str, scale: u32) -> Result<String, DecimalError> {
    parse_decimal_value(value, scale).map(|d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("10", 4, "10.0000")]
    #[case("35.5", 6, "35.500000")]
    #[case("12.345", 2, "12.35")]
    #[case("12.344999", 2, "12.34")]
    #[case("-12.345", 2, "-12.35")]
    #[case("0.00005", 4, "0.0001")]
    #[case("0.00004999999999999999999999999999999", 4, "0.0000")]
    #[case("+7", 2, "7.00")]
    #[case(".5", 0, "1")]
    #[case("5.", 2, "5.00")]
    #[case("007.10", 2, "7.10")]
    #[case("-0.001", 2, "0.00")]
    #[case("-0", 4, "0.0000")]
    #[case("1.99999999999999999999999999999999999", 6, "2.000000")]
    fn test_parse_decimal(#[case] input: &str, #[case] scale: u32, #[case] expected: &str) {
        assert_eq!(parse_decimal(input, scale).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("1e5")]
    #[case(" 1")]
    #[case("1 ")]
    #[case("1,000")]
    #[case("1_000")]
    #[case("NaN")]
    #[case("Infinity")]
    #[case("--1")]
    #[case("0x10")]
    #[case("99999999999999999999999999999999")]
    fn test_parse_decimal_rejects(#[case] input: &str) {
        assert_eq!(
            parse_decimal(input, 2),
            Err(DecimalError::InvalidDecimal(input.to_string()))
        );
    }

    #[test]
    fn test_scale_out_of_range_is_rejected() {
        assert!(parse_decimal("1", MAX_SCALE).is_err());
    }

    #[test]
    fn test_value_too_wide_for_padding_is_rejected() {
        // fits with 0 places, but not once padded to 4
        assert!(parse_decimal("79228162514264337593543950335", 4).is_err());
    }

    #[test]
    fn test_half_up_not_bankers() {
        assert_eq!(parse_decimal_value("2.5", 0).unwrap(), dec!(3));
        assert_eq!(parse_decimal_value("3.5", 0).unwrap(), dec!(4));
        assert_eq!(parse_decimal_value("-2.5", 0).unwrap(), dec!(-3));
        assert_eq!(parse_decimal_value("2.25", 1).unwrap(), dec!(2.3));
    }

    #[test]
    fn test_parse_exact_keeps_digits() {
        assert_eq!(parse_exact("0.1").unwrap(), dec!(0.1));
        assert_eq!(
            parse_exact("0.1").unwrap() + parse_exact("0.2").unwrap(),
            dec!(0.3)
        );
        assert!(parse_exact("0.00000000000000000000000000001").is_err());
        assert!(parse_exact("1e3").is_err());
    }

    #[test]
    fn test_deterministic() {
        let first = parse_decimal("1234.56785", 4).unwrap();
        let second = parse_decimal("1234.56785", 4).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "1234.5679");
    }
}
