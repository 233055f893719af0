//! Property-based tests for decimal parsing and THB conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::calculate_thb_amount;
use super::decimal::parse_decimal;

/// Foreign amounts at scale 4, signed.
fn amount() -> impl Strategy<Value = i64> {
    -10_000_000_000i64..10_000_000_000i64
}

/// Exchange rates at scale 6, non-negative.
fn rate() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

fn to_text(mantissa: i64, scale: u32) -> String {
    Decimal::new(mantissa, scale).to_string()
}

/// Half-up rounding of `a * 10^-sa * r * 10^-sr` to 2 places, in integers.
fn reference_scaled(amount: i64, amount_scale: u32, rate: i64, rate_scale: u32) -> String {
    let product = i128::from(amount) * i128::from(rate);
    let scale = amount_scale + rate_scale;
    let cents = if scale <= 2 {
        product * 10_i128.pow(2 - scale)
    } else {
        let divisor = 10_i128.pow(scale - 2);
        let quotient = product / divisor;
        let remainder = (product % divisor).abs();
        if remainder * 2 >= divisor {
            quotient + product.signum()
        } else {
            quotient
        }
    };

    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Half-up rounding of `a * 10^-4 * r * 10^-6` to 2 places.
fn reference_thb(amount: i64, rate: i64) -> String {
    reference_scaled(amount, 4, rate, 6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The result always has exactly two fractional digits.
    #[test]
    fn prop_thb_has_two_places(a in amount(), r in rate()) {
        let thb = calculate_thb_amount(&to_text(a, 4), &to_text(r, 6)).unwrap();
        let (_, frac) = thb.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 2);
        prop_assert!(!thb.contains('e') && !thb.contains('E'));
    }

    /// The result matches exact rational arithmetic rounded once, half-up.
    #[test]
    fn prop_thb_matches_exact_half_up(a in amount(), r in rate()) {
        let thb = calculate_thb_amount(&to_text(a, 4), &to_text(r, 6)).unwrap();
        prop_assert_eq!(thb, reference_thb(a, r));
    }

    /// Exactness holds for inputs finer than the stored scales too.
    #[test]
    fn prop_thb_exact_at_any_scale(
        a in -1_000_000_000_000i64..1_000_000_000_000i64,
        sa in 0u32..=16,
        r in 0i64..1_000_000_000_000i64,
        sr in 0u32..=12,
    ) {
        let thb = calculate_thb_amount(&to_text(a, sa), &to_text(r, sr)).unwrap();
        prop_assert_eq!(thb, reference_scaled(a, sa, r, sr));
    }

    /// Same inputs, same output.
    #[test]
    fn prop_thb_is_deterministic(a in amount(), r in rate()) {
        let amount = to_text(a, 4);
        let rate = to_text(r, 6);
        prop_assert_eq!(
            calculate_thb_amount(&amount, &rate).unwrap(),
            calculate_thb_amount(&amount, &rate).unwrap()
        );
    }

    /// Normalising before converting does not change the answer.
    #[test]
    fn prop_parse_then_convert_is_stable(a in amount(), r in rate()) {
        let amount = parse_decimal(&to_text(a, 4), 4).unwrap();
        let rate = parse_decimal(&to_text(r, 6), 6).unwrap();
        prop_assert_eq!(
            calculate_thb_amount(&amount, &rate).unwrap(),
            reference_thb(a, r)
        );
    }

    /// Parsing pads or rounds to exactly the requested scale.
    #[test]
    fn prop_parse_has_exact_scale(m in any::<i32>(), input_scale in 0u32..10, scale in 0u32..10) {
        let parsed = parse_decimal(&to_text(i64::from(m), input_scale), scale).unwrap();
        let digits = parsed.split_once('.').map_or(0, |(_, frac)| frac.len());
        prop_assert_eq!(digits, scale as usize);
    }

    /// Re-parsing a canonical value at the same scale is a no-op.
    #[test]
    fn prop_parse_is_idempotent(m in any::<i64>(), scale in 0u32..8) {
        let once = parse_decimal(&to_text(m, 6), scale).unwrap();
        let twice = parse_decimal(&once, scale).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Arbitrary non-numeric text never parses.
    #[test]
    fn prop_letters_are_rejected(s in "[a-zA-Z ]{1,12}") {
        prop_assert!(parse_decimal(&s, 2).is_err());
    }
}
