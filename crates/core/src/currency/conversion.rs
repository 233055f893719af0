//! Foreign amount to THB conversion.
//!
//! The product of amount and rate is computed exactly and rounded once,
//! half-up, to [`THB_SCALE`] places.

use rust_decimal::Decimal;

use super::decimal::{DecimalError, MAX_SCALE, THB_SCALE, parse_exact, round_half_up};

/// Multiplies `amount` by `rate` and rounds half-up to 2 places.
///
/// Returns `None` if the exact product does not fit a [`Decimal`]: either it
/// overflows, or it needs more than [`MAX_SCALE`] fractional digits. Trailing
/// zeros of the inputs do not count against that limit.
#[must_use]
pub fn convert_to_thb(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    let (amount, rate) = (amount.normalize(), rate.normalize());
    let exact_scale = amount.scale() + rate.scale();
    if exact_scale > MAX_SCALE {
        return None;
    }

    let product = amount.checked_mul(rate)?;
    // A smaller scale means the multiply rounded to make the mantissa fit.
    if !product.is_zero() && product.scale() != exact_scale {
        return None;
    }
    round_half_up(product, THB_SCALE)
}

/// Computes the THB amount for a foreign amount and exchange rate, both given
/// as decimal strings.
///
/// Both inputs are re-parsed here rather than trusted. The result always has
/// exactly two fractional digits and carries the natural sign of the product.
///
/// Each input may carry at most 28 fractional digits, and their
/// exact product must fit a [`Decimal`] (28 fractional digits, 96-bit
/// mantissa). Anything beyond that is refused rather than rounded twice.
/// Stored amounts (4 places) and rates (6 places) are always well inside it.
///
/// # Errors
///
/// Returns [`DecimalError::InvalidDecimal`] naming the offending input, or the
/// amount when the exact product cannot be represented.
///
/// # Example
///
/// ```
/// use thbfx_core::currency::calculate_thb_amount;
///
/// assert_eq!(calculate_thb_amount("100.0000", "35.500000").unwrap(), "3550.00");
/// ```
pub fn calculate_thb_amount(foreign_amount: &str, exchange_rate: &str) -> Result<String, DecimalError> {
    let amount = parse_exact(foreign_amount)?;
    let rate = parse_exact(exchange_rate)?;

    convert_to_thb(amount, rate)
        .map(|thb| thb.to_string())
        .ok_or_else(|| DecimalError::InvalidDecimal(foreign_amount.to_string()))
}
