//! Decimal amounts, THB conversion and exchange-rate policy.
//!
//! All arithmetic is base-10 fixed point via [`rust_decimal::Decimal`].
//! Rounding is half-up (midpoint away from zero) throughout.

pub mod conversion;
pub mod decimal;
pub mod rate;

#[cfg(test)]
mod props;

pub use conversion::{calculate_thb_amount, convert_to_thb};
pub use decimal::{AMOUNT_SCALE, DecimalError, RATE_SCALE, THB_SCALE, parse_decimal, parse_decimal_value};
pub use rate::{
    BOT_CURRENCIES, LOCAL_CURRENCY, RatePolicyError, RateQuote, RateResult, RateSource, ResolvedRate,
    SYSTEM_RATE, apply_rate_policy, is_bot_currency, is_local_currency,
};
