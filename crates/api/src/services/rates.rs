//! First step of rate entry: try the central bank, report `Unavailable` otherwise.
//!
//! There is no retry loop. On `Unavailable` the caller decides to enter the
//! rate by hand.

use chrono::NaiveDate;
use thbfx_core::currency::{RATE_SCALE, RateQuote, RateResult, RateSource, is_local_currency, parse_decimal};
use thbfx_shared::ExchangeRateProvider;
use tracing::warn;

/// Looks up the rate for `currency` on `date`.
///
/// The local currency is answered without contacting the provider. Provider
/// rates are normalised to the stored rate scale; a value that does not parse
/// counts as unavailable.
pub async fn attempt_fetch(
    provider: &dyn ExchangeRateProvider,
    currency: &str,
    date: NaiveDate,
) -> RateResult {
    if is_local_currency(currency) {
        return RateResult::Available(RateQuote::system(date));
    }

    let Some(rate) = provider.fetch_rate(currency, date).await else {
        return RateResult::Unavailable;
    };

    match parse_decimal(&rate.buying_transfer, RATE_SCALE) {
        Ok(buying_transfer) => RateResult::Available(RateQuote {
            currency_id: currency.to_string(),
            period: date,
            buying_transfer,
            source: RateSource::Bot,
        }),
        Err(e) => {
            warn!(currency, %date, error = %e, "Discarding unparseable BOT rate");
            RateResult::Unavailable
        }
    }
}
