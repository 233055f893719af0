//! Exchange-rate provenance and the rate resolution policy.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decimal::{DecimalError, RATE_SCALE, parse_decimal};

/// The local currency. Never fetched, always at par.
pub const LOCAL_CURRENCY: &str = "THB";

/// Rate stored for [`LOCAL_CURRENCY`] records.
pub const SYSTEM_RATE: &str = "1.000000";

/// Currencies the central bank publishes daily buying-transfer rates for.
pub const BOT_CURRENCIES: [&str; 5] = ["CNY", "USD", "EUR", "JPY", "GBP"];

/// Where a stored exchange rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateSource {
    /// Fetched from the central bank.
    #[default]
    Bot,
    /// Entered by the user.
    Manual,
    /// Fixed by the system (local currency).
    System,
}

impl RateSource {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bot => "BOT",
            Self::Manual => "MANUAL",
            Self::System => "SYSTEM",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown rate source string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rate source: {0}")]
pub struct ParseRateSourceError(String);

impl FromStr for RateSource {
    type Err = ParseRateSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOT" => Ok(Self::Bot),
            "MANUAL" => Ok(Self::Manual),
            "SYSTEM" => Ok(Self::System),
            other => Err(ParseRateSourceError(other.to_string())),
        }
    }
}

/// Returns true for the local currency code.
#[must_use]
pub fn is_local_currency(code: &str) -> bool {
    code.eq_ignore_ascii_case(LOCAL_CURRENCY)
}

/// Returns true if the central bank publishes a rate for `code`.
#[must_use]
pub fn is_bot_currency(code: &str) -> bool {
    BOT_CURRENCIES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

/// A rate for one currency on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateQuote {
    /// Currency code.
    pub currency_id: String,
    /// Day the rate applies to.
    pub period: NaiveDate,
    /// Buying transfer rate as a decimal string.
    pub buying_transfer: String,
    /// Provenance of the rate.
    pub source: RateSource,
}

impl RateQuote {
    /// The fixed quote for the local currency.
    #[must_use]
    pub fn system(period: NaiveDate) -> Self {
        Self {
            currency_id: LOCAL_CURRENCY.to_string(),
            period,
            buying_transfer: SYSTEM_RATE.to_string(),
            source: RateSource::System,
        }
    }
}

/// Outcome of a rate lookup.
///
/// `Unavailable` is a normal answer: the caller falls back to manual entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateResult {
    /// A rate was found.
    Available(RateQuote),
    /// No rate could be obtained.
    Unavailable,
}

impl RateResult {
    /// Returns the quote, if any.
    #[must_use]
    pub fn quote(self) -> Option<RateQuote> {
        match self {
            Self::Available(quote) => Some(quote),
            Self::Unavailable => None,
        }
    }

    /// Returns true when a rate was found.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl From<Option<RateQuote>> for RateResult {
    fn from(quote: Option<RateQuote>) -> Self {
        quote.map_or(Self::Unavailable, Self::Available)
    }
}

/// Rate and provenance to persist with a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRate {
    /// Exchange rate at [`RATE_SCALE`].
    pub exchange_rate: String,
    /// Provenance.
    pub source: RateSource,
}

/// Rejections from [`apply_rate_policy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatePolicyError {
    /// The submitted rate is not a number.
    #[error(transparent)]
    InvalidRate(#[from] DecimalError),
    /// `SYSTEM` was claimed for a foreign currency.
    #[error("SYSTEM rate source is only valid for {LOCAL_CURRENCY}")]
    SystemSourceForForeign,
}

/// Decides the rate and source stored with a record.
///
/// The local currency always gets [`SYSTEM_RATE`] with [`RateSource::System`],
/// whatever was submitted. Other currencies keep the submitted rate, normalised
/// to [`RATE_SCALE`], and the submitted source, which must not be `SYSTEM`.
///
/// # Errors
///
/// See [`RatePolicyError`].
pub fn apply_rate_policy(
    currency_code: &str,
    exchange_rate: &str,
    source: RateSource,
) -> Result<ResolvedRate, RatePolicyError> {
    if is_local_currency(currency_code) {
        return Ok(ResolvedRate {
            exchange_rate: SYSTEM_RATE.to_string(),
            source: RateSource::System,
        });
    }

    if source == RateSource::System {
        return Err(RatePolicyError::SystemSourceForForeign);
    }

    Ok(ResolvedRate {
        exchange_rate: parse_decimal(exchange_rate, RATE_SCALE)?,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[rstest]
    #[case("BOT", RateSource::Bot)]
    #[case("MANUAL", RateSource::Manual)]
    #[case("SYSTEM", RateSource::System)]
    fn test_rate_source_round_trip(#[case] text: &str, #[case] source: RateSource) {
        assert_eq!(text.parse::<RateSource>().unwrap(), source);
        assert_eq!(source.to_string(), text);
        assert_eq!(serde_json::to_value(source).unwrap(), serde_json::json!(text));
    }

    #[test]
    fn test_rate_source_rejects_unknown() {
        assert!("bot".parse::<RateSource>().is_err());
        assert!("".parse::<RateSource>().is_err());
        assert_eq!(RateSource::default(), RateSource::Bot);
    }

    #[rstest]
    #[case(RateSource::Bot, "99.1")]
    #[case(RateSource::Manual, "not a number")]
    #[case(RateSource::System, "")]
    fn test_thb_always_system(#[case] source: RateSource, #[case] rate: &str) {
        let resolved = apply_rate_policy("THB", rate, source).unwrap();
        assert_eq!(resolved.exchange_rate, "1.000000");
        assert_eq!(resolved.source, RateSource::System);
    }

    #[test]
    fn test_foreign_keeps_submitted_source() {
        let bot = apply_rate_policy("USD", "34.2162", RateSource::Bot).unwrap();
        assert_eq!(bot.exchange_rate, "34.216200");
        assert_eq!(bot.source, RateSource::Bot);

        let manual = apply_rate_policy("KRW", "0.0234567", RateSource::Manual).unwrap();
        assert_eq!(manual.exchange_rate, "0.023457");
        assert_eq!(manual.source, RateSource::Manual);
    }

    #[test]
    fn test_foreign_rejects_system_and_bad_rate() {
        assert_eq!(
            apply_rate_policy("USD", "35", RateSource::System),
            Err(RatePolicyError::SystemSourceForForeign)
        );
        assert!(matches!(
            apply_rate_policy("USD", "abc", RateSource::Manual),
            Err(RatePolicyError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_system_quote() {
        let quote = RateQuote::system(day());
        assert_eq!(quote.currency_id, "THB");
        assert_eq!(quote.buying_transfer, "1.000000");
        assert_eq!(quote.source, RateSource::System);
    }

    #[test]
    fn test_rate_result_from_option() {
        assert_eq!(RateResult::from(None), RateResult::Unavailable);
        let result = RateResult::from(Some(RateQuote::system(day())));
        assert!(result.is_available());
        assert!(result.quote().is_some());
    }

    #[test]
    fn test_currency_classification() {
        assert!(is_local_currency("thb"));
        assert!(is_bot_currency("usd"));
        assert!(!is_bot_currency("KRW"));
        assert!(!is_bot_currency("THB"));
    }
}
