//! Turning a submitted record into validated, storable values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thbfx_shared::FieldErrors;

use super::parse_iso_date;
use crate::currency::{
    AMOUNT_SCALE, RATE_SCALE, RatePolicyError, RateSource, apply_rate_policy, convert_to_thb,
    is_local_currency, parse_decimal_value,
};

/// A record as submitted by a client, before any validation.
///
/// Missing fields deserialize as empty so that every problem is reported
/// together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionDraft {
    /// Customs declaration number.
    pub declaration_number: String,
    /// Declaration date, `YYYY-MM-DD`.
    pub declaration_date: String,
    /// Commercial invoice number.
    pub invoice_number: String,
    /// Invoice date, `YYYY-MM-DD`.
    pub invoice_date: String,
    /// Three-letter currency code.
    pub currency_code: String,
    /// Amount in the invoice currency.
    pub foreign_amount: String,
    /// Foreign to THB rate.
    pub exchange_rate: String,
    /// Day the rate was looked up for, `YYYY-MM-DD`.
    pub rate_date: String,
    /// `BOT`, `MANUAL` or `SYSTEM`; defaults to `BOT`.
    pub rate_source: Option<String>,
    /// Free text.
    pub notes: Option<String>,
}

/// A validated record ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransaction {
    /// Trimmed declaration number.
    pub declaration_number: String,
    /// Declaration date.
    pub declaration_date: NaiveDate,
    /// Trimmed invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Upper-case currency code.
    pub currency_code: String,
    /// Foreign amount at scale 4.
    pub foreign_amount: Decimal,
    /// Exchange rate at scale 6.
    pub exchange_rate: Decimal,
    /// `foreign_amount * exchange_rate`, half-up at scale 2.
    pub thb_amount: Decimal,
    /// Rate lookup date.
    pub rate_date: NaiveDate,
    /// Provenance of `exchange_rate`.
    pub rate_source: RateSource,
    /// Notes, `None` when blank.
    pub notes: Option<String>,
}

/// Integer digits available in the `NUMERIC(18, s)` storage columns.
const AMOUNT_INTEGER_DIGITS: u32 = 14;
const RATE_INTEGER_DIGITS: u32 = 12;
const THB_INTEGER_DIGITS: u32 = 16;

/// True when `|value| < 10^digits`.
fn within_digits(value: Decimal, digits: u32) -> bool {
    value.abs() < Decimal::from(10_i64.pow(digits))
}

fn too_large(label: &str, digits: u32) -> String {
    format!("{label} must have at most {digits} digits before the decimal point")
}

fn required<'a>(errors: &mut FieldErrors, field: &str, value: &'a str, message: &str) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
        None
    } else {
        Some(value)
    }
}

fn date(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<NaiveDate> {
    let value = required(errors, field, value, message)?;
    let parsed = parse_iso_date(value);
    if parsed.is_none() {
        errors.add(field, "Date must be in YYYY-MM-DD format");
    }
    parsed
}

fn rate_source(errors: &mut FieldErrors, value: Option<&str>) -> Option<RateSource> {
    match value.map(str::trim) {
        None | Some("") => Some(RateSource::default()),
        Some(text) => {
            let parsed = text.parse().ok();
            if parsed.is_none() {
                errors.add("rate_source", "Rate source must be one of BOT, MANUAL, SYSTEM");
            }
            parsed
        }
    }
}

impl TransactionDraft {
    /// Validates every field and applies the rate policy.
    ///
    /// `currency_exists` is asked about well-formed currency codes only.
    ///
    /// # Errors
    ///
    /// Returns all field problems at once.
    pub fn normalize(
        &self,
        currency_exists: impl Fn(&str) -> bool,
    ) -> Result<NormalizedTransaction, FieldErrors> {
        let mut errors = FieldErrors::new();

        let declaration_number = required(
            &mut errors,
            "declaration_number",
            &self.declaration_number,
            "Declaration number is required",
        );
        let declaration_date = date(
            &mut errors,
            "declaration_date",
            &self.declaration_date,
            "Declaration date is required",
        );
        let invoice_number = required(
            &mut errors,
            "invoice_number",
            &self.invoice_number,
            "Invoice number is required",
        );
        let invoice_date = date(
            &mut errors,
            "invoice_date",
            &self.invoice_date,
            "Invoice date is required",
        );
        let rate_date = date(&mut errors, "rate_date", &self.rate_date, "Rate date is required");

        let currency_code = required(
            &mut errors,
            "currency_code",
            &self.currency_code,
            "Currency code is required",
        )
        .map(str::to_ascii_uppercase)
        .and_then(|code| {
            if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
                errors.add("currency_code", "Currency code must be a 3-letter code");
                None
            } else if !currency_exists(&code) {
                errors.add("currency_code", format!("Unknown currency code: {code}"));
                None
            } else {
                Some(code)
            }
        });

        let foreign_amount = required(
            &mut errors,
            "foreign_amount",
            &self.foreign_amount,
            "Foreign amount is required",
        )
        .and_then(|value| match parse_decimal_value(value, AMOUNT_SCALE) {
            Ok(amount) if within_digits(amount, AMOUNT_INTEGER_DIGITS) => Some(amount),
            Ok(_) => {
                errors.add(
                    "foreign_amount",
                    too_large("Foreign amount", AMOUNT_INTEGER_DIGITS),
                );
                None
            }
            Err(e) => {
                errors.add("foreign_amount", e.to_string());
                None
            }
        });

        let source = rate_source(&mut errors, self.rate_source.as_deref());

        let local = currency_code.as_deref().is_some_and(is_local_currency);
        let submitted_rate = if local {
            Some(self.exchange_rate.trim())
        } else {
            required(
                &mut errors,
                "exchange_rate",
                &self.exchange_rate,
                "Exchange rate is required",
            )
        };

        let resolved = match (submitted_rate, source) {
            (Some(rate), Some(source)) => {
                let code = currency_code.as_deref().unwrap_or_default();
                match apply_rate_policy(code, rate, source) {
                    Ok(resolved) => match parse_decimal_value(&resolved.exchange_rate, RATE_SCALE) {
                        Ok(rate) if within_digits(rate, RATE_INTEGER_DIGITS) => {
                            Some((rate, resolved.source))
                        }
                        Ok(_) => {
                            errors.add(
                                "exchange_rate",
                                too_large("Exchange rate", RATE_INTEGER_DIGITS),
                            );
                            None
                        }
                        Err(e) => {
                            errors.add("exchange_rate", e.to_string());
                            None
                        }
                    },
                    Err(RatePolicyError::InvalidRate(e)) => {
                        errors.add("exchange_rate", e.to_string());
                        None
                    }
                    Err(e @ RatePolicyError::SystemSourceForForeign) => {
                        errors.add("rate_source", e.to_string());
                        None
                    }
                }
            }
            _ => None,
        };

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);

        let (
            Some(declaration_number),
            Some(declaration_date),
            Some(invoice_number),
            Some(invoice_date),
            Some(rate_date),
            Some(currency_code),
            Some(foreign_amount),
            Some((exchange_rate, rate_source)),
        ) = (
            declaration_number,
            declaration_date,
            invoice_number,
            invoice_date,
            rate_date,
            currency_code,
            foreign_amount,
            resolved,
        )
        else {
            return Err(errors);
        };

        let thb_amount = convert_to_thb(foreign_amount, exchange_rate)
            .filter(|thb| within_digits(*thb, THB_INTEGER_DIGITS));
        let Some(thb_amount) = thb_amount else {
            errors.add("thb_amount", too_large("THB amount", THB_INTEGER_DIGITS));
            return Err(errors);
        };

        Ok(NormalizedTransaction {
            declaration_number: declaration_number.to_string(),
            declaration_date,
            invoice_number: invoice_number.to_string(),
            invoice_date,
            currency_code,
            foreign_amount,
            exchange_rate,
            thb_amount,
            rate_date,
            rate_source,
            notes,
        })
    }
}
