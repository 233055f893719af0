//! Bank of Thailand (BOT) daily exchange-rate client.
//!
//! Every failure mode (missing key, transport error, timeout, non-2xx, bad
//! payload, no data for the day) degrades to `None` with a warning so callers
//! can fall back to manual entry.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BotConfig;

/// Source marker attached to rates fetched from BOT.
pub const BOT_SOURCE: &str = "BOT";

/// A buying-transfer rate published by BOT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotRate {
    /// Currency code as reported by BOT.
    pub currency_id: String,
    /// Period (date) the rate applies to.
    pub period: String,
    /// Buying transfer rate, kept as the decimal string BOT returned.
    pub buying_transfer: String,
    /// Always `BOT`.
    pub source: String,
}

/// Looks up the rate for a currency on a date.
///
/// Implementations never fail: "not found" and transport problems are both `None`.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Returns the rate for `currency` on `date`, if one is available.
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Option<BotRate>;
}

/// Errors raised while talking to BOT. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum BotError {
    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    /// Request failed to complete.
    #[error("request failed: {0}")]
    Transport(String),
    /// Upstream answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// Body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Payload(String),
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    result: Option<BotResult>,
}

#[derive(Debug, Deserialize)]
struct BotResult {
    data: Option<BotData>,
}

#[derive(Debug, Deserialize)]
struct BotData {
    #[serde(default)]
    data_detail: Vec<BotDataDetail>,
}

#[derive(Debug, Deserialize)]
struct BotDataDetail {
    #[serde(default)]
    period: String,
    #[serde(default)]
    currency_id: String,
    #[serde(default)]
    buying_transfer: String,
}

/// HTTP client for the BOT daily average exchange-rate endpoint.
#[derive(Clone)]
pub struct BotClient {
    config: BotConfig,
    client: Client,
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("base_url", &self.config.base_url)
            .field("configured", &self.config.is_configured())
            .finish_non_exhaustive()
    }
}

impl BotClient {
    /// Creates a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Client` if the TLS backend cannot be initialised.
    pub fn new(config: BotConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn request(&self, currency: &str, date: NaiveDate) -> Result<Option<BotRate>, BotError> {
        let period = date.format("%Y-%m-%d").to_string();

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("start_period", period.as_str()),
                ("end_period", period.as_str()),
                ("currency", currency),
            ])
            .header("Accept", "*/*")
            .header("Authorization", self.config.api_key.trim())
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Status(response.status().as_u16()));
        }

        let body: BotApiResponse = response
            .json()
            .await
            .map_err(|e| BotError::Payload(e.to_string()))?;

        Ok(extract_rate(body))
    }
}

#[async_trait]
impl ExchangeRateProvider for BotClient {
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Option<BotRate> {
        if !self.config.is_configured() {
            warn!("BOT API key not configured, rate lookup skipped");
            return None;
        }

        match self.request(currency, date).await {
            Ok(Some(rate)) => {
                debug!(currency, %date, rate = %rate.buying_transfer, "BOT rate fetched");
                Some(rate)
            }
            Ok(None) => {
                warn!(currency, %date, "No BOT exchange rate data for date");
                None
            }
            Err(e) => {
                warn!(currency, %date, error = %e, "BOT rate lookup failed");
                None
            }
        }
    }
}

/// Picks the first detail row with a non-empty buying transfer rate.
fn extract_rate(body: BotApiResponse) -> Option<BotRate> {
    let detail = body
        .result?
        .data?
        .data_detail
        .into_iter()
        .next()?;

    let buying_transfer = detail.buying_transfer.trim();
    if buying_transfer.is_empty() {
        return None;
    }

    Some(BotRate {
        currency_id: detail.currency_id,
        period: detail.period,
        buying_transfer: buying_transfer.to_string(),
        source: BOT_SOURCE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<BotRate> {
        extract_rate(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_extract_rate_uses_buying_transfer() {
        let rate = parse(
            r#"{"result":{"timestamp":"2025-01-15 18:00:00","api":"Daily Weighted-average",
                "data":{"data_header":{"report_name_eng":"Rates"},
                "data_detail":[{"period":"2025-01-15","currency_id":"USD",
                "currency_name_th":"x","currency_name_eng":"US DOLLAR",
                "buying_sight":"34.1000000","buying_transfer":"34.2162000",
                "selling":"34.6000000","mid_rate":"34.4000000"}]}}}"#,
        )
        .unwrap();

        assert_eq!(rate.currency_id, "USD");
        assert_eq!(rate.period, "2025-01-15");
        assert_eq!(rate.buying_transfer, "34.2162000");
        assert_eq!(rate.source, "BOT");
    }

    #[test]
    fn test_extract_rate_empty_detail_is_none() {
        assert!(parse(r#"{"result":{"data":{"data_detail":[]}}}"#).is_none());
    }

    #[test]
    fn test_extract_rate_blank_buying_transfer_is_none() {
        assert!(
            parse(
                r#"{"result":{"data":{"data_detail":[
                    {"period":"2025-01-18","currency_id":"USD","buying_transfer":""}]}}}"#
            )
            .is_none()
        );
    }

    #[test]
    fn test_extract_rate_missing_result_is_none() {
        assert!(parse(r#"{"error":"quota exceeded"}"#).is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_client_returns_none_without_network() {
        let client = BotClient::new(BotConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(client.fetch_rate("USD", date).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_none() {
        let client = BotClient::new(BotConfig {
            api_key: "key".to_string(),
            base_url: "http://127.0.0.1:9/rates".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(client.fetch_rate("USD", date).await.is_none());
    }
}
