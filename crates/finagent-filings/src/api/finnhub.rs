//! Finnhub market-data client
//!
//! Quote, earnings-surprise, and analyst-recommendation pass-throughs.
//! A missing API key is a configuration error at construction time, not a
//! per-call failure.

use crate::error::{FilingsError, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Latest stock quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Current price
    #[serde(rename = "c")]
    pub current: f64,
    /// Change from the previous close
    #[serde(rename = "d")]
    pub change: Option<f64>,
    /// Percentage change from the previous close
    #[serde(rename = "dp")]
    pub percent_change: Option<f64>,
    /// Session high
    #[serde(rename = "h")]
    pub high: f64,
    /// Session low
    #[serde(rename = "l")]
    pub low: f64,
    /// Session open
    #[serde(rename = "o")]
    pub open: f64,
    /// Previous close
    #[serde(rename = "pc")]
    pub previous_close: f64,
    /// UNIX timestamp of the quote
    #[serde(rename = "t")]
    pub timestamp: i64,
}

impl Quote {
    /// Quote timestamp as `YYYY-MM-DD HH:MM:SS UTC`
    pub fn timestamp_utc(&self) -> String {
        format_unix_utc(self.timestamp)
    }
}

/// One quarterly EPS record with the surprise against consensus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsSurprise {
    /// Reported EPS
    pub actual: Option<f64>,
    /// Analyst consensus EPS estimate
    pub estimate: Option<f64>,
    /// Fiscal period end date (YYYY-MM-DD)
    pub period: String,
    /// Fiscal quarter number
    pub quarter: u32,
    /// Fiscal year
    pub year: u32,
    /// Difference between actual and estimated EPS
    pub surprise: Option<f64>,
    /// Surprise as a percentage of the estimate
    #[serde(rename = "surprisePercent")]
    pub surprise_percent: Option<f64>,
    /// Ticker symbol
    pub symbol: String,
}

/// Analyst recommendation counts for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationTrend {
    #[serde(rename = "strongBuy")]
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    #[serde(rename = "strongSell")]
    pub strong_sell: u32,
    /// Date of the rating summary (YYYY-MM-DD)
    pub period: String,
    /// Ticker symbol
    pub symbol: String,
}

/// Collaborator providing market data for a ticker
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote
    async fn quote(&self, ticker: &str) -> Result<Quote>;

    /// Most recent EPS surprises, newest first
    async fn earnings(&self, ticker: &str, limit: usize) -> Result<Vec<EarningsSurprise>>;

    /// Analyst recommendation trends, newest first
    async fn analyst_ratings(&self, ticker: &str) -> Result<Vec<RecommendationTrend>>;
}

/// Finnhub API client
pub struct FinnhubClient {
    client: Client,
    api_key: String,
}

impl FinnhubClient {
    /// Create a new client with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from the `FINNHUB_API_KEY` environment variable
    ///
    /// A missing key is fatal here, at startup, rather than on first call.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FINNHUB_API_KEY").map_err(|_| {
            FilingsError::Config("FINNHUB_API_KEY environment variable is not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{FINNHUB_BASE_URL}/{path}");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FilingsError::Api(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FilingsError::Api(format!(
                "Finnhub API error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::Api(format!("Failed to parse Finnhub response: {e}")))
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubClient {
    async fn quote(&self, ticker: &str) -> Result<Quote> {
        let symbol = ticker.to_uppercase();
        self.get("quote", &[("symbol", symbol.as_str())]).await
    }

    async fn earnings(&self, ticker: &str, limit: usize) -> Result<Vec<EarningsSurprise>> {
        let symbol = ticker.to_uppercase();
        let limit = limit.to_string();
        self.get(
            "stock/earnings",
            &[("symbol", symbol.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    async fn analyst_ratings(&self, ticker: &str) -> Result<Vec<RecommendationTrend>> {
        let symbol = ticker.to_uppercase();
        self.get("stock/recommendation", &[("symbol", symbol.as_str())])
            .await
    }
}

/// Convert a UNIX timestamp to `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_unix_utc(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("invalid timestamp {timestamp}"))
}
