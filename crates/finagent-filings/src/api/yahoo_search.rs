//! Yahoo Finance search client for name-to-ticker lookup

use crate::error::{FilingsError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// One equity match for a company-name search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerMatch {
    /// Company short name
    pub name: String,
    /// Stock ticker symbol
    pub symbol: String,
    /// Listing exchange
    pub exchange: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    #[serde(rename = "quoteType")]
    quote_type: Option<String>,
    shortname: Option<String>,
    symbol: Option<String>,
    exchange: Option<String>,
}

/// Yahoo Finance search API client
pub struct TickerSearchClient {
    client: Client,
}

impl TickerSearchClient {
    /// Create a new search client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Search equity tickers matching a company name
    ///
    /// Non-equity quotes (funds, currencies, indices) are filtered out.
    #[instrument(skip(self))]
    pub async fn search(&self, company_name: &str) -> Result<Vec<TickerMatch>> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", company_name)])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| FilingsError::Api(format!("Yahoo search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FilingsError::Api(format!(
                "Yahoo search API error: {}",
                response.status()
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| FilingsError::Api(format!("Failed to parse Yahoo search response: {e}")))?;

        Ok(filter_equities(search))
    }
}

impl Default for TickerSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_equities(search: SearchResponse) -> Vec<TickerMatch> {
    search
        .quotes
        .into_iter()
        .filter(|q| q.quote_type.as_deref() == Some("EQUITY"))
        .filter_map(|q| {
            Some(TickerMatch {
                name: q.shortname?,
                symbol: q.symbol?,
                exchange: q.exchange?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_equities() {
        let raw = r#"{
            "quotes": [
                {"quoteType": "EQUITY", "shortname": "Micron Technology, Inc.",
                 "symbol": "MU", "exchange": "NMS"},
                {"quoteType": "ETF", "shortname": "Some Fund",
                 "symbol": "FUND", "exchange": "PCX"},
                {"quoteType": "EQUITY", "shortname": null,
                 "symbol": "XX", "exchange": "NMS"}
            ]
        }"#;

        let search: SearchResponse = serde_json::from_str(raw).unwrap();
        let matches = filter_equities(search);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].symbol, "MU");
        assert_eq!(matches[0].name, "Micron Technology, Inc.");
    }

    #[test]
    fn test_empty_response() {
        let search: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(filter_equities(search).is_empty());
    }
}
