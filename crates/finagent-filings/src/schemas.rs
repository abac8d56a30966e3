//! Data contracts for the filing pipeline
//!
//! Structured model output is always decoded through these types before it
//! is trusted; an `item_code` string outside the catalog fails at decode
//! time via the `ItemCode` serde implementation.

use crate::catalog::ItemCode;
use serde::{Deserialize, Serialize};

/// One extracted fact, e.g. `"Number of Employees" -> "45,000"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Name of the metric or fact
    pub key: String,
    /// Value associated with the key
    pub value: String,
}

/// Validated summary of one filing section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingItemSummary {
    /// Filing section code like `ITEM 1A`
    pub item_code: ItemCode,
    /// Title of the filing section, e.g. `Risk Factors`
    pub title: String,
    /// High-level description of what this item covers
    pub description: String,
    /// Summary of the item extracted from the filing (<= ~100 words)
    #[serde(default)]
    pub summary: Option<String>,
    /// Extracted key-value facts
    #[serde(default)]
    pub key_values: Vec<KeyValuePair>,
}

/// Complete answer for one filing: ordered per-item summaries plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingSummary {
    pub ticker: String,
    pub filing_date: String,
    pub form: String,
    pub filingitemsummaries: Vec<FilingItemSummary>,
}

/// Wire contract of the item resolver's structured model call
///
/// Codes arrive as raw strings; the resolver validates each one against the
/// catalog before anything downstream sees them.
#[derive(Debug, Clone, Deserialize)]
pub struct InferredItemCodes {
    /// Relevant 10-K item codes like `["ITEM 1A", "ITEM 7A"]`
    pub item_codes: Vec<String>,
}

/// Wire contract of the structured section extraction
#[derive(Debug, Clone, Deserialize)]
pub struct ItemExtraction {
    /// Short narrative summary (<= ~100 words)
    #[serde(default)]
    pub summary: Option<String>,
    /// Extracted key-value facts
    #[serde(default)]
    pub key_values: Vec<KeyValuePair>,
}

/// One participant in a peer comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Company name as listed for the ticker
    pub name: String,
    /// Ticker symbol
    pub ticker: String,
}

/// Session-scoped context about the company and peers under discussion
///
/// Owned by the conversational layer; not persisted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMemory {
    /// Zero-padded CIK in the `CIK##########` form
    pub cik: String,
    /// Company name as listed for the ticker
    pub name: String,
    /// Ticker symbols for the company (at least one)
    pub tickers: Vec<String>,
    /// Comparison peers, if established during the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<PeerInfo>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filing_item_summary_rejects_unknown_code_at_decode() {
        let raw = r#"{
            "item_code": "ITEM 99",
            "title": "Bogus",
            "description": "Bogus"
        }"#;
        assert!(serde_json::from_str::<FilingItemSummary>(raw).is_err());

        let raw = r#"{
            "item_code": "ITEM 1A",
            "title": "Risk Factors",
            "description": "Material risks"
        }"#;
        let summary: FilingItemSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.item_code, ItemCode::Item1A);
        assert!(summary.summary.is_none());
        assert!(summary.key_values.is_empty());
    }

    #[test]
    fn test_item_extraction_defaults() {
        let extraction: ItemExtraction = serde_json::from_str("{}").unwrap();
        assert!(extraction.summary.is_none());
        assert!(extraction.key_values.is_empty());
    }

    #[test]
    fn test_client_memory_round_trip() {
        let memory = ClientMemory {
            cik: "CIK0001730168".to_string(),
            name: "Micron Technology".to_string(),
            tickers: vec!["MU".to_string()],
            peers: Some(vec![PeerInfo {
                name: "Intel".to_string(),
                ticker: "INTC".to_string(),
            }]),
        };

        let json = serde_json::to_string(&memory).unwrap();
        let back: ClientMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cik, memory.cik);
        assert_eq!(back.peers.unwrap()[0].ticker, "INTC");
    }
}
