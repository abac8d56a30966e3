//! SEC filing tools: CIK lookup, filing lists, and 10-K item summaries

use super::decode_params;
use crate::api::{SecEdgarClient, TickerSearchClient, format_cik};
use crate::assembler::FilingSummaryService;
use crate::error::FilingsError;
use crate::filing::FormType;
use async_trait::async_trait;
use finagent_core::{Error as AgentError, Result as AgentResult};
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_FILING_LIMIT: usize = 5;

/// Resolves a company name or ticker to the company's SEC CIK identifier
pub struct GetCikTool {
    edgar: Arc<SecEdgarClient>,
    search: TickerSearchClient,
}

#[derive(Debug, Deserialize)]
struct CikParams {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    ticker: Option<String>,
}

impl GetCikTool {
    /// Create a new CIK lookup tool
    pub fn new(edgar: Arc<SecEdgarClient>) -> Self {
        Self {
            edgar,
            search: TickerSearchClient::new(),
        }
    }

    async fn resolve_ticker(&self, params: &CikParams) -> AgentResult<String> {
        if let Some(ticker) = &params.ticker {
            return Ok(ticker.clone());
        }
        let Some(name) = &params.name else {
            return Err(AgentError::InvalidParameters(
                "either 'name' or 'ticker' is required".to_string(),
            ));
        };
        let matches = self.search.search(name).await?;
        let first = matches.into_iter().next().ok_or_else(|| {
            FilingsError::Api(format!("No ticker found for company name '{name}'"))
        })?;
        Ok(first.symbol)
    }
}

#[async_trait]
impl Tool for GetCikTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CikParams = decode_params(params)?;
        let ticker = self.resolve_ticker(&params).await?;
        let cik = self.edgar.get_cik(&ticker).await?;
        Ok(json!({
            "ticker": ticker.to_uppercase(),
            "cik": format_cik(&cik),
        }))
    }

    fn name(&self) -> &str {
        "get_cik"
    }

    fn description(&self) -> &str {
        "Get the SEC CIK (Central Index Key) for a company, zero-padded to \
         the CIK########## form used by EDGAR. Accepts a company name \
         (resolved to its primary listed ticker first) or a ticker symbol."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Company name, e.g. 'Micron Technology'"
                },
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol, used directly when given"
                }
            }
        })
    }
}

/// Lists a company's recent SEC filings
pub struct GetLatestFilingsTool {
    edgar: Arc<SecEdgarClient>,
}

#[derive(Debug, Deserialize)]
struct LatestFilingsParams {
    ticker: String,
    #[serde(default)]
    form_type: Option<String>,
    #[serde(default = "default_filing_limit")]
    limit: usize,
}

fn default_filing_limit() -> usize {
    DEFAULT_FILING_LIMIT
}

impl GetLatestFilingsTool {
    /// Create a new filing list tool
    pub fn new(edgar: Arc<SecEdgarClient>) -> Self {
        Self { edgar }
    }
}

#[async_trait]
impl Tool for GetLatestFilingsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: LatestFilingsParams = decode_params(params)?;
        let form_type = params
            .form_type
            .as_deref()
            .map(FormType::parse)
            .transpose()?;
        let filings = self
            .edgar
            .get_filings(&params.ticker, form_type, params.limit)
            .await?;
        let described: Vec<String> = filings.iter().map(|f| f.describe()).collect();
        Ok(json!({
            "ticker": params.ticker.to_uppercase(),
            "filings": filings,
            "described": described,
        }))
    }

    fn name(&self) -> &str {
        "get_latest_filings"
    }

    fn description(&self) -> &str {
        "List a company's most recent SEC filings, optionally filtered \
         by form type (10-K, 10-Q, or 8-K)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol"
                },
                "form_type": {
                    "type": "string",
                    "description": "Filter to one form type",
                    "enum": ["10-K", "10-Q", "8-K"]
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of filings to return",
                    "default": DEFAULT_FILING_LIMIT
                }
            },
            "required": ["ticker"]
        })
    }
}

/// Summarizes items of a company's latest 10-K filing
pub struct FilingItemSummaryTool {
    summaries: Arc<FilingSummaryService>,
}

#[derive(Debug, Deserialize)]
struct ItemSummaryParams {
    user_query: String,
    ticker: String,
    #[serde(default)]
    item_codes: Option<Vec<String>>,
}

impl FilingItemSummaryTool {
    /// Create a new 10-K item summary tool
    pub fn new(summaries: Arc<FilingSummaryService>) -> Self {
        Self { summaries }
    }
}

#[async_trait]
impl Tool for FilingItemSummaryTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ItemSummaryParams = decode_params(params)?;
        let report = self
            .summaries
            .latest_tenk_item_summary(
                &params.user_query,
                &params.ticker,
                params.item_codes.as_deref(),
            )
            .await?;
        Ok(json!({ "summary": report }))
    }

    fn name(&self) -> &str {
        "get_latest_10K_item_summary"
    }

    fn description(&self) -> &str {
        "Summarize items of a company's latest 10-K filing. \
         Pass explicit item codes like ['ITEM 1A', 'ITEM 7A'] to summarize \
         those sections, or omit them to infer relevant items from the \
         user's question. Each section is summarized in about 100 words \
         with key numerical data preserved."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_query": {
                    "type": "string",
                    "description": "The user's question about the company"
                },
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol"
                },
                "item_codes": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Explicit 10-K item codes like 'ITEM 1A'; omit to infer from the question"
                }
            },
            "required": ["user_query", "ticker"]
        })
    }
}
