//! Ticker symbol lookup tool

use super::decode_params;
use crate::api::TickerSearchClient;
use async_trait::async_trait;
use finagent_core::Result as AgentResult;
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

/// Resolves a company name to listed equity tickers
pub struct SearchTickerTool {
    search: TickerSearchClient,
}

#[derive(Debug, Deserialize)]
struct SearchTickerParams {
    company_name: String,
}

impl SearchTickerTool {
    /// Create a new ticker search tool
    pub fn new() -> Self {
        Self {
            search: TickerSearchClient::new(),
        }
    }
}

impl Default for SearchTickerTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchTickerTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchTickerParams = decode_params(params)?;
        let matches = self.search.search(&params.company_name).await?;
        Ok(json!({ "matches": matches }))
    }

    fn name(&self) -> &str {
        "search_ticker"
    }

    fn description(&self) -> &str {
        "Search for ticker symbols by company name. \
         Returns listed equities only, each with name, symbol, and exchange."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": {
                    "type": "string",
                    "description": "Company name to search for, e.g. 'Micron Technology'"
                }
            },
            "required": ["company_name"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_missing_company_name() {
        let tool = SearchTickerTool::new();
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, finagent_core::Error::InvalidParameters(_)));
    }

    #[test]
    fn test_schema_names_required_field() {
        let tool = SearchTickerTool::new();
        let schema = tool.input_schema();
        assert_eq!(schema["required"][0], "company_name");
    }
}
