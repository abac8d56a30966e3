//! Peer comparison tool

use super::decode_params;
use crate::peers::PeerComparisonService;
use async_trait::async_trait;
use finagent_core::{Error, Result as AgentResult};
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Compares a set of companies in one narrative
pub struct PeerComparisonTool {
    comparisons: Arc<PeerComparisonService>,
}

#[derive(Debug, Deserialize)]
struct PeerComparisonParams {
    tickers: Vec<String>,
}

impl PeerComparisonTool {
    /// Create a new peer comparison tool
    pub fn new(comparisons: Arc<PeerComparisonService>) -> Self {
        Self { comparisons }
    }
}

#[async_trait]
impl Tool for PeerComparisonTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: PeerComparisonParams = decode_params(params)?;
        if params.tickers.is_empty() {
            return Err(Error::InvalidParameters(
                "tickers must contain at least one symbol".to_string(),
            ));
        }
        let narrative = self.comparisons.run_peer_comparison(&params.tickers).await?;
        Ok(json!({
            "tickers": params.tickers,
            "comparison": narrative,
        }))
    }

    fn name(&self) -> &str {
        "run_peer_comparison"
    }

    fn description(&self) -> &str {
        "Compare a set of companies across revenue, cost structure, \
         profitability, leverage, and stock and valuation. Produces one \
         narrative covering every requested ticker; companies whose data \
         could not be gathered are acknowledged rather than dropped."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tickers": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ticker symbols to compare, e.g. ['MU', 'WDC', 'STX']"
                }
            },
            "required": ["tickers"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::MockPeerDataSource;
    use crate::test_support::ScriptedLlm;

    #[tokio::test]
    async fn test_empty_ticker_list_is_invalid() {
        let peers = MockPeerDataSource::new();
        let llm = Arc::new(ScriptedLlm::new());
        let service = Arc::new(PeerComparisonService::new(Arc::new(peers), llm));
        let tool = PeerComparisonTool::new(service);

        let err = tool.execute(json!({"tickers": []})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }
}
