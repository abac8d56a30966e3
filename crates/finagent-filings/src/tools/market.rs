//! Market data tools backed by the market-data provider

use super::decode_params;
use crate::api::MarketDataProvider;
use async_trait::async_trait;
use finagent_core::Result as AgentResult;
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct TickerParams {
    ticker: String,
}

/// Fetches the latest stock quote for a ticker
pub struct StockPriceTool {
    market: Arc<dyn MarketDataProvider>,
}

impl StockPriceTool {
    /// Create a new stock price tool
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TickerParams = decode_params(params)?;
        let quote = self.market.quote(&params.ticker).await?;
        let as_of = quote.timestamp_utc();
        Ok(json!({
            "ticker": params.ticker.to_uppercase(),
            "quote": quote,
            "as_of": as_of,
        }))
    }

    fn name(&self) -> &str {
        "get_stock_price"
    }

    fn description(&self) -> &str {
        "Get the latest stock price for a ticker: current price, session \
         open/high/low, previous close, and the quote timestamp in UTC."
    }

    fn input_schema(&self) -> Value {
        ticker_schema()
    }
}

/// Fetches recent quarterly EPS surprises for a ticker
pub struct EarningsTool {
    market: Arc<dyn MarketDataProvider>,
    default_quarters: usize,
}

#[derive(Debug, Deserialize)]
struct EarningsParams {
    ticker: String,
    #[serde(default, alias = "n")]
    quarters: Option<usize>,
}

impl EarningsTool {
    /// Create a new earnings tool fetching `default_quarters` EPS records
    /// when the caller does not ask for a specific count
    pub fn new(market: Arc<dyn MarketDataProvider>, default_quarters: usize) -> Self {
        Self {
            market,
            default_quarters,
        }
    }
}

#[async_trait]
impl Tool for EarningsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: EarningsParams = decode_params(params)?;
        let quarters = params.quarters.unwrap_or(self.default_quarters);
        let earnings = self.market.earnings(&params.ticker, quarters).await?;
        Ok(json!({
            "ticker": params.ticker.to_uppercase(),
            "earnings": earnings,
        }))
    }

    fn name(&self) -> &str {
        "get_earnings"
    }

    fn description(&self) -> &str {
        "Get recent quarterly EPS results for a ticker, each with actual \
         EPS, consensus estimate, and the surprise against the estimate. \
         Pass 'quarters' to control how many quarters are returned."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol"
                },
                "quarters": {
                    "type": "integer",
                    "description": "Number of recent quarters to return",
                    "default": self.default_quarters
                }
            },
            "required": ["ticker"]
        })
    }
}

/// Fetches analyst recommendation trends for a ticker
pub struct AnalystRatingTool {
    market: Arc<dyn MarketDataProvider>,
}

impl AnalystRatingTool {
    /// Create a new analyst rating tool
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for AnalystRatingTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TickerParams = decode_params(params)?;
        let trends = self.market.analyst_ratings(&params.ticker).await?;
        Ok(json!({
            "ticker": params.ticker.to_uppercase(),
            "recommendation_trends": trends,
        }))
    }

    fn name(&self) -> &str {
        "get_analyst_rating_summary"
    }

    fn description(&self) -> &str {
        "Get analyst recommendation trends for a ticker: strong buy, buy, \
         hold, sell, and strong sell counts per period, newest first."
    }

    fn input_schema(&self) -> Value {
        ticker_schema()
    }
}

fn ticker_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ticker": {
                "type": "string",
                "description": "Stock ticker symbol"
            }
        },
        "required": ["ticker"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::finnhub::MockMarketDataProvider;
    use crate::api::Quote;

    fn quote() -> Quote {
        Quote {
            current: 101.5,
            change: Some(1.5),
            percent_change: Some(1.5),
            high: 102.0,
            low: 99.0,
            open: 100.0,
            previous_close: 100.0,
            timestamp: 1747771200,
        }
    }

    #[tokio::test]
    async fn test_stock_price_tool_formats_timestamp() {
        let mut market = MockMarketDataProvider::new();
        market.expect_quote().times(1).returning(|_| Ok(quote()));
        let tool = StockPriceTool::new(Arc::new(market));

        let result = tool.execute(json!({"ticker": "mu"})).await.unwrap();
        assert_eq!(result["ticker"], "MU");
        assert_eq!(result["as_of"], "2025-05-20 20:00:00 UTC");
        assert_eq!(result["quote"]["c"], 101.5);
    }

    #[tokio::test]
    async fn test_invalid_params_never_reach_provider() {
        let market = MockMarketDataProvider::new();
        let tool = AnalystRatingTool::new(Arc::new(market));

        let err = tool.execute(json!({"symbol": "MU"})).await.unwrap_err();
        assert!(matches!(err, finagent_core::Error::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_earnings_tool_passes_quarter_limit() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_earnings()
            .withf(|ticker, limit| ticker == "MU" && *limit == 4)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let tool = EarningsTool::new(Arc::new(market), 4);

        let result = tool.execute(json!({"ticker": "MU"})).await.unwrap();
        assert!(result["earnings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_earnings_tool_honors_explicit_quarters() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_earnings()
            .withf(|ticker, limit| ticker == "MU" && *limit == 8)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let tool = EarningsTool::new(Arc::new(market), 4);

        tool.execute(json!({"ticker": "MU", "quarters": 8}))
            .await
            .unwrap();
    }
}
