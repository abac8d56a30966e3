//! Tool wrappers exposing the filing and market pipelines to an agent
//!
//! Each tool decodes its JSON parameters into a typed struct, delegates to
//! the underlying service, and serializes the result. Parameter decode
//! failures surface as invalid-parameter errors; everything downstream is
//! an execution failure carrying the domain error's message.

mod client;
mod filings;
mod market;
mod peers;
mod search;
mod statements;

pub use client::{GetClientInfoTool, SaveClientInfoTool};
pub use filings::{FilingItemSummaryTool, GetCikTool, GetLatestFilingsTool};
pub use market::{AnalystRatingTool, EarningsTool, StockPriceTool};
pub use peers::PeerComparisonTool;
pub use search::SearchTickerTool;
pub use statements::FinancialStatementTool;

use crate::api::{MarketDataProvider, SecEdgarClient};
use crate::assembler::FilingSummaryService;
use crate::config::FilingsConfig;
use crate::memory::MemoryStore;
use crate::peers::PeerComparisonService;
use crate::statements::StatementService;
use finagent_core::{Error, Result};
use finagent_tools::ToolRegistry;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Decode tool parameters, mapping failures to invalid-parameter errors
fn decode_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| Error::InvalidParameters(e.to_string()))
}

/// Register the full financial toolset into a registry
///
/// The returned registry serves both tool dispatch and the tool catalog
/// shown to the agent via [`ToolRegistry::describe`].
pub fn register_tools(
    config: &FilingsConfig,
    edgar: Arc<SecEdgarClient>,
    market: Arc<dyn MarketDataProvider>,
    statements: Arc<StatementService>,
    summaries: Arc<FilingSummaryService>,
    comparisons: Arc<PeerComparisonService>,
    memory: Arc<MemoryStore>,
) -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry.register(Arc::new(SearchTickerTool::new()));
    registry.register(Arc::new(GetCikTool::new(edgar.clone())));
    registry.register(Arc::new(GetLatestFilingsTool::new(edgar)));
    registry.register(Arc::new(FinancialStatementTool::new(statements)));
    registry.register(Arc::new(StockPriceTool::new(market.clone())));
    registry.register(Arc::new(EarningsTool::new(
        market.clone(),
        config.earnings_quarters,
    )));
    registry.register(Arc::new(AnalystRatingTool::new(market)));
    registry.register(Arc::new(FilingItemSummaryTool::new(summaries)));
    registry.register(Arc::new(PeerComparisonTool::new(comparisons)));
    registry.register(Arc::new(SaveClientInfoTool::new(memory.clone())));
    registry.register(Arc::new(GetClientInfoTool::new(memory)));
    registry
}
