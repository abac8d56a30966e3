//! Command-line interface for the financial agent toolset
//!
//! Wires the real providers (OpenAI-compatible model, SEC EDGAR, Finnhub,
//! Yahoo search) into the tool registry and runs one tool per invocation.
//! Configuration comes from the environment: `OPENAI_API_KEY`,
//! `FINNHUB_API_KEY`, and `SEC_IDENTITY`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finagent_filings::api::{FinnhubClient, SecEdgarClient};
use finagent_filings::assembler::FilingSummaryService;
use finagent_filings::catalog::ItemCatalog;
use finagent_filings::peers::{PeerComparisonService, PeerDataAggregator};
use finagent_filings::statements::StatementService;
use finagent_filings::{FilingsConfig, MemoryStore, register_tools};
use finagent_llm::OpenAiClient;
use finagent_tools::ToolRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "finagent")]
#[command(about = "Financial filing analysis and market data tools", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available tools with their descriptions
    Tools,
    /// Summarize items of a company's latest 10-K filing
    Summary {
        /// Stock ticker symbol
        ticker: String,
        /// Question driving item selection
        #[arg(short, long, default_value = "Give me an overview of the business and its risks")]
        query: String,
        /// Explicit item codes like "ITEM 1A"; omit to infer from the question
        #[arg(short, long)]
        items: Vec<String>,
    },
    /// Compare a set of companies
    Compare {
        /// Ticker symbols, e.g. MU WDC STX
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Get the latest stock quote
    Quote {
        /// Stock ticker symbol
        ticker: String,
    },
    /// Get a financial statement
    Statement {
        /// Stock ticker symbol
        ticker: String,
        /// Statement type: income, balance_sheet, or cashflow
        #[arg(short, long, default_value = "income")]
        statement_type: String,
        /// Number of most recent fiscal periods
        #[arg(short, long, default_value = "3")]
        periods: usize,
    },
    /// List a company's recent SEC filings
    Filings {
        /// Stock ticker symbol
        ticker: String,
        /// Filter to one form type (10-K, 10-Q, 8-K)
        #[arg(short, long)]
        form: Option<String>,
    },
    /// Search ticker symbols by company name
    Search {
        /// Company name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    finagent_core::init_tracing();
    let args = Args::parse();

    let registry = build_registry()?;
    debug!(tools = registry.len(), "Tool registry ready");

    let (tool_name, params) = match args.command {
        Command::Tools => {
            println!("{}", registry.describe());
            return Ok(());
        }
        Command::Summary {
            ticker,
            query,
            items,
        } => {
            let mut params = json!({ "ticker": ticker, "user_query": query });
            if !items.is_empty() {
                params["item_codes"] = json!(items);
            }
            ("get_latest_10K_item_summary", params)
        }
        Command::Compare { tickers } => ("run_peer_comparison", json!({ "tickers": tickers })),
        Command::Quote { ticker } => ("get_stock_price", json!({ "ticker": ticker })),
        Command::Statement {
            ticker,
            statement_type,
            periods,
        } => (
            "get_financial_statement",
            json!({
                "ticker": ticker,
                "statement_type": statement_type,
                "periods": periods,
            }),
        ),
        Command::Filings { ticker, form } => {
            let mut params = json!({ "ticker": ticker });
            if let Some(form) = form {
                params["form_type"] = json!(form);
            }
            ("get_latest_filings", params)
        }
        Command::Search { name } => ("search_ticker", json!({ "company_name": name })),
    };

    let result = run_tool(&registry, tool_name, params).await?;
    print_result(tool_name, &result);
    Ok(())
}

/// Build the tool registry over the real providers
fn build_registry() -> Result<ToolRegistry> {
    let config = FilingsConfig::builder()
        .with_env()
        .build()
        .context("Invalid configuration")?;

    let llm = Arc::new(OpenAiClient::from_env().context("Model configuration failed")?);
    let edgar = Arc::new(SecEdgarClient::new(config.sec_user_agent.clone()));
    let market = Arc::new(FinnhubClient::new(config.require_finnhub_key()?));
    let catalog = Arc::new(ItemCatalog::ten_k());

    let statements = Arc::new(StatementService::new(edgar.clone()));
    let summaries = Arc::new(FilingSummaryService::new(
        llm.clone(),
        edgar.clone(),
        catalog,
    ));
    let aggregator = Arc::new(PeerDataAggregator::new(
        market.clone(),
        statements.clone(),
        &config,
    ));
    let comparisons = Arc::new(PeerComparisonService::new(aggregator, llm));
    let memory = Arc::new(MemoryStore::new());

    Ok(register_tools(
        &config,
        edgar,
        market,
        statements,
        summaries,
        comparisons,
        memory,
    ))
}

async fn run_tool(registry: &ToolRegistry, name: &str, params: Value) -> Result<Value> {
    let tool = registry
        .get(name)
        .with_context(|| format!("Tool {name} is not registered"))?;
    let result = tool
        .execute(params)
        .await
        .with_context(|| format!("Tool {name} failed"))?;
    Ok(result)
}

/// Print the human-facing part of a tool result, falling back to JSON
fn print_result(tool_name: &str, result: &Value) {
    let text = match tool_name {
        "get_latest_10K_item_summary" => result["summary"].as_str(),
        "run_peer_comparison" => result["comparison"].as_str(),
        "get_financial_statement" => result["table"].as_str(),
        _ => None,
    };
    match text {
        Some(text) => println!("{text}"),
        None => println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
        ),
    }
}
