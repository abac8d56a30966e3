//! Peer comparison across a set of tickers
//!
//! Gathers per-ticker market and statement data, then asks the model for
//! one comparative narrative. A failure for one ticker never aborts the
//! comparison: the failing ticker is carried as a typed outcome and the
//! narrative still covers every requested company.

use crate::api::{MarketDataProvider, Quote};
use crate::config::FilingsConfig;
use crate::error::{FilingsError, Result};
use crate::filing::FormType;
use crate::statements::{StatementSource, StatementType, render_statement_table};
use async_trait::async_trait;
use finagent_llm::LlmClient;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[cfg(test)]
use mockall::automock;

/// Everything gathered about one ticker for the comparison
#[derive(Debug, Clone)]
pub struct PeerSnapshot {
    /// Rendered income statement table
    pub income_statement: String,
    /// Rendered balance sheet table
    pub balance_sheet: String,
    /// Latest quote
    pub stock_price: Quote,
    /// Analyst recommendation trends
    pub analyst_ratings: Vec<crate::api::RecommendationTrend>,
    /// Recent EPS surprises
    pub earnings: Vec<crate::api::EarningsSurprise>,
}

/// Result of gathering data for one ticker
#[derive(Debug, Clone)]
pub enum PeerOutcome {
    /// All data sources answered
    Data(Box<PeerSnapshot>),
    /// Gathering failed; reason is shown to the model verbatim
    Failed { reason: String },
}

/// One ticker's gathered data, in request order
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub outcome: PeerOutcome,
}

/// Collaborator producing per-ticker reports for a comparison
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PeerDataSource: Send + Sync {
    /// Gather data for each ticker; one report per input, input order kept
    async fn gather(&self, tickers: &[String]) -> Vec<TickerReport>;
}

/// Gathers quotes, ratings, earnings and statements per ticker
pub struct PeerDataAggregator {
    market: Arc<dyn MarketDataProvider>,
    statements: Arc<dyn StatementSource>,
    earnings_quarters: usize,
    statement_periods: usize,
}

impl PeerDataAggregator {
    /// Create a new aggregator over the given data sources
    ///
    /// Fetch depths come from the configuration: `earnings_quarters` EPS
    /// records and `statement_periods` fiscal periods per statement.
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        statements: Arc<dyn StatementSource>,
        config: &FilingsConfig,
    ) -> Self {
        Self {
            market,
            statements,
            earnings_quarters: config.earnings_quarters,
            statement_periods: config.statement_periods,
        }
    }

    async fn snapshot(&self, ticker: &str) -> Result<PeerSnapshot> {
        let stock_price = self.market.quote(ticker).await?;
        let analyst_ratings = self.market.analyst_ratings(ticker).await?;
        let earnings = self.market.earnings(ticker, self.earnings_quarters).await?;
        let income = self
            .statements
            .financial_statement(
                ticker,
                FormType::TenK,
                StatementType::Income,
                self.statement_periods,
            )
            .await?;
        let balance = self
            .statements
            .financial_statement(
                ticker,
                FormType::TenK,
                StatementType::BalanceSheet,
                self.statement_periods,
            )
            .await?;
        Ok(PeerSnapshot {
            income_statement: render_statement_table(&income),
            balance_sheet: render_statement_table(&balance),
            stock_price,
            analyst_ratings,
            earnings,
        })
    }
}

#[async_trait]
impl PeerDataSource for PeerDataAggregator {
    #[instrument(skip(self))]
    async fn gather(&self, tickers: &[String]) -> Vec<TickerReport> {
        let mut reports = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let outcome = match self.snapshot(ticker).await {
                Ok(snapshot) => PeerOutcome::Data(Box::new(snapshot)),
                Err(err) => {
                    let err = FilingsError::UpstreamData {
                        ticker: ticker.clone(),
                        reason: err.to_string(),
                    };
                    warn!(ticker, error = %err, "Peer data gathering failed");
                    PeerOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            reports.push(TickerReport {
                ticker: ticker.clone(),
                outcome,
            });
        }
        reports
    }
}

/// Turns gathered peer data into one comparative narrative
pub struct PeerComparisonService {
    peers: Arc<dyn PeerDataSource>,
    llm: Arc<dyn LlmClient>,
}

impl PeerComparisonService {
    /// Create a new comparison service
    pub fn new(peers: Arc<dyn PeerDataSource>, llm: Arc<dyn LlmClient>) -> Self {
        Self { peers, llm }
    }

    /// Compare the given companies across the standard rubric
    ///
    /// Tickers with failed data gathering appear in the narrative input as
    /// an error note, so the model can acknowledge the gap instead of
    /// silently dropping the company.
    #[instrument(skip(self))]
    pub async fn run_peer_comparison(&self, tickers: &[String]) -> Result<String> {
        let reports = self.peers.gather(tickers).await;
        let prompt = build_comparison_prompt(&reports);
        debug!(tickers = tickers.len(), "Requesting peer comparison narrative");
        let narrative = self.llm.complete(&prompt).await?;
        Ok(narrative)
    }
}

fn build_comparison_prompt(reports: &[TickerReport]) -> String {
    let mut prompt = String::from(
        "Compare the following companies across:\n\
         - Revenue\n\
         - Cost Structure\n\
         - Profitability\n\
         - Leverage\n\
         - Stock and Valuation\n\n\
         Here is the raw data:\n",
    );
    for report in reports {
        let _ = writeln!(prompt, "\n### {} ###", report.ticker);
        match &report.outcome {
            PeerOutcome::Data(snapshot) => {
                let _ = writeln!(prompt, "Income statement:\n{}", snapshot.income_statement);
                let _ = writeln!(prompt, "Balance sheet:\n{}", snapshot.balance_sheet);
                let quote = &snapshot.stock_price;
                let _ = writeln!(
                    prompt,
                    "Stock price: {} as of {} (open {}, high {}, low {}, previous close {})",
                    quote.current,
                    quote.timestamp_utc(),
                    quote.open,
                    quote.high,
                    quote.low,
                    quote.previous_close,
                );
                for trend in &snapshot.analyst_ratings {
                    let _ = writeln!(
                        prompt,
                        "Analyst ratings {}: strong buy {}, buy {}, hold {}, sell {}, strong sell {}",
                        trend.period,
                        trend.strong_buy,
                        trend.buy,
                        trend.hold,
                        trend.sell,
                        trend.strong_sell,
                    );
                }
                for earnings in &snapshot.earnings {
                    let _ = writeln!(
                        prompt,
                        "Earnings {} Q{}: actual EPS {:?}, estimate {:?}, surprise {:?}%",
                        earnings.period,
                        earnings.quarter,
                        earnings.actual,
                        earnings.estimate,
                        earnings.surprise_percent,
                    );
                }
            }
            PeerOutcome::Failed { reason } => {
                let _ = writeln!(prompt, "Error: {reason}");
            }
        }
    }
    prompt.push_str("\nPlease provide a concise peer comparison.");
    prompt
}
