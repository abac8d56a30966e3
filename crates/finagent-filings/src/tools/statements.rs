//! Financial statement tool

use super::decode_params;
use crate::filing::FormType;
use crate::statements::{StatementService, StatementSource, StatementType, render_statement_table};
use async_trait::async_trait;
use finagent_core::Result as AgentResult;
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_PERIODS: usize = 3;

/// Fetches one financial statement in long format
pub struct FinancialStatementTool {
    statements: Arc<StatementService>,
}

#[derive(Debug, Deserialize)]
struct StatementParams {
    ticker: String,
    statement_type: String,
    #[serde(default = "default_form")]
    form_type: String,
    #[serde(default = "default_periods")]
    periods: usize,
}

fn default_form() -> String {
    "10-K".to_string()
}

fn default_periods() -> usize {
    DEFAULT_PERIODS
}

impl FinancialStatementTool {
    /// Create a new financial statement tool
    pub fn new(statements: Arc<StatementService>) -> Self {
        Self { statements }
    }
}

#[async_trait]
impl Tool for FinancialStatementTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StatementParams = decode_params(params)?;
        let statement_type = StatementType::parse(&params.statement_type)?;
        let form = FormType::parse(&params.form_type)?;
        let rows = self
            .statements
            .financial_statement(&params.ticker, form, statement_type, params.periods)
            .await?;
        let table = render_statement_table(&rows);
        Ok(json!({
            "ticker": params.ticker.to_uppercase(),
            "statement_type": statement_type,
            "rows": rows,
            "table": table,
        }))
    }

    fn name(&self) -> &str {
        "get_financial_statement"
    }

    fn description(&self) -> &str {
        "Get a company's income statement, balance sheet, or cash flow \
         statement from SEC XBRL data, reshaped to one row per line item \
         and fiscal period and sorted by label then date."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol"
                },
                "statement_type": {
                    "type": "string",
                    "description": "Which statement to fetch",
                    "enum": ["income", "balance_sheet", "cashflow"]
                },
                "form_type": {
                    "type": "string",
                    "description": "Source filing form",
                    "enum": ["10-K", "10-Q"],
                    "default": "10-K"
                },
                "periods": {
                    "type": "integer",
                    "description": "Number of most recent fiscal periods",
                    "default": DEFAULT_PERIODS
                }
            },
            "required": ["ticker", "statement_type"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params: StatementParams = serde_json::from_value(json!({
            "ticker": "MU",
            "statement_type": "income"
        }))
        .unwrap();
        assert_eq!(params.form_type, "10-K");
        assert_eq!(params.periods, DEFAULT_PERIODS);
    }

    #[test]
    fn test_unknown_statement_type_is_rejected() {
        assert!(StatementType::parse("equity_rollforward").is_err());
    }
}
