//! Financial statements from SEC XBRL company facts
//!
//! Builds a wide (periods-as-columns) statement for a requested statement
//! type from the company-facts concept data, then hands it to `reshape`
//! for the long-format presentation. Companies tag the same line item
//! under different us-gaap concepts, so each label carries a preference
//! list of concepts and the first one present wins.

use crate::api::SecEdgarClient;
use crate::error::{FilingsError, Result};
use crate::filing::FormType;
use crate::reshape::{StatementRow, WideRow, WideStatement, reshape};
use async_trait::async_trait;
use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

#[cfg(test)]
use mockall::automock;

/// Which financial statement to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    Income,
    BalanceSheet,
    Cashflow,
}

impl StatementType {
    /// Parse the tool-facing string form
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(StatementType::Income),
            "balance_sheet" => Ok(StatementType::BalanceSheet),
            "cashflow" => Ok(StatementType::Cashflow),
            other => Err(FilingsError::Api(format!(
                "Unsupported statement type: {other}. Use income, balance_sheet, or cashflow"
            ))),
        }
    }
}

/// (label, concept preference list) per statement line item
type ConceptTable = &'static [(&'static str, &'static [&'static str])];

const INCOME_CONCEPTS: ConceptTable = &[
    (
        "Revenue",
        &[
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "Revenues",
            "SalesRevenueNet",
        ],
    ),
    ("Cost of Revenue", &["CostOfRevenue", "CostOfGoodsAndServicesSold"]),
    ("Gross Profit", &["GrossProfit"]),
    ("Operating Income", &["OperatingIncomeLoss"]),
    ("Net Income", &["NetIncomeLoss"]),
    ("Diluted EPS", &["EarningsPerShareDiluted"]),
];

const BALANCE_SHEET_CONCEPTS: ConceptTable = &[
    ("Total Assets", &["Assets"]),
    ("Current Assets", &["AssetsCurrent"]),
    ("Total Liabilities", &["Liabilities"]),
    ("Current Liabilities", &["LiabilitiesCurrent"]),
    ("Stockholders' Equity", &["StockholdersEquity"]),
    (
        "Cash and Equivalents",
        &["CashAndCashEquivalentsAtCarryingValue"],
    ),
];

const CASHFLOW_CONCEPTS: ConceptTable = &[
    (
        "Operating Cash Flow",
        &["NetCashProvidedByUsedInOperatingActivities"],
    ),
    (
        "Investing Cash Flow",
        &["NetCashProvidedByUsedInInvestingActivities"],
    ),
    (
        "Financing Cash Flow",
        &["NetCashProvidedByUsedInFinancingActivities"],
    ),
];

fn concepts_for(statement_type: StatementType) -> ConceptTable {
    match statement_type {
        StatementType::Income => INCOME_CONCEPTS,
        StatementType::BalanceSheet => BALANCE_SHEET_CONCEPTS,
        StatementType::Cashflow => CASHFLOW_CONCEPTS,
    }
}

/// Source of reshaped financial statements
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Fetch and reshape one statement for a ticker
    async fn financial_statement(
        &self,
        ticker: &str,
        form: FormType,
        statement_type: StatementType,
        periods: usize,
    ) -> Result<Vec<StatementRow>>;
}

/// Builds long-format statements backed by SEC company facts
pub struct StatementService {
    edgar: Arc<SecEdgarClient>,
}

impl StatementService {
    /// Create a new statement service
    pub fn new(edgar: Arc<SecEdgarClient>) -> Self {
        Self { edgar }
    }
}

#[async_trait]
impl StatementSource for StatementService {
    /// `periods` limits the output to the most recent fiscal periods.
    #[instrument(skip(self))]
    async fn financial_statement(
        &self,
        ticker: &str,
        form: FormType,
        statement_type: StatementType,
        periods: usize,
    ) -> Result<Vec<StatementRow>> {
        let facts = self.edgar.get_company_facts(ticker).await?;
        let us_gaap = facts.facts.us_gaap.as_ref().ok_or_else(|| {
            FilingsError::Api(format!("No US-GAAP data available for {ticker}"))
        })?;

        let wide = build_wide_statement(us_gaap, statement_type, form, periods);
        if wide.periods.is_empty() {
            return Err(FilingsError::Api(format!(
                "No {} periods found for {ticker}",
                form.as_str()
            )));
        }
        Ok(reshape(&wide))
    }
}

/// Build the wide table for a statement type from us-gaap concept data
fn build_wide_statement(
    us_gaap: &Value,
    statement_type: StatementType,
    form: FormType,
    periods_limit: usize,
) -> WideStatement {
    let mut series: Vec<(&'static str, String, BTreeMap<String, f64>)> = Vec::new();
    for &(label, concepts) in concepts_for(statement_type) {
        if let Some((concept, values)) = extract_series(us_gaap, concepts, form) {
            series.push((label, concept, values));
        }
    }

    // Union of reported period-end dates, most recent `periods_limit`
    let mut all_periods: Vec<String> = series
        .iter()
        .flat_map(|(_, _, values)| values.keys().cloned())
        .collect();
    all_periods.sort();
    all_periods.dedup();
    let periods: Vec<String> = all_periods
        .into_iter()
        .rev()
        .take(periods_limit)
        .rev()
        .collect();

    let rows = series
        .into_iter()
        .map(|(label, concept, values)| WideRow {
            label: label.to_string(),
            concept: Some(format!("us-gaap:{concept}")),
            amounts: periods.iter().map(|p| values.get(p).copied()).collect(),
        })
        .collect();

    WideStatement { periods, rows }
}

/// Extract a period-end -> value series for the first concept present
///
/// Values are filtered to entries reported on the requested form; when a
/// period is restated in a later filing, the latest filed value wins.
fn extract_series(
    us_gaap: &Value,
    concepts: &[&str],
    form: FormType,
) -> Option<(String, BTreeMap<String, f64>)> {
    for &concept in concepts {
        let Some(units) = us_gaap.get(concept).and_then(|c| c.get("units")) else {
            continue;
        };
        let entries = units
            .get("USD")
            .or_else(|| units.get("USD/shares"))
            .and_then(|u| u.as_array());
        let Some(entries) = entries else {
            continue;
        };

        let mut values: BTreeMap<String, f64> = BTreeMap::new();
        let mut filed_dates: BTreeMap<String, String> = BTreeMap::new();
        for entry in entries {
            let entry_form = entry.get("form").and_then(|f| f.as_str());
            if entry_form != Some(form.as_str()) {
                continue;
            }
            let (Some(end), Some(val)) = (
                entry.get("end").and_then(|e| e.as_str()),
                entry.get("val").and_then(|v| v.as_f64()),
            ) else {
                continue;
            };
            let filed = entry.get("filed").and_then(|f| f.as_str()).unwrap_or("");

            let newer = filed_dates
                .get(end)
                .is_none_or(|previous| filed >= previous.as_str());
            if newer {
                values.insert(end.to_string(), val);
                filed_dates.insert(end.to_string(), filed.to_string());
            }
        }

        if !values.is_empty() {
            return Some((concept.to_string(), values));
        }
    }
    None
}

/// Render long-format rows as a markdown-style table
pub fn render_statement_table(rows: &[StatementRow]) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(vec!["label", "fiscal_date", "amount"]);
    for row in rows {
        let amount = row.amount.map_or_else(String::new, format_amount);
        table.add_row(vec![row.label.clone(), row.fiscal_date.clone(), amount]);
    }
    table.to_string()
}

/// Thousands-separated amount, fractional values kept for per-share data
fn format_amount(value: f64) -> String {
    if value.fract().abs() > f64::EPSILON && value.abs() < 1000.0 {
        return format!("{value:.2}");
    }
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    let digits = whole.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn us_gaap_fixture() -> Value {
        json!({
            "RevenueFromContractWithCustomerExcludingAssessedTax": {
                "units": {
                    "USD": [
                        {"end": "2023-08-31", "val": 15540000000.0, "form": "10-K", "filed": "2023-10-06"},
                        {"end": "2024-08-29", "val": 25111000000.0, "form": "10-K", "filed": "2024-10-04"},
                        {"end": "2024-08-29", "val": 25100000000.0, "form": "10-Q", "filed": "2024-12-18"}
                    ]
                }
            },
            "NetIncomeLoss": {
                "units": {
                    "USD": [
                        {"end": "2023-08-31", "val": -5833000000.0, "form": "10-K", "filed": "2023-10-06"},
                        {"end": "2024-08-29", "val": 778000000.0, "form": "10-K", "filed": "2024-10-04"}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_extract_series_filters_by_form_and_prefers_latest_filed() {
        let us_gaap = us_gaap_fixture();
        let (concept, values) = extract_series(
            &us_gaap,
            &["RevenueFromContractWithCustomerExcludingAssessedTax", "Revenues"],
            FormType::TenK,
        )
        .unwrap();

        assert_eq!(concept, "RevenueFromContractWithCustomerExcludingAssessedTax");
        assert_eq!(values.len(), 2);
        // The 10-Q restatement of the same period is excluded by form
        assert_eq!(values["2024-08-29"], 25111000000.0);
    }

    #[test]
    fn test_build_wide_statement_limits_periods() {
        let us_gaap = us_gaap_fixture();
        let wide = build_wide_statement(&us_gaap, StatementType::Income, FormType::TenK, 1);

        assert_eq!(wide.periods, vec!["2024-08-29".to_string()]);
        // Only concepts present in facts produce rows
        assert_eq!(wide.rows.len(), 2);
        assert_eq!(wide.rows[0].label, "Revenue");
        assert_eq!(wide.rows[0].amounts, vec![Some(25111000000.0)]);
    }

    #[test]
    fn test_reshaped_output_sorted() {
        let us_gaap = us_gaap_fixture();
        let wide = build_wide_statement(&us_gaap, StatementType::Income, FormType::TenK, 2);
        let rows = reshape(&wide);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].label, "Net Income");
        assert_eq!(rows[0].fiscal_date, "2023-08-31");
        assert_eq!(rows[3].label, "Revenue");
    }

    #[test]
    fn test_statement_type_parse() {
        assert_eq!(StatementType::parse("income").unwrap(), StatementType::Income);
        assert_eq!(
            StatementType::parse("Balance_Sheet").unwrap(),
            StatementType::BalanceSheet
        );
        assert!(StatementType::parse("equity").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(25111000000.0), "25,111,000,000");
        assert_eq!(format_amount(-5833000000.0), "-5,833,000,000");
        assert_eq!(format_amount(1.18), "1.18");
    }

    #[test]
    fn test_render_statement_table() {
        let rows = vec![StatementRow {
            label: "Revenue".to_string(),
            concept: Some("us-gaap:Revenues".to_string()),
            fiscal_date: "2024-08-29".to_string(),
            amount: Some(25111000000.0),
        }];
        let table = render_statement_table(&rows);
        assert!(table.contains("Revenue"));
        assert!(table.contains("2024-08-29"));
        assert!(table.contains("25,111,000,000"));
    }
}
