//! Wide-to-long reshaping of financial statement tables
//!
//! A statement arrives with one column per fiscal period; presentation
//! wants one row per (label, period) cell. The transformation is pure and
//! total: every cell becomes exactly one output row, nothing is dropped or
//! aggregated, and identical input yields identical output.

use serde::Serialize;

/// One line item of a wide statement, amounts parallel to the period list
#[derive(Debug, Clone)]
pub struct WideRow {
    /// Row label, e.g. `Revenue`
    pub label: String,
    /// Line-item concept code, e.g. `us-gaap:Revenue`, if known
    pub concept: Option<String>,
    /// One amount per fiscal period, in the statement's period order
    pub amounts: Vec<Option<f64>>,
}

/// A financial statement with periods as columns
#[derive(Debug, Clone)]
pub struct WideStatement {
    /// Fiscal periods, one per column; callers must use a sortable
    /// canonical form (ISO dates) or output order is undefined
    pub periods: Vec<String>,
    /// Line items
    pub rows: Vec<WideRow>,
}

/// One cell of the reshaped long-format statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    pub fiscal_date: String,
    pub amount: Option<f64>,
}

/// Reshape a wide statement into long form, sorted by (label, period)
pub fn reshape(statement: &WideStatement) -> Vec<StatementRow> {
    let mut rows: Vec<StatementRow> = statement
        .rows
        .iter()
        .flat_map(|row| {
            statement
                .periods
                .iter()
                .enumerate()
                .map(move |(i, period)| StatementRow {
                    label: row.label.clone(),
                    concept: row.concept.clone(),
                    fiscal_date: period.clone(),
                    amount: row.amounts.get(i).copied().flatten(),
                })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.label
            .cmp(&b.label)
            .then_with(|| a.fiscal_date.cmp(&b.fiscal_date))
    });
    rows
}
