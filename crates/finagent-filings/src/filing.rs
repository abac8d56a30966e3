//! Filing accessor seam
//!
//! `FilingProvider` is the injected collaborator that turns (ticker, form)
//! into the most recent filing with its sections split out. The production
//! implementation lives in `api::sec_edgar`; tests substitute a mock.

use crate::catalog::ItemCode;
use crate::error::{FilingsError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
use mockall::automock;

/// SEC form type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report
    #[serde(rename = "10-K")]
    TenK,
    /// Quarterly report
    #[serde(rename = "10-Q")]
    TenQ,
    /// Current report (material events)
    #[serde(rename = "8-K")]
    EightK,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::TenK => "10-K",
            FormType::TenQ => "10-Q",
            FormType::EightK => "8-K",
        }
    }

    /// Parse the SEC form string, e.g. `"10-K"`
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "10-K" => Ok(FormType::TenK),
            "10-Q" => Ok(FormType::TenQ),
            "8-K" => Ok(FormType::EightK),
            other => Err(FilingsError::Api(format!("Unsupported form type: {other}"))),
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fetched filing with its sections split by item code
#[derive(Debug, Clone)]
pub struct FilingDocument {
    /// Ticker the filing was fetched for
    pub ticker: String,
    /// Form type of the filing
    pub form: FormType,
    /// Date the filing was submitted
    pub filing_date: NaiveDate,
    /// SEC accession number
    pub accession_number: String,
    sections: BTreeMap<ItemCode, String>,
}

impl FilingDocument {
    /// Create a filing document from pre-split sections
    pub fn new(
        ticker: impl Into<String>,
        form: FormType,
        filing_date: NaiveDate,
        accession_number: impl Into<String>,
        sections: BTreeMap<ItemCode, String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            form,
            filing_date,
            accession_number: accession_number.into(),
            sections,
        }
    }

    /// Raw text of one section
    ///
    /// Fails with `SectionUnavailable` if the filing does not contain the
    /// section (sparse filings omit reserved or inapplicable items).
    pub fn section_text(&self, code: ItemCode) -> Result<&str> {
        self.sections
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| FilingsError::SectionUnavailable {
                code: code.to_string(),
                ticker: self.ticker.clone(),
                form: self.form.to_string(),
            })
    }

    /// Item codes present in this filing, in filing order
    pub fn available_items(&self) -> impl Iterator<Item = ItemCode> + '_ {
        self.sections.keys().copied()
    }
}

/// Collaborator that fetches filings for a ticker
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// Fetch the single most recent filing of `form` for `ticker`
    ///
    /// Fails with `NoFilingFound` if the company has no filing of that
    /// form.
    async fn latest_filing(&self, ticker: &str, form: FormType) -> Result<FilingDocument>;
}
