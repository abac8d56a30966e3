//! SEC EDGAR API client for fetching company filings and section text
//!
//! SEC EDGAR is the Electronic Data Gathering, Analysis, and Retrieval
//! system used by the U.S. Securities and Exchange Commission.
//!
//! Rate limit: 10 requests per second (as per SEC fair access policy)
//! User-Agent requirement: Must include company name and contact email

use crate::catalog::ItemCode;
use crate::error::{FilingsError, Result};
use crate::filing::{FilingDocument, FilingProvider, FormType};
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC filing metadata, one entry of a company's filing history
#[derive(Debug, Clone, serde::Serialize)]
pub struct SecFiling {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// Filing type (10-K, 10-Q, 8-K, etc.)
    pub form_type: String,
    /// Filing date
    pub filing_date: String,
    /// Report date (period covered)
    pub report_date: Option<String>,
    /// Primary document filename
    pub primary_document: String,
}

impl SecFiling {
    /// One-line presentation used by the filing-list tool
    pub fn describe(&self) -> String {
        match &self.report_date {
            Some(report) => format!(
                "{} filed {} (period {}, accession {})",
                self.form_type, self.filing_date, report, self.accession_number
            ),
            None => format!(
                "{} filed {} (accession {})",
                self.form_type, self.filing_date, self.accession_number
            ),
        }
    }
}

/// SEC submissions response (reduced to the fields we consume)
#[derive(Debug, Deserialize)]
struct CompanySubmissions {
    filings: FilingsData,
}

#[derive(Debug, Deserialize)]
struct FilingsData {
    recent: RecentFilings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    accession_number: Vec<String>,
    filing_date: Vec<String>,
    report_date: Vec<Option<String>>,
    form: Vec<String>,
    primary_document: Vec<String>,
}

impl RecentFilings {
    /// Assemble one filing from the parallel column arrays
    ///
    /// SEC serves filing history as columns of equal length; a response
    /// where the columns disagree is malformed and surfaces as an error
    /// instead of an out-of-bounds panic.
    fn filing_at(&self, idx: usize) -> Result<SecFiling> {
        let missing = |column: &str| {
            FilingsError::Api(format!(
                "Malformed SEC submissions response: column '{column}' has no entry {idx}"
            ))
        };
        Ok(SecFiling {
            accession_number: self
                .accession_number
                .get(idx)
                .ok_or_else(|| missing("accessionNumber"))?
                .clone(),
            form_type: self.form.get(idx).ok_or_else(|| missing("form"))?.clone(),
            filing_date: self
                .filing_date
                .get(idx)
                .ok_or_else(|| missing("filingDate"))?
                .clone(),
            report_date: self
                .report_date
                .get(idx)
                .ok_or_else(|| missing("reportDate"))?
                .clone(),
            primary_document: self
                .primary_document
                .get(idx)
                .ok_or_else(|| missing("primaryDocument"))?
                .clone(),
        })
    }
}

/// Company facts response (XBRL financial data)
#[derive(Debug, Deserialize)]
pub struct CompanyFacts {
    #[serde(rename = "entityName")]
    pub entity_name: String,
    pub facts: Facts,
}

#[derive(Debug, Deserialize)]
pub struct Facts {
    #[serde(rename = "us-gaap", default)]
    pub us_gaap: Option<serde_json::Value>,
}

/// SEC EDGAR API client
pub struct SecEdgarClient {
    client: Client,
    user_agent: String,
    rate_limiter: SharedRateLimiter,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// # Arguments
    /// * `user_agent` - Identity string including contact email, required
    ///   by the SEC fair access policy
    pub fn new(user_agent: impl Into<String>) -> Self {
        // SEC allows 10 requests per second
        let quota = Quota::per_second(NonZeroU32::new(10).expect("nonzero"));
        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create from environment
    ///
    /// Uses `SEC_IDENTITY` or falls back to a default identity.
    pub fn from_env() -> Self {
        let user_agent = std::env::var("SEC_IDENTITY")
            .unwrap_or_else(|_| "finagent (finagent@example.com)".to_string());
        Self::new(user_agent)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FilingsError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FilingsError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::Api(format!("Failed to parse SEC response: {e}")))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FilingsError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FilingsError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FilingsError::Api(format!("Failed to read SEC response: {e}")))
    }

    /// Get CIK number from stock ticker
    #[instrument(skip(self))]
    pub async fn get_cik(&self, ticker: &str) -> Result<String> {
        let data: serde_json::Value = self.get_json(SEC_COMPANY_TICKERS_URL).await?;

        let ticker_upper = ticker.to_uppercase();
        if let Some(companies) = data.as_object() {
            for company in companies.values() {
                let matches = company
                    .get("ticker")
                    .and_then(|t| t.as_str())
                    .is_some_and(|t| t.to_uppercase() == ticker_upper);
                if matches {
                    // cik_str arrives as a bare number
                    if let Some(cik) = company.get("cik_str") {
                        if let Some(n) = cik.as_u64() {
                            return Ok(n.to_string());
                        }
                        if let Some(s) = cik.as_str() {
                            return Ok(s.to_string());
                        }
                    }
                }
            }
        }

        Err(FilingsError::Api(format!(
            "Ticker {ticker} not found in SEC company list"
        )))
    }

    /// Get list of recent filings for a company
    #[instrument(skip(self))]
    pub async fn get_filings(
        &self,
        ticker: &str,
        form_type: Option<FormType>,
        limit: usize,
    ) -> Result<Vec<SecFiling>> {
        let cik = self.get_cik(ticker).await?;
        let submissions = self.get_company_submissions(&cik).await?;
        let recent = &submissions.filings.recent;

        let mut filings = Vec::new();
        for (i, form) in recent.form.iter().enumerate() {
            if let Some(ft) = form_type {
                if form != ft.as_str() {
                    continue;
                }
            }

            filings.push(recent.filing_at(i)?);

            if filings.len() >= limit {
                break;
            }
        }

        Ok(filings)
    }

    /// Get company facts (XBRL financial data) for a ticker
    #[instrument(skip(self))]
    pub async fn get_company_facts(&self, ticker: &str) -> Result<CompanyFacts> {
        let cik = self.get_cik(ticker).await?;
        let cik_padded = pad_cik(&cik);
        let url = format!("{SEC_BASE_URL}/api/xbrl/companyfacts/CIK{cik_padded}.json");
        self.get_json(&url).await
    }

    async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let cik_padded = pad_cik(cik);
        let url = format!("{SEC_BASE_URL}/submissions/CIK{cik_padded}.json");
        self.get_json(&url).await
    }

    /// Fetch the primary document of a filing and split it into items
    async fn fetch_document(
        &self,
        ticker: &str,
        cik: &str,
        filing: &SecFiling,
        form: FormType,
    ) -> Result<FilingDocument> {
        let accession_flat = filing.accession_number.replace('-', "");
        let cik_bare = cik.trim_start_matches('0');
        let url = format!(
            "{SEC_ARCHIVES_URL}/{cik_bare}/{accession_flat}/{}",
            filing.primary_document
        );

        debug!(%url, "Fetching filing primary document");
        let html = self.get_text(&url).await?;
        let text = html_to_text(&html);
        let sections = split_items(&text);

        let filing_date = NaiveDate::parse_from_str(&filing.filing_date, "%Y-%m-%d")
            .map_err(|e| FilingsError::Api(format!("Bad filing date from SEC: {e}")))?;

        Ok(FilingDocument::new(
            ticker.to_uppercase(),
            form,
            filing_date,
            filing.accession_number.clone(),
            sections,
        ))
    }
}

#[async_trait]
impl FilingProvider for SecEdgarClient {
    #[instrument(skip(self))]
    async fn latest_filing(&self, ticker: &str, form: FormType) -> Result<FilingDocument> {
        let cik = self.get_cik(ticker).await?;
        let submissions = self.get_company_submissions(&cik).await?;
        let recent = &submissions.filings.recent;

        let idx = recent
            .form
            .iter()
            .position(|f| f == form.as_str())
            .ok_or_else(|| FilingsError::NoFilingFound {
                ticker: ticker.to_uppercase(),
                form: form.to_string(),
            })?;

        let filing = recent.filing_at(idx)?;

        self.fetch_document(ticker, &cik, &filing, form).await
    }
}

/// Zero-pad a CIK to the 10 digits SEC URLs expect
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim_start_matches('0'))
}

/// Render a bare CIK in the canonical `CIK##########` form
pub fn format_cik(cik: &str) -> String {
    format!("CIK{}", pad_cik(cik))
}

/// Strip tags and decode common entities from a filing HTML document
fn html_to_text(html: &str) -> String {
    // Drop script/style bodies before stripping tags
    let scripts = Regex::new(r"(?is)<(script|style)\b.*?</(script|style)>").expect("valid regex");
    let without_scripts = scripts.replace_all(html, " ");

    // Block-level closers become line breaks so item headings stay on
    // their own lines
    let breaks = Regex::new(r"(?i)</(p|div|tr|table|h[1-6])>|<br\s*/?>").expect("valid regex");
    let with_breaks = breaks.replace_all(&without_scripts, "\n");

    let tags = Regex::new(r"(?s)<[^>]*>").expect("valid regex");
    let without_tags = tags.replace_all(&with_breaks, " ");

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#8217;", "'")
        .replace("&#8220;", "\"")
        .replace("&#8221;", "\"");

    // Collapse horizontal whitespace per line, keep line structure
    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split plain filing text into per-item sections
///
/// Headings are matched at line starts. Filings repeat each heading in the
/// table of contents before the section body, so for duplicate headings
/// the later occurrence wins.
fn split_items(text: &str) -> BTreeMap<ItemCode, String> {
    let heading =
        Regex::new(r"(?im)^item\s+(\d{1,2}[ABC]?)\s*[.:\u{2013}\u{2014}-]?\s").expect("valid regex");

    // (byte offset, code) for every heading occurrence; last one per code
    // is assumed to start the real section body
    let mut starts: BTreeMap<ItemCode, usize> = BTreeMap::new();
    let mut occurrences: Vec<(usize, ItemCode)> = Vec::new();
    for caps in heading.captures_iter(text) {
        let whole = caps.get(0).expect("match");
        let number = caps.get(1).expect("group").as_str();
        if let Ok(code) = format!("ITEM {number}").parse::<ItemCode>() {
            occurrences.push((whole.start(), code));
            starts.insert(code, whole.start());
        }
    }

    let mut sections = BTreeMap::new();
    for (&code, &start) in &starts {
        // Section runs until the next heading occurrence after it
        let end = occurrences
            .iter()
            .map(|&(offset, _)| offset)
            .filter(|&offset| offset > start)
            .min()
            .unwrap_or(text.len());
        let body = text[start..end].trim();
        if !body.is_empty() {
            sections.insert(code, body.to_string());
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_and_format_cik() {
        assert_eq!(pad_cik("1730168"), "0001730168");
        assert_eq!(pad_cik("0001730168"), "0001730168");
        assert_eq!(format_cik("1730168"), "CIK0001730168");
    }

    #[test]
    fn test_html_to_text_strips_markup() {
        let html = "<html><head><style>p { color: red; }</style></head>\
                    <body><p>Item&nbsp;1A. Risk Factors</p><p>Chip   demand</p></body></html>";
        let text = html_to_text(html);
        assert_eq!(text, "Item 1A. Risk Factors\nChip demand");
    }

    #[test]
    fn test_split_items_segments_in_order() {
        let text = "Item 1. Business\nWe make memory chips.\n\
                    Item 1A. Risk Factors\nDemand is cyclical.\n\
                    Item 2. Properties\nFabs in Boise.";
        let sections = split_items(text);

        assert_eq!(sections.len(), 3);
        assert!(sections[&ItemCode::Item1].contains("memory chips"));
        assert!(sections[&ItemCode::Item1A].contains("cyclical"));
        assert!(sections[&ItemCode::Item2].contains("Boise"));
        // Section body stops at the next heading
        assert!(!sections[&ItemCode::Item1].contains("cyclical"));
    }

    #[test]
    fn test_split_items_prefers_body_over_table_of_contents() {
        let text = "Item 1. Business 3\nItem 1A. Risk Factors 12\n\
                    Item 1. Business\nWe make memory chips.\n\
                    Item 1A. Risk Factors\nDemand is cyclical.";
        let sections = split_items(text);

        assert!(sections[&ItemCode::Item1].contains("memory chips"));
        assert!(sections[&ItemCode::Item1A].contains("cyclical"));
    }

    #[test]
    fn test_submissions_deserialization() {
        let raw = r#"{
            "filings": {
                "recent": {
                    "accessionNumber": ["0001730168-24-000123"],
                    "filingDate": ["2024-10-04"],
                    "reportDate": ["2024-08-29"],
                    "form": ["10-K"],
                    "primaryDocument": ["mu-10k.htm"]
                }
            }
        }"#;

        let submissions: CompanySubmissions = serde_json::from_str(raw).unwrap();
        let recent = &submissions.filings.recent;
        assert_eq!(recent.form[0], "10-K");
        assert_eq!(recent.report_date[0].as_deref(), Some("2024-08-29"));
    }

    #[test]
    fn test_inconsistent_submission_columns_are_an_error() {
        // Second form entry has no matching accession number
        let raw = r#"{
            "filings": {
                "recent": {
                    "accessionNumber": ["0001730168-24-000123"],
                    "filingDate": ["2024-10-04", "2024-06-28"],
                    "reportDate": ["2024-08-29", "2024-05-30"],
                    "form": ["8-K", "10-K"],
                    "primaryDocument": ["mu-8k.htm", "mu-10k.htm"]
                }
            }
        }"#;

        let submissions: CompanySubmissions = serde_json::from_str(raw).unwrap();
        let recent = &submissions.filings.recent;

        let idx = recent.form.iter().position(|f| f == "10-K").unwrap();
        let err = recent.filing_at(idx).unwrap_err();
        match err {
            FilingsError::Api(msg) => assert!(msg.contains("accessionNumber")),
            other => panic!("Expected Api error, got {other:?}"),
        }

        assert!(recent.filing_at(0).is_ok());
    }

    #[test]
    fn test_filing_describe() {
        let filing = SecFiling {
            accession_number: "0001730168-24-000123".to_string(),
            form_type: "10-K".to_string(),
            filing_date: "2024-10-04".to_string(),
            report_date: Some("2024-08-29".to_string()),
            primary_document: "mu-10k.htm".to_string(),
        };
        assert_eq!(
            filing.describe(),
            "10-K filed 2024-10-04 (period 2024-08-29, accession 0001730168-24-000123)"
        );
    }
}
