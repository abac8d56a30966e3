//! Orchestrates resolver, accessor, and summarizer into one filing report
//!
//! Two entry paths converge on the same fetch-and-summarize loop: item
//! codes supplied explicitly are validated all-or-nothing before any
//! network call; absent codes are inferred from the user query. Accessor
//! and per-item failures are fatal to the whole call; there is no partial
//! result.

use crate::catalog::{ItemCatalog, ItemCode};
use crate::error::{FilingsError, Result};
use crate::filing::{FilingProvider, FormType};
use crate::resolver::ItemResolver;
use crate::schemas::{FilingItemSummary, FilingSummary};
use crate::summarizer::SectionSummarizer;
use finagent_llm::LlmClient;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument};

/// Assembles per-item summaries of the latest 10-K into one report
pub struct FilingSummaryService {
    resolver: ItemResolver,
    summarizer: SectionSummarizer,
    filings: Arc<dyn FilingProvider>,
    catalog: Arc<ItemCatalog>,
}

impl FilingSummaryService {
    /// Create a new service with its collaborators injected
    pub fn new(
        llm: Arc<dyn LlmClient>,
        filings: Arc<dyn FilingProvider>,
        catalog: Arc<ItemCatalog>,
    ) -> Self {
        Self {
            resolver: ItemResolver::new(llm.clone(), catalog.clone()),
            summarizer: SectionSummarizer::new(llm),
            filings,
            catalog,
        }
    }

    /// Summarize relevant items of the latest 10-K for `ticker`
    ///
    /// With `item_codes` absent, the working set is inferred from
    /// `user_query`; with it present, every element is validated against
    /// the catalog before any fetch happens.
    #[instrument(skip(self))]
    pub async fn latest_tenk_item_summary(
        &self,
        user_query: &str,
        ticker: &str,
        item_codes: Option<&[String]>,
    ) -> Result<String> {
        let codes = match item_codes {
            None => self.resolver.infer_relevant_items(user_query).await?,
            Some(explicit) => self.validate_codes(explicit)?,
        };

        info!(?codes, ticker, "Summarizing latest 10-K items");

        let filing = self.filings.latest_filing(ticker, FormType::TenK).await?;

        let mut report = format!("--- Filing: {} ---\n", filing.filing_date);
        for code in codes {
            let meta = self.catalog.get(code);
            let text = filing.section_text(code)?;
            let summary = self
                .summarizer
                .summarize_text(code, meta.title, meta.description, text)
                .await?;
            let _ = write!(
                report,
                "\n === Summary of {code}: {} ===\n{summary}",
                meta.title
            );
        }

        Ok(report.trim().to_string())
    }

    /// Summarize explicit items of the latest 10-K into the typed form
    ///
    /// Uses the structured extraction, so each item carries key-value
    /// facts alongside its narrative summary.
    #[instrument(skip(self))]
    pub async fn structured_summary(
        &self,
        ticker: &str,
        item_codes: &[ItemCode],
    ) -> Result<FilingSummary> {
        let filing = self.filings.latest_filing(ticker, FormType::TenK).await?;

        let mut summaries = Vec::with_capacity(item_codes.len());
        for &code in item_codes {
            let meta = self.catalog.get(code);
            let text = filing.section_text(code)?;
            let extraction = self
                .summarizer
                .extract(code, meta.title, meta.description, text)
                .await?;
            summaries.push(FilingItemSummary {
                item_code: code,
                title: meta.title.to_string(),
                description: meta.description.to_string(),
                summary: extraction.summary,
                key_values: extraction.key_values,
            });
        }

        Ok(FilingSummary {
            ticker: filing.ticker.clone(),
            filing_date: filing.filing_date.to_string(),
            form: filing.form.to_string(),
            filingitemsummaries: summaries,
        })
    }

    /// All-or-nothing validation of an explicit item-code list
    fn validate_codes(&self, explicit: &[String]) -> Result<Vec<ItemCode>> {
        let mut codes = Vec::with_capacity(explicit.len());
        let mut invalid = Vec::new();
        for raw in explicit {
            match self.catalog.parse(raw) {
                Ok(code) => codes.push(code),
                Err(_) => invalid.push(raw.clone()),
            }
        }

        if invalid.is_empty() {
            Ok(codes)
        } else {
            Err(FilingsError::InvalidItemCodes {
                invalid,
                allowed: ItemCode::allowed_list(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filing::{FilingDocument, MockFilingProvider};
    use crate::test_support::ScriptedLlm;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn tenk_document() -> FilingDocument {
        let mut sections = BTreeMap::new();
        sections.insert(ItemCode::Item1, "Business body".to_string());
        sections.insert(ItemCode::Item1A, "Risk factors body".to_string());
        sections.insert(ItemCode::Item7A, "Market risk body".to_string());
        FilingDocument::new(
            "MU",
            FormType::TenK,
            NaiveDate::from_ymd_opt(2024, 10, 4).unwrap(),
            "0001730168-24-000123",
            sections,
        )
    }

    fn service(
        llm: Arc<ScriptedLlm>,
        filings: MockFilingProvider,
    ) -> FilingSummaryService {
        FilingSummaryService::new(llm, Arc::new(filings), Arc::new(ItemCatalog::ten_k()))
    }

    #[tokio::test]
    async fn test_invalid_codes_fail_before_any_call() {
        let llm = Arc::new(ScriptedLlm::new());
        // No expectation on the mock: any accessor call would panic
        let filings = MockFilingProvider::new();
        let service = service(llm.clone(), filings);

        let codes = vec!["ITEM 1A".to_string(), "ITEM 42".to_string()];
        let err = service
            .latest_tenk_item_summary("risks", "MU", Some(&codes))
            .await
            .unwrap_err();

        match err {
            FilingsError::InvalidItemCodes { invalid, allowed } => {
                assert_eq!(invalid, vec!["ITEM 42".to_string()]);
                assert!(allowed.contains("ITEM 1A"));
            }
            other => panic!("expected InvalidItemCodes, got {other:?}"),
        }
        assert_eq!(llm.text_calls(), 0);
        assert_eq!(llm.json_calls(), 0);
    }

    #[tokio::test]
    async fn test_explicit_codes_produce_blocks_in_input_order() {
        let llm = Arc::new(ScriptedLlm::new());
        llm.push_text("Market risk summary.");
        llm.push_text("Risk factors summary.");

        let mut filings = MockFilingProvider::new();
        filings
            .expect_latest_filing()
            .withf(|ticker, form| ticker == "MU" && *form == FormType::TenK)
            .times(1)
            .returning(|_, _| Ok(tenk_document()));

        let service = service(llm.clone(), filings);
        let codes = vec!["ITEM 7A".to_string(), "ITEM 1A".to_string()];
        let report = service
            .latest_tenk_item_summary("", "MU", Some(&codes))
            .await
            .unwrap();

        assert!(report.starts_with("--- Filing: 2024-10-04 ---"));
        let pos_7a = report
            .find("=== Summary of ITEM 7A: Quantitative and Qualitative Disclosures About Market Risk ===")
            .unwrap();
        let pos_1a = report.find("=== Summary of ITEM 1A: Risk Factors ===").unwrap();
        // Input order, not filing order
        assert!(pos_7a < pos_1a);
        assert!(report.contains("Market risk summary."));
        assert_eq!(llm.text_calls(), 2);
    }

    #[tokio::test]
    async fn test_inferred_path_calls_summarizer_once() {
        let llm = Arc::new(ScriptedLlm::new());
        llm.push_json(json!({"item_codes": ["ITEM 1A"]}));
        llm.push_text("Demand is cyclical; FX notional of $2.2B.");

        let mut filings = MockFilingProvider::new();
        filings
            .expect_latest_filing()
            .times(1)
            .returning(|_, _| Ok(tenk_document()));

        let service = service(llm.clone(), filings);
        let report = service
            .latest_tenk_item_summary("what are the main risks", "MU", None)
            .await
            .unwrap();

        assert!(report.contains("Summary of ITEM 1A"));
        assert_eq!(llm.json_calls(), 1);
        assert_eq!(llm.text_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_filing_found_propagates() {
        let llm = Arc::new(ScriptedLlm::new());
        let mut filings = MockFilingProvider::new();
        filings.expect_latest_filing().returning(|ticker, form| {
            Err(FilingsError::NoFilingFound {
                ticker: ticker.to_string(),
                form: form.to_string(),
            })
        });

        let service = service(llm, filings);
        let codes = vec!["ITEM 1".to_string()];
        let err = service
            .latest_tenk_item_summary("", "NEWCO", Some(&codes))
            .await
            .unwrap_err();
        assert!(matches!(err, FilingsError::NoFilingFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_section_is_fatal() {
        let llm = Arc::new(ScriptedLlm::new());
        let mut filings = MockFilingProvider::new();
        filings
            .expect_latest_filing()
            .returning(|_, _| Ok(tenk_document()));

        let service = service(llm, filings);
        let codes = vec!["ITEM 16".to_string()];
        let err = service
            .latest_tenk_item_summary("", "MU", Some(&codes))
            .await
            .unwrap_err();
        assert!(matches!(err, FilingsError::SectionUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_structured_summary_builds_typed_aggregate() {
        let llm = Arc::new(ScriptedLlm::new());
        llm.push_json(json!({
            "summary": "Memory maker with 45,000 employees.",
            "key_values": [{"key": "Number of Employees", "value": "45,000"}]
        }));

        let mut filings = MockFilingProvider::new();
        filings
            .expect_latest_filing()
            .returning(|_, _| Ok(tenk_document()));

        let service = service(llm, filings);
        let summary = service
            .structured_summary("MU", &[ItemCode::Item1])
            .await
            .unwrap();

        assert_eq!(summary.ticker, "MU");
        assert_eq!(summary.form, "10-K");
        assert_eq!(summary.filing_date, "2024-10-04");
        assert_eq!(summary.filingitemsummaries.len(), 1);
        let item = &summary.filingitemsummaries[0];
        assert_eq!(item.item_code, ItemCode::Item1);
        assert_eq!(item.key_values[0].value, "45,000");
    }
}
