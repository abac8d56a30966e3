//! Summarizes one filing section via the language model
//!
//! Two call shapes: a free-text summary used when assembling report text,
//! and a structured extraction producing a summary plus key-value facts.
//! One outbound model call per invocation; no caching or deduplication of
//! identical inputs.

use crate::catalog::{ItemCode, extraction_hints};
use crate::error::Result;
use crate::schemas::ItemExtraction;
use finagent_llm::{LlmClient, complete_structured};
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::instrument;

const SCHEMA_NAME: &str = "item_extraction";

/// Produces bounded summaries of raw section text
pub struct SectionSummarizer {
    llm: Arc<dyn LlmClient>,
}

impl SectionSummarizer {
    /// Create a new summarizer
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Summarize a section into free text (<= ~100 words)
    ///
    /// Returns the model's raw response; no validation happens at this
    /// layer.
    #[instrument(skip(self, description, item_text), fields(code = %code))]
    pub async fn summarize_text(
        &self,
        code: ItemCode,
        title: &str,
        description: &str,
        item_text: &str,
    ) -> Result<String> {
        let prompt = format!(
            "You are a financial analyst assistant. Read the following text from \
             {title} ({code}) of a 10-K filing. Extract and populate the following \
             structured format:\n\n\
             {description}\n\n\
             - Write a short summary (max 100 words).\n\
             - Remember to include key numerical data.\n\
             TEXT:\n{item_text}"
        );

        Ok(self.llm.complete(&prompt).await?)
    }

    /// Summarize a section into a validated summary + key-value extraction
    #[instrument(skip(self, description, item_text), fields(code = %code))]
    pub async fn extract(
        &self,
        code: ItemCode,
        title: &str,
        description: &str,
        item_text: &str,
    ) -> Result<ItemExtraction> {
        let mut prompt = format!(
            "You are a financial analyst assistant. Read the following text from \
             {title} ({code}) of a 10-K filing.\n\n\
             Section scope: {description}\n\n\
             Produce a short summary (max 100 words) that retains key numerical \
             data, plus key-value facts extracted from the text."
        );

        let hints = extraction_hints(code);
        if !hints.is_empty() {
            let _ = write!(
                prompt,
                "\n\nWhere the text supports it, include these keys: {}.",
                hints.join(", ")
            );
        }

        let _ = write!(prompt, "\n\nTEXT:\n{item_text}");

        Ok(complete_structured(self.llm.as_ref(), &prompt, SCHEMA_NAME, extraction_schema()).await?)
    }
}

fn extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": ["string", "null"],
                "description": "Summary of the item extracted from the filing, max 100 words"
            },
            "key_values": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "key": { "type": "string", "description": "Name of the metric or fact" },
                        "value": { "type": "string", "description": "Value associated with the key" }
                    },
                    "required": ["key", "value"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["summary", "key_values"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingLlm {
        text: String,
        json: Value,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for RecordingLlm {
        async fn complete(&self, prompt: &str) -> finagent_llm::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.text.clone())
        }

        async fn complete_json(
            &self,
            prompt: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> finagent_llm::Result<Value> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.json.clone())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn summarizer(text: &str, json: Value) -> (SectionSummarizer, Arc<RecordingLlm>) {
        let llm = Arc::new(RecordingLlm {
            text: text.to_string(),
            json,
            prompts: Mutex::new(Vec::new()),
        });
        (SectionSummarizer::new(llm.clone()), llm)
    }

    #[tokio::test]
    async fn test_summarize_text_returns_raw_response() {
        let (summarizer, llm) = summarizer("Revenue grew 12% to $25.1B.", json!(null));
        let out = summarizer
            .summarize_text(
                ItemCode::Item7,
                "Management's Discussion and Analysis",
                "Management's narrative on results of operations.",
                "Full MD&A text here",
            )
            .await
            .unwrap();

        assert_eq!(out, "Revenue grew 12% to $25.1B.");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Management's Discussion and Analysis (ITEM 7)"));
        assert!(prompts[0].contains("max 100 words"));
        assert!(prompts[0].contains("Full MD&A text here"));
    }

    #[tokio::test]
    async fn test_extract_decodes_structured_output() {
        let (summarizer, llm) = summarizer(
            "",
            json!({
                "summary": "Workforce of 45,000 across 17 countries.",
                "key_values": [
                    {"key": "Number of Employees", "value": "45,000"}
                ]
            }),
        );

        let extraction = summarizer
            .extract(
                ItemCode::Item1,
                "Business",
                "Overview of operations.",
                "Business section text",
            )
            .await
            .unwrap();

        assert_eq!(
            extraction.summary.as_deref(),
            Some("Workforce of 45,000 across 17 countries.")
        );
        assert_eq!(extraction.key_values[0].key, "Number of Employees");

        // Extraction hints for ITEM 1 are steered into the prompt
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Number of Employees"));
        assert!(prompts[0].contains("Revenue Segments"));
    }

    #[tokio::test]
    async fn test_extract_rejects_nonconforming_output() {
        let (summarizer, _) = summarizer("", json!({"key_values": "not-an-array"}));
        let err = summarizer
            .extract(ItemCode::Item1, "Business", "Overview.", "text")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::FilingsError::Model(finagent_llm::LlmError::SchemaConformance { .. })
        ));
    }
}
