//! Maps free-text queries to relevant filing sections
//!
//! One structured model call per query. The output schema enumerates the
//! legal item codes, which turns an open-ended generation into a closed
//! selection problem; the returned strings are still re-validated against
//! the catalog because the model is not guaranteed to honor the contract.

use crate::catalog::{ItemCatalog, ItemCode};
use crate::error::Result;
use crate::schemas::InferredItemCodes;
use finagent_llm::{LlmClient, complete_structured};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

const SCHEMA_NAME: &str = "inferred_item_codes";

/// Infers relevant 10-K items from a user query
pub struct ItemResolver {
    llm: Arc<dyn LlmClient>,
    catalog: Arc<ItemCatalog>,
}

impl ItemResolver {
    /// Create a new resolver
    pub fn new(llm: Arc<dyn LlmClient>, catalog: Arc<ItemCatalog>) -> Self {
        Self { llm, catalog }
    }

    /// Infer which item codes are relevant to `query`
    ///
    /// Fails with `SchemaConformance` if the model returns a code outside
    /// the catalog; no retry is attempted on malformed output.
    #[instrument(skip(self))]
    pub async fn infer_relevant_items(&self, query: &str) -> Result<Vec<ItemCode>> {
        let prompt = self.build_prompt(query);
        let inferred: InferredItemCodes =
            complete_structured(self.llm.as_ref(), &prompt, SCHEMA_NAME, self.schema()).await?;

        let mut codes = Vec::with_capacity(inferred.item_codes.len());
        for raw in &inferred.item_codes {
            let code =
                self.catalog
                    .parse(raw)
                    .map_err(|_| finagent_llm::LlmError::SchemaConformance {
                        schema: SCHEMA_NAME.to_string(),
                        detail: format!("model returned code outside the catalog: `{raw}`"),
                    })?;
            codes.push(code);
        }

        debug!(?codes, "Resolved relevant items");
        Ok(codes)
    }

    fn build_prompt(&self, query: &str) -> String {
        let item_list = self
            .catalog
            .descriptions()
            .iter()
            .map(|(code, desc)| format!("{code}: {desc}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are a smart assistant that maps user questions to relevant items \
             from a 10-K filing.\n\n\
             Question: \"{query}\"\n\n\
             Choose one or more relevant items from the list below based on the \
             topic of the question.\n\n\
             Available Items:\n{item_list}"
        )
    }

    /// JSON schema for the structured call, item codes enumerated
    fn schema(&self) -> Value {
        let allowed: Vec<&str> = ItemCode::ALL.iter().map(ItemCode::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "item_codes": {
                    "type": "array",
                    "items": { "type": "string", "enum": allowed },
                    "description": "List of relevant 10-K item codes like ['ITEM 1A', 'ITEM 7A']"
                }
            },
            "required": ["item_codes"],
            "additionalProperties": false
        })
    }
}
