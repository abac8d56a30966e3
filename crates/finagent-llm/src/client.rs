//! LLM client trait and structured-output decoding

use crate::{LlmError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Trait for language-model clients
///
/// Implementations provide access to a model service. Two call shapes are
/// supported: free-text completion, and completion constrained to a JSON
/// schema for structured extraction.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a free-text completion for a single prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Generate a completion constrained to a JSON schema
    ///
    /// # Arguments
    ///
    /// * `prompt` - The user prompt
    /// * `schema_name` - Identifier for the schema (used in the request and
    ///   in error reporting)
    /// * `schema` - JSON Schema the output must conform to
    ///
    /// # Returns
    ///
    /// The model's JSON output. Callers must still validate the value:
    /// schema enforcement on the provider side is best-effort.
    async fn complete_json(&self, prompt: &str, schema_name: &str, schema: Value)
    -> Result<Value>;

    /// Get the client name (e.g., "openai")
    fn name(&self) -> &str;
}

/// Run a schema-constrained completion and decode the result into `T`
///
/// The decode step is the validation boundary: whatever the provider claims
/// about schema enforcement, output that does not deserialize into `T` is
/// rejected as a `SchemaConformance` error.
pub async fn complete_structured<T: DeserializeOwned>(
    client: &dyn LlmClient,
    prompt: &str,
    schema_name: &str,
    schema: Value,
) -> Result<T> {
    let value = client.complete_json(prompt, schema_name, schema).await?;
    serde_json::from_value(value).map_err(|e| LlmError::SchemaConformance {
        schema: schema_name.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    struct CannedClient {
        response: Value,
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok("canned".to_string())
        }

        async fn complete_json(
            &self,
            _prompt: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> Result<Value> {
            Ok(self.response.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[derive(Debug, Deserialize)]
    struct Extraction {
        codes: Vec<String>,
    }

    #[tokio::test]
    async fn test_structured_decode_ok() {
        let client = CannedClient {
            response: json!({"codes": ["ITEM 1A"]}),
        };
        let out: Extraction =
            complete_structured(&client, "prompt", "extraction", json!({"type": "object"}))
                .await
                .unwrap();
        assert_eq!(out.codes, vec!["ITEM 1A"]);
    }

    #[tokio::test]
    async fn test_structured_decode_rejects_nonconforming_output() {
        let client = CannedClient {
            response: json!({"codes": "ITEM 1A"}),
        };
        let err = complete_structured::<Extraction>(
            &client,
            "prompt",
            "extraction",
            json!({"type": "object"}),
        )
        .await
        .unwrap_err();

        match err {
            LlmError::SchemaConformance { schema, .. } => assert_eq!(schema, "extraction"),
            other => panic!("expected SchemaConformance, got {other:?}"),
        }
    }
}
