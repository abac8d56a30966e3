//! Client profile tools backed by the in-process memory store

use super::decode_params;
use crate::memory::MemoryStore;
use crate::schemas::ClientMemory;
use async_trait::async_trait;
use finagent_core::{Error, Result as AgentResult};
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Saves the client profile under discussion
pub struct SaveClientInfoTool {
    memory: Arc<MemoryStore>,
}

impl SaveClientInfoTool {
    /// Create a new save tool over the shared store
    pub fn new(memory: Arc<MemoryStore>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for SaveClientInfoTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let memory: ClientMemory = decode_params(params)?;
        if memory.tickers.is_empty() {
            return Err(Error::InvalidParameters(
                "tickers must contain at least one symbol".to_string(),
            ));
        }
        let cik = memory.cik.clone();
        self.memory.save(memory);
        Ok(json!({ "saved": true, "cik": cik }))
    }

    fn name(&self) -> &str {
        "save_client_info"
    }

    fn description(&self) -> &str {
        "Save the client company under discussion: CIK, name, tickers, \
         and optionally its comparison peers. Saving again for the same \
         CIK replaces the stored profile."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cik": {
                    "type": "string",
                    "description": "SEC CIK in the CIK########## form"
                },
                "name": {
                    "type": "string",
                    "description": "Company name"
                },
                "tickers": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ticker symbols for the company"
                },
                "peers": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "ticker": { "type": "string" }
                        },
                        "required": ["name", "ticker"]
                    },
                    "description": "Comparison peers, if established"
                }
            },
            "required": ["cik", "name", "tickers"]
        })
    }
}

/// Looks up a saved client profile by CIK
pub struct GetClientInfoTool {
    memory: Arc<MemoryStore>,
}

#[derive(Debug, Deserialize)]
struct GetClientParams {
    cik: String,
}

impl GetClientInfoTool {
    /// Create a new lookup tool over the shared store
    pub fn new(memory: Arc<MemoryStore>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for GetClientInfoTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: GetClientParams = decode_params(params)?;
        match self.memory.get(&params.cik) {
            Some(memory) => Ok(json!({ "found": true, "client": memory })),
            None => Ok(json!({ "found": false, "cik": params.cik })),
        }
    }

    fn name(&self) -> &str {
        "get_client_info"
    }

    fn description(&self) -> &str {
        "Look up a previously saved client profile by CIK. Returns the \
         stored name, tickers, and peers, or found=false when no profile \
         exists for the CIK."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cik": {
                    "type": "string",
                    "description": "SEC CIK in the CIK########## form"
                }
            },
            "required": ["cik"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let save = SaveClientInfoTool::new(store.clone());
        let get = GetClientInfoTool::new(store);

        let saved = save
            .execute(json!({
                "cik": "CIK0000723125",
                "name": "Micron Technology",
                "tickers": ["MU"],
                "peers": [{"name": "Western Digital", "ticker": "WDC"}]
            }))
            .await
            .unwrap();
        assert_eq!(saved["saved"], true);

        let found = get
            .execute(json!({"cik": "CIK0000723125"}))
            .await
            .unwrap();
        assert_eq!(found["found"], true);
        assert_eq!(found["client"]["name"], "Micron Technology");
        assert_eq!(found["client"]["peers"][0]["ticker"], "WDC");
    }

    #[tokio::test]
    async fn test_get_unknown_cik_reports_not_found() {
        let store = Arc::new(MemoryStore::new());
        let get = GetClientInfoTool::new(store);

        let result = get.execute(json!({"cik": "CIK0000000001"})).await.unwrap();
        assert_eq!(result["found"], false);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_tickers() {
        let store = Arc::new(MemoryStore::new());
        let save = SaveClientInfoTool::new(store);

        let err = save
            .execute(json!({
                "cik": "CIK0000723125",
                "name": "Micron Technology",
                "tickers": []
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }
}
