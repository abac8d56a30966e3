//! Shared test doubles for pipeline tests

use async_trait::async_trait;
use finagent_llm::{LlmClient, LlmError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Model double replaying queued responses and recording prompts
pub(crate) struct ScriptedLlm {
    text_responses: Mutex<VecDeque<String>>,
    json_responses: Mutex<VecDeque<Value>>,
    pub text_prompts: Mutex<Vec<String>>,
    pub json_prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            text_responses: Mutex::new(VecDeque::new()),
            json_responses: Mutex::new(VecDeque::new()),
            text_prompts: Mutex::new(Vec::new()),
            json_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_text(&self, response: impl Into<String>) {
        self.text_responses.lock().unwrap().push_back(response.into());
    }

    pub fn push_json(&self, response: Value) {
        self.json_responses.lock().unwrap().push_back(response);
    }

    pub fn text_calls(&self) -> usize {
        self.text_prompts.lock().unwrap().len()
    }

    pub fn json_calls(&self) -> usize {
        self.json_prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> finagent_llm::Result<String> {
        self.text_prompts.lock().unwrap().push(prompt.to_string());
        self.text_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::RequestFailed("unexpected completion call".to_string()))
    }

    async fn complete_json(
        &self,
        prompt: &str,
        _schema_name: &str,
        _schema: Value,
    ) -> finagent_llm::Result<Value> {
        self.json_prompts.lock().unwrap().push(prompt.to_string());
        self.json_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::RequestFailed("unexpected structured call".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
