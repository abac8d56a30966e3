//! Tool trait definition

use async_trait::async_trait;
use finagent_core::Result;
use serde_json::Value;

/// Trait for callable tools exposed to a conversational agent
///
/// Each pipeline entry point is wrapped as a tool with a name, a free-text
/// description (its documentation for the agent), and a JSON schema for its
/// input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the agent understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// Describes the parameters this tool expects.
    fn input_schema(&self) -> Value;
}
