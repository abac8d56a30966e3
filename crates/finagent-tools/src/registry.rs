//! Tool registry for managing available tools

use crate::Tool;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry for managing tools
///
/// Registration order is preserved so the generated catalog is stable.
pub struct ToolRegistry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Re-registering a name replaces the tool but keeps its original
    /// position in the catalog.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut inner = self.inner.write().unwrap();
        let name = tool.name().to_string();
        if !inner.tools.contains_key(&name) {
            inner.order.push(name.clone());
        }
        inner.tools.insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let inner = self.inner.read().unwrap();
        inner.tools.get(name).cloned()
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let inner = self.inner.read().unwrap();
        inner
            .order
            .iter()
            .filter_map(|name| inner.tools.get(name).cloned())
            .collect()
    }

    /// Render the tool catalog as `**name**:\n<description>` blocks
    ///
    /// This is the discovery surface handed to a conversational agent so it
    /// can decide which tool to call.
    pub fn describe(&self) -> String {
        self.list_tools()
            .iter()
            .map(|tool| format!("**{}**:\n{}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().unwrap();
        inner.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finagent_core::Result;
    use serde_json::{Value, json};

    struct NamedTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Tool for NamedTool {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(json!({"ok": true}))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool {
            name: "stock_quote",
            description: "Fetch a quote",
        }));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("stock_quote").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_describe_lists_all_tools_in_order() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool {
            name: "search_ticker",
            description: "Search ticker symbols by company name",
        }));
        registry.register(Arc::new(NamedTool {
            name: "peer_comparison",
            description: "Compare a peer set of companies",
        }));

        let catalog = registry.describe();
        let search_pos = catalog.find("**search_ticker**").unwrap();
        let peer_pos = catalog.find("**peer_comparison**").unwrap();
        assert!(search_pos < peer_pos);
        assert!(catalog.contains("Search ticker symbols by company name"));
    }
}
