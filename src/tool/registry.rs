// ABOUTME: Implements the Registry - a thread-safe container mapping tool names
// ABOUTME: to handlers, and the dispatch boundary that turns every failure into a ToolResult.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{Tool, ToolCall, ToolDescriptor, ToolResult};
use crate::error::ToolError;
use crate::llm::ToolDefinition;

/// A thread-safe registry of tools.
#[derive(Default)]
pub struct Registry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    pub async fn register<T: Tool + 'static>(&self, tool: T) {
        self.register_arc(Arc::new(tool)).await;
    }

    /// Register a tool from an Arc.
    pub async fn register_arc(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().await;
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// List all tool names, sorted alphabetically.
    pub async fn list(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<_> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered tools.
    pub async fn count(&self) -> usize {
        let tools = self.tools.read().await;
        tools.len()
    }

    /// Descriptors of every registered tool, sorted by name.
    pub async fn descriptors(&self) -> Vec<ToolDescriptor> {
        let tools = self.tools.read().await;
        let mut descriptors: Vec<_> = tools.values().map(|t| t.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Convert all tools to LLM tool definitions.
    pub async fn to_definitions(&self) -> Vec<ToolDefinition> {
        self.descriptors()
            .await
            .iter()
            .map(ToolDefinition::from)
            .collect()
    }

    /// Validate and run a tool call. Never fails: unknown tools, bad arguments
    /// and component errors all come back as error results.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let result = match self.get(&call.name).await {
            Some(tool) => Self::run(tool.as_ref(), &call.arguments).await,
            None => Err(ToolError::NotFound(call.name.clone())),
        };

        match result {
            Ok(result) => result.for_tool(&call.name),
            Err(err) => {
                tracing::debug!(tool = %call.name, error = %err, "Tool call failed");
                ToolResult::error(err.to_string()).for_tool(&call.name)
            }
        }
    }

    async fn run(tool: &dyn Tool, arguments: &Value) -> Result<ToolResult, ToolError> {
        let params = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        tool.validate(&params)?;
        tool.execute(params).await
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            tools: Arc::clone(&self.tools),
        }
    }
}
