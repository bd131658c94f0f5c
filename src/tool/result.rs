// ABOUTME: Defines the ToolResult type - a unified structure for tool
// ABOUTME: execution outcomes with content, error state, and metadata.

use std::collections::HashMap;

use serde::Serialize;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Name of the tool that produced this result.
    pub tool_name: String,

    /// The output content (JSON payload or error message).
    pub content: String,

    /// Whether this result represents an error.
    pub is_error: bool,

    /// Optional metadata about the execution.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tool_name: String::new(),
            content: content.into(),
            is_error: false,
            metadata: HashMap::new(),
        }
    }

    /// Create a successful result whose content is `payload` serialized as JSON.
    pub fn json(payload: &impl Serialize) -> Self {
        match serde_json::to_string(payload) {
            Ok(content) => Self::text(content),
            Err(e) => Self::error(format!("Failed to serialize tool output: {}", e)),
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tool_name: String::new(),
            content: message.into(),
            is_error: true,
            metadata: HashMap::new(),
        }
    }

    /// Attribute the result to a tool.
    pub fn for_tool(mut self, name: impl Into<String>) -> Self {
        self.tool_name = name.into();
        self
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }

    pub fn success(&self) -> bool {
        !self.is_error
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text("")
    }
}
