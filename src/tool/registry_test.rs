// ABOUTME: Tests for tool Registry - registration, lookup, dispatch boundary.
// ABOUTME: Uses small in-test tools for success and failure paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;
use crate::error::{SchemaError, ToolError};

/// A simple test tool.
struct EchoTool {
    runs: Arc<AtomicUsize>,
}

impl EchoTool {
    fn new() -> Self {
        Self {
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes input back"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let message = params["message"].as_str().unwrap_or("");
        Ok(ToolResult::text(message))
    }
}

/// A tool whose component always fails.
struct MissingTableTool;

#[async_trait::async_trait]
impl Tool for MissingTableTool {
    fn name(&self) -> &str {
        "lookup"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, ToolError> {
        Err(SchemaError::TableNotFound {
            table: "nope".into(),
            available: vec!["users".into()],
        }
        .into())
    }
}

fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: "call_1".into(),
        name: name.into(),
        arguments,
    }
}

#[tokio::test]
async fn test_register_and_get() {
    let registry = Registry::new();
    registry.register(EchoTool::new()).await;

    let tool = registry.get("echo").await;
    assert!(tool.is_some());
    assert_eq!(tool.unwrap().name(), "echo");
    assert!(registry.get("nonexistent").await.is_none());
}

#[tokio::test]
async fn test_list_and_definitions_sorted() {
    let registry = Registry::new();
    registry.register(MissingTableTool).await;
    registry.register(EchoTool::new()).await;

    assert_eq!(registry.list().await, vec!["echo", "lookup"]);

    let defs = registry.to_definitions().await;
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name, "echo");
    assert_eq!(defs[0].description, "Echoes input back");
    assert_eq!(defs[1].name, "lookup");
}

#[tokio::test]
async fn test_descriptors_carry_output_schema() {
    let registry = Registry::new();
    registry.register(EchoTool::new()).await;

    let descriptors = registry.descriptors().await;
    assert_eq!(descriptors[0].output_schema, json!({"type": "object"}));
    assert_eq!(descriptors[0].input_schema["required"], json!(["message"]));
}

#[tokio::test]
async fn test_dispatch_success() {
    let registry = Registry::new();
    registry.register(EchoTool::new()).await;

    let result = registry.dispatch(&call("echo", json!({"message": "hi"}))).await;
    assert!(result.success());
    assert_eq!(result.content, "hi");
    assert_eq!(result.tool_name, "echo");
}

#[tokio::test]
async fn test_dispatch_unknown_tool_is_error_result() {
    let registry = Registry::new();
    let result = registry.dispatch(&call("drop_everything", json!({}))).await;
    assert!(!result.success());
    assert_eq!(result.content, "Tool not found: drop_everything");
    assert_eq!(result.tool_name, "drop_everything");
}

#[tokio::test]
async fn test_dispatch_invalid_arguments_never_execute() {
    let registry = Registry::new();
    let tool = EchoTool::new();
    let runs = tool.runs.clone();
    registry.register(tool).await;

    let missing = registry.dispatch(&call("echo", json!({}))).await;
    assert!(missing.is_error);
    assert!(missing.content.starts_with("Invalid arguments:"));

    let unparsable = registry.dispatch(&call("echo", json!("{message:"))).await;
    assert!(unparsable.is_error);

    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dispatch_null_arguments_treated_as_empty() {
    let registry = Registry::new();
    registry.register(MissingTableTool).await;

    let result = registry.dispatch(&call("lookup", serde_json::Value::Null)).await;
    // Validation passed; the component error surfaced instead.
    assert!(result.is_error);
    assert_eq!(
        result.content,
        "Table 'nope' not found. Available tables: users"
    );
}

#[tokio::test]
async fn test_clone_shares_state() {
    let registry = Registry::new();
    let clone = registry.clone();

    registry.register(EchoTool::new()).await;
    assert_eq!(clone.count().await, 1);
}
