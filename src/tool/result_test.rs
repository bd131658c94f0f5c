// ABOUTME: Tests for ToolResult - constructors, metadata, attribution.
// ABOUTME: Verifies result structure works correctly.

use super::*;

#[test]
fn test_text_result() {
    let result = ToolResult::text("Hello, world!");
    assert_eq!(result.content, "Hello, world!");
    assert!(result.success());
    assert!(result.metadata.is_empty());
}

#[test]
fn test_error_result() {
    let result = ToolResult::error("Table 'nope' not found");
    assert_eq!(result.content, "Table 'nope' not found");
    assert!(result.is_error);
    assert!(!result.success());
}

#[test]
fn test_json_result() {
    let result = ToolResult::json(&serde_json::json!({"tables": ["users"], "count": 1}));
    assert!(result.success());
    let parsed: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(parsed["count"], 1);
}

#[test]
fn test_for_tool_and_metadata() {
    let result = ToolResult::text("output")
        .for_tool("execute_sql_query")
        .with_metadata("row_count", 3)
        .with_metadata("truncated", false);

    assert_eq!(result.tool_name, "execute_sql_query");
    assert_eq!(result.metadata["row_count"], 3);
    assert_eq!(result.metadata["truncated"], false);
}

#[test]
fn test_default() {
    let result = ToolResult::default();
    assert_eq!(result.content, "");
    assert!(result.success());
}
