// ABOUTME: Defines the Tool trait - the core abstraction for agent capabilities.
// ABOUTME: Tools describe themselves, validate their arguments, and execute asynchronously.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolResult;
use crate::error::ToolError;
use crate::llm::ToolDefinition;

/// Immutable description of a tool, registered once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

impl From<&ToolDescriptor> for ToolDefinition {
    fn from(d: &ToolDescriptor) -> Self {
        ToolDefinition {
            name: d.name.clone(),
            description: d.description.clone(),
            input_schema: d.input_schema.clone(),
        }
    }
}

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned id used to key the result back to this call.
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// A tool that can be executed by an agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for the LLM.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> Value;

    /// Returns the JSON Schema of a successful payload.
    fn output_schema(&self) -> Value {
        serde_json::json!({ "type": "object" })
    }

    /// Check arguments against the input schema before execution.
    fn validate(&self, params: &Value) -> Result<(), ToolError> {
        validate_arguments(&self.schema(), params)
    }

    /// Execute the tool with already validated parameters.
    async fn execute(&self, params: Value) -> Result<ToolResult, ToolError>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema(),
            output_schema: self.output_schema(),
        }
    }
}

/// Check `params` against the subset of JSON Schema the tools declare:
/// object type, required fields, primitive property types and
/// `additionalProperties: false`.
pub fn validate_arguments(schema: &Value, params: &Value) -> Result<(), ToolError> {
    let Some(args) = params.as_object() else {
        return Err(ToolError::InvalidArguments(format!(
            "expected a JSON object, got {}",
            json_type(params)
        )));
    };

    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required field '{}'",
                    field
                )));
            }
        }
    }

    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));

    for (key, value) in args {
        let declared = properties.and_then(|p| p.get(key));
        match declared {
            Some(prop) => {
                if let Some(expected) = prop.get("type").and_then(Value::as_str) {
                    if !type_matches(expected, value) {
                        return Err(ToolError::InvalidArguments(format!(
                            "field '{}' must be {}, got {}",
                            key,
                            expected,
                            json_type(value)
                        )));
                    }
                }
            }
            None if closed => {
                return Err(ToolError::InvalidArguments(format!(
                    "unexpected field '{}'",
                    key
                )));
            }
            None => {}
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
