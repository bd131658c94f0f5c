// ABOUTME: GetTableSchemaTool - describes the columns of one table.
// ABOUTME: Unknown tables fail with the list of valid names.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::ToolError;
use crate::schema::SchemaInspector;
use crate::tool::{Tool, ToolResult};

/// Tool for fetching column names, types and keys of a table.
pub struct GetTableSchemaTool {
    inspector: SchemaInspector,
}

impl GetTableSchemaTool {
    pub fn new(inspector: SchemaInspector) -> Self {
        Self { inspector }
    }
}

#[async_trait]
impl Tool for GetTableSchemaTool {
    fn name(&self) -> &str {
        "get_table_schema"
    }

    fn description(&self) -> &str {
        "Get the schema/column information for a specific table to understand its structure. \
         Shows exact, case-sensitive column names."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "table_name": {
                    "type": "string",
                    "description": "The name of the table to get schema information for"
                }
            },
            "required": ["table_name"],
            "additionalProperties": false
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "table": { "type": "string" },
                "columns": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "type": { "type": "string" },
                            "nullable": { "type": "boolean" },
                            "primary_key": { "type": "boolean" },
                            "foreign_key": {
                                "type": "object",
                                "properties": {
                                    "table": { "type": "string" },
                                    "column": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            table_name: String,
        }
        let params: Params = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let schema = self.inspector.get_table_schema(&params.table_name).await?;
        let columns = schema.columns.len();
        Ok(ToolResult::json(&schema).with_metadata("columns", columns))
    }
}
