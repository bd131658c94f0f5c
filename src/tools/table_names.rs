// ABOUTME: GetTableNamesTool - lists the tables of the connected database.
// ABOUTME: Takes no arguments; returns the names and their count.

use async_trait::async_trait;
use serde_json::json;

use crate::error::ToolError;
use crate::schema::SchemaInspector;
use crate::tool::{Tool, ToolResult};

/// Tool for discovering which tables exist.
pub struct GetTableNamesTool {
    inspector: SchemaInspector,
}

impl GetTableNamesTool {
    pub fn new(inspector: SchemaInspector) -> Self {
        Self { inspector }
    }
}

#[async_trait]
impl Tool for GetTableNamesTool {
    fn name(&self) -> &str {
        "get_table_names"
    }

    fn description(&self) -> &str {
        "Get the names of all tables in the database to understand the database structure."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "tables": { "type": "array", "items": { "type": "string" } },
                "count": { "type": "integer" }
            }
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let tables = self.inspector.list_tables().await?;
        let count = tables.len();
        Ok(ToolResult::json(&json!({ "tables": tables, "count": count }))
            .with_metadata("count", count))
    }
}
