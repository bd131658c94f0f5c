// ABOUTME: ExecuteSqlQueryTool - runs a guarded, read-only query.
// ABOUTME: Database failures come back with hints so the model can correct itself.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{QueryError, ToolError};
use crate::executor::SqlExecutor;
use crate::tool::{Tool, ToolResult};

/// Tool for executing a single SELECT statement.
pub struct ExecuteSqlQueryTool {
    executor: SqlExecutor,
}

impl ExecuteSqlQueryTool {
    pub fn new(executor: SqlExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for ExecuteSqlQueryTool {
    fn name(&self) -> &str {
        "execute_sql_query"
    }

    fn description(&self) -> &str {
        "Execute a SQL query against the database and return the results. \
         Only a single SELECT (or WITH ... SELECT) statement is allowed."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "sql_query": {
                    "type": "string",
                    "description": "The SQL query to execute"
                }
            },
            "required": ["sql_query"],
            "additionalProperties": false
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "columns": { "type": "array", "items": { "type": "string" } },
                "rows": { "type": "array", "items": { "type": "array" } },
                "row_count": { "type": "integer" },
                "truncated": { "type": "boolean" }
            }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            sql_query: String,
        }
        let params: Params = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        match self.executor.execute(&params.sql_query).await {
            Ok(output) => Ok(ToolResult::json(&json!({
                "columns": output.columns,
                "rows": output.rows,
                "row_count": output.row_count,
                "truncated": output.truncated,
            }))
            .with_metadata("row_count", output.row_count)
            .with_metadata("truncated", output.truncated)),
            Err(QueryError::Execution(e)) => Ok(ToolResult::error(explain_failure(
                &e.to_string(),
                &params.sql_query,
            ))),
            Err(rejected) => Err(rejected.into()),
        }
    }
}

/// Render a database error with a hint for the common self-correctable cases.
fn explain_failure(error: &str, sql: &str) -> String {
    let lower = error.to_lowercase();
    let missing = lower.contains("does not exist") || lower.contains("no such");

    if missing && lower.contains("column") {
        format!(
            "SQL error - column does not exist: {}\n\nHINT: Check column names for exact case sensitivity \
             with get_table_schema. Use double quotes around column names if needed.\nQuery attempted: {}",
            error, sql
        )
    } else if missing && (lower.contains("table") || lower.contains("relation")) {
        format!(
            "SQL error - table does not exist: {}\n\nHINT: Use get_table_names to see available tables.\n\
             Query attempted: {}",
            error, sql
        )
    } else {
        format!("SQL error: {}\nQuery attempted: {}", error, sql)
    }
}
