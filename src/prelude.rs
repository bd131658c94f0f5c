// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use sqlpilot::prelude::*;` to get started quickly.

pub use crate::agent::{AgentConfig, AgentState, SYSTEM_PROMPT, Session, Transcript, TurnOutcome};
pub use crate::config::Config;
pub use crate::db::{
    ColumnInfo, Database, Dialect, ForeignKey, PgDatabase, QueryRows, RetryPolicy,
    SqliteDatabase, connect,
};
pub use crate::error::{
    AgentError, ConfigError, DbError, LlmError, QueryError, SchemaError, SqlPilotError, ToolError,
};
pub use crate::executor::{ExecutorSettings, QueryOutput, SqlExecutor};
pub use crate::guard::{RejectReason, Verdict, classify};
pub use crate::hook::{Hook, HookEvent, HookRegistry};
pub use crate::llm::{
    ContentBlock, LlmClient, Message, OpenRouterClient, Request, Response, Role, StopReason,
    ToolDefinition, Usage,
};
pub use crate::schema::{SchemaInspector, TableSchema};
pub use crate::tool::{Registry, Tool, ToolCall, ToolDescriptor, ToolResult};
pub use crate::tools::{
    ExecuteSqlQueryTool, GetTableNamesTool, GetTableSchemaTool, register_sql_tools,
};
