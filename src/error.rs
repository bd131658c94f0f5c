// ABOUTME: Defines all error types for sqlpilot using thiserror.
// ABOUTME: Each subsystem has its own error enum, unified under SqlPilotError.

use std::time::Duration;

use crate::guard::Verdict;

/// Top-level error type for the sqlpilot library.
#[derive(Debug, thiserror::Error)]
pub enum SqlPilotError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised by the database collaborator.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Unsupported database URL '{0}' (expected postgres://, postgresql:// or sqlite:)")]
    UnsupportedUrl(String),

    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("{0}")]
    Query(#[from] sqlx::Error),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

impl DbError {
    /// Whether retrying the same read could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DbError::Timeout(_) => true,
            DbError::Connect(e) | DbError::Query(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            DbError::UnsupportedUrl(_) => false,
        }
    }
}

/// Errors from schema inspection.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Table '{table}' not found. Available tables: {}", format_available(.available))]
    TableNotFound { table: String, available: Vec<String> },

    #[error(transparent)]
    Database(#[from] DbError),
}

fn format_available(tables: &[String]) -> String {
    if tables.is_empty() {
        "(none)".to_string()
    } else {
        tables.join(", ")
    }
}

/// Errors from guarded query execution.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Query rejected: {}", .0.reason)]
    GuardRejected(Verdict),

    #[error("SQL error: {0}")]
    Execution(#[from] DbError),
}

/// Errors from tool operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Loop-level errors that end a single user turn.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Agent exceeded max iterations ({limit}) without producing an answer")]
    MaxIterationsExceeded { limit: usize },
}

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
