// ABOUTME: Database collaborator - the read-only surface the agent needs.
// ABOUTME: Defines the Database trait, metadata/row types and URL-based connect.

mod postgres;
mod retry;
mod sqlite;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DbError;

pub use postgres::PgDatabase;
pub use retry::RetryPolicy;
pub use sqlite::SqliteDatabase;

/// SQL dialect of a connected database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => f.write_str("PostgreSQL"),
            Dialect::Sqlite => f.write_str("SQLite"),
        }
    }
}

/// Target of a foreign key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// One column of a table as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

/// Rows fetched by a capped read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    /// More rows were available than the cap allowed.
    pub truncated: bool,
}

/// Read-only access to a relational database.
///
/// Implementations own their connection pool; callers never close it.
#[async_trait]
pub trait Database: Send + Sync {
    /// Dialect spoken by this database.
    fn dialect(&self) -> Dialect;

    /// Names of the user tables, sorted.
    async fn list_tables(&self) -> Result<Vec<String>, DbError>;

    /// Columns of `table` in declaration order. Empty if the table is unknown.
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError>;

    /// Run `sql` and return at most `limit` rows.
    async fn fetch_rows(&self, sql: &str, limit: usize) -> Result<QueryRows, DbError>;
}

/// Connect to the database named by a connection URL.
pub async fn connect(url: &str) -> Result<Arc<dyn Database>, DbError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(PgDatabase::connect(url).await?))
    } else if url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteDatabase::connect(url).await?))
    } else {
        Err(DbError::UnsupportedUrl(redact(url)))
    }
}

/// Strip credentials from a connection URL for display.
pub fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
