// ABOUTME: SQL executor - runs guard-approved SELECT queries with a row cap.
// ABOUTME: Enforces a timeout and retries transient failures; never closes the pool.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::db::{Database, RetryPolicy};
use crate::error::{DbError, QueryError};
use crate::guard;

/// Default row ceiling for a single query.
pub const DEFAULT_MAX_ROWS: usize = 1000;

/// Default per-query timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Limits applied to every executed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub max_rows: usize,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            timeout: DEFAULT_QUERY_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput {
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub truncated: bool,
}

/// Executes vetted read-only queries.
#[derive(Clone)]
pub struct SqlExecutor {
    db: Arc<dyn Database>,
    settings: ExecutorSettings,
}

impl SqlExecutor {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self::with_settings(db, ExecutorSettings::default())
    }

    pub fn with_settings(db: Arc<dyn Database>, settings: ExecutorSettings) -> Self {
        Self { db, settings }
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Classify `sql` and, only if the guard allows it, run it.
    pub async fn execute(&self, sql: &str) -> Result<QueryOutput, QueryError> {
        let verdict = guard::classify(sql);
        if !verdict.allowed {
            tracing::warn!("Guard rejected query: {}", verdict.reason);
            return Err(QueryError::GuardRejected(verdict));
        }

        let ExecutorSettings {
            max_rows,
            timeout,
            retry,
        } = self.settings;

        let rows = retry
            .run(|attempt| {
                let db = self.db.clone();
                async move {
                    if attempt > 0 {
                        tracing::debug!("Retrying query (attempt {})", attempt + 1);
                    }
                    match tokio::time::timeout(timeout, db.fetch_rows(sql, max_rows)).await {
                        Ok(result) => result,
                        Err(_) => Err(DbError::Timeout(timeout)),
                    }
                }
            })
            .await?;

        tracing::debug!(
            "Query returned {} row(s){}",
            rows.rows.len(),
            if rows.truncated { " (truncated)" } else { "" }
        );

        Ok(QueryOutput {
            sql: sql.to_string(),
            row_count: rows.rows.len(),
            columns: rows.columns,
            rows: rows.rows,
            truncated: rows.truncated,
        })
    }
}
