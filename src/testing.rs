// ABOUTME: Test doubles shared by unit tests - a spy Database and a scripted LlmClient.
// ABOUTME: Both record every call so tests can assert on what was (not) invoked.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::db::{ColumnInfo, Database, Dialect, ForeignKey, QueryRows};
use crate::error::{DbError, LlmError};
use crate::llm::{ContentBlock, LlmClient, Request, Response, StopReason, Usage};

type ErrorFactory = Box<dyn Fn() -> DbError + Send + Sync>;

/// In-memory Database that records calls and serves canned results.
#[derive(Default)]
pub struct SpyDatabase {
    tables: Vec<(String, Vec<ColumnInfo>)>,
    rows: QueryRows,
    failure: Option<ErrorFactory>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

fn column(name: &str, data_type: &str, nullable: bool, primary_key: bool) -> ColumnInfo {
    ColumnInfo {
        name: name.into(),
        data_type: data_type.into(),
        nullable,
        primary_key,
        foreign_key: None,
    }
}

fn reference(name: &str, table: &str) -> ColumnInfo {
    ColumnInfo {
        foreign_key: Some(ForeignKey {
            table: table.into(),
            column: "id".into(),
        }),
        ..column(name, "INTEGER", false, false)
    }
}

impl SpyDatabase {
    /// The sample e-commerce catalog.
    pub fn shop() -> Self {
        let tables = vec![
            (
                "categories".to_string(),
                vec![
                    column("id", "INTEGER", false, true),
                    column("name", "TEXT", false, false),
                ],
            ),
            (
                "order_items".to_string(),
                vec![
                    column("id", "INTEGER", false, true),
                    reference("order_id", "orders"),
                    reference("product_id", "products"),
                    column("quantity", "INTEGER", false, false),
                ],
            ),
            (
                "orders".to_string(),
                vec![
                    column("id", "INTEGER", false, true),
                    reference("user_id", "users"),
                    column("total", "NUMERIC", false, false),
                ],
            ),
            (
                "products".to_string(),
                vec![
                    column("id", "INTEGER", false, true),
                    reference("category_id", "categories"),
                    column("name", "TEXT", false, false),
                    column("price", "NUMERIC", false, false),
                ],
            ),
            (
                "users".to_string(),
                vec![
                    column("id", "INTEGER", false, true),
                    column("username", "TEXT", false, false),
                    column("email", "TEXT", false, false),
                    column("created_at", "TIMESTAMP", true, false),
                ],
            ),
        ];
        Self {
            tables,
            ..Self::default()
        }
    }

    pub fn with_rows(mut self, rows: QueryRows) -> Self {
        self.rows = rows;
        self
    }

    /// Make every `fetch_rows` fail with a fresh error from `factory`.
    pub fn failing_with(mut self, factory: impl Fn() -> DbError + Send + Sync + 'static) -> Self {
        self.failure = Some(Box::new(factory));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl Database for SpyDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        self.record("list_tables".to_string());
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        self.record(format!("describe_table:{}", table));
        Ok(self
            .tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, columns)| columns.clone())
            .unwrap_or_default())
    }

    async fn fetch_rows(&self, sql: &str, limit: usize) -> Result<QueryRows, DbError> {
        self.record(format!("fetch_rows:{}:{}", limit, sql));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(factory) => Err(factory()),
            None => Ok(self.rows.clone()),
        }
    }
}

/// LlmClient that replays a fixed script of responses.
#[derive(Default)]
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Response>>,
    fallback: Option<Response>,
    delay: Option<Duration>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedLlm {
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answer with `response` forever once the script runs out.
    pub fn repeating(response: Response) -> Self {
        Self {
            fallback: Some(response),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| LlmError::Configuration("script exhausted".to_string()))
    }
}

/// A final text answer.
pub fn answer(text: &str) -> Response {
    Response {
        id: "resp".to_string(),
        content: vec![ContentBlock::text(text)],
        stop_reason: StopReason::EndTurn,
        model: "scripted".to_string(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

/// A response requesting one tool call.
pub fn tool_call(id: &str, name: &str, input: serde_json::Value) -> Response {
    Response {
        id: "resp".to_string(),
        content: vec![ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        model: "scripted".to_string(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}
