// ABOUTME: PostgreSQL implementation of the Database trait on a sqlx pool.
// ABOUTME: Reads catalog metadata and runs queries inside READ ONLY transactions.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::{Value, json};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo};

use super::{ColumnInfo, Database, Dialect, ForeignKey, QueryRows};
use crate::error::DbError;

const LIST_TABLES: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

const DESCRIBE_COLUMNS: &str = "SELECT column_name::text, data_type::text, is_nullable::text \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

const PRIMARY_KEY_COLUMNS: &str = "SELECT kcu.column_name::text \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     WHERE tc.constraint_type = 'PRIMARY KEY' \
       AND tc.table_schema = current_schema() AND tc.table_name = $1";

const FOREIGN_KEY_COLUMNS: &str = "SELECT kcu.column_name::text, ccu.table_name::text, ccu.column_name::text \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     JOIN information_schema.constraint_column_usage ccu \
       ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
     WHERE tc.constraint_type = 'FOREIGN KEY' \
       AND tc.table_schema = current_schema() AND tc.table_name = $1";

/// PostgreSQL database backed by a small connection pool.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Open a pool for the given `postgres://` URL.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(DbError::Connect)?;
        tracing::info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for PgDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        Ok(sqlx::query_scalar::<_, String>(LIST_TABLES)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        let columns: Vec<(String, String, String)> = sqlx::query_as(DESCRIBE_COLUMNS)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let primary: HashSet<String> = sqlx::query_scalar::<_, String>(PRIMARY_KEY_COLUMNS)
            .bind(table)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        let foreign: HashMap<String, ForeignKey> =
            sqlx::query_as::<_, (String, String, String)>(FOREIGN_KEY_COLUMNS)
                .bind(table)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|(column, ref_table, ref_column)| {
                    (
                        column,
                        ForeignKey {
                            table: ref_table,
                            column: ref_column,
                        },
                    )
                })
                .collect();

        Ok(columns
            .into_iter()
            .map(|(name, data_type, is_nullable)| ColumnInfo {
                primary_key: primary.contains(&name),
                foreign_key: foreign.get(&name).cloned(),
                nullable: is_nullable.eq_ignore_ascii_case("YES"),
                data_type,
                name,
            })
            .collect())
    }

    async fn fetch_rows(&self, sql: &str, limit: usize) -> Result<QueryRows, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut result = QueryRows::default();
        {
            let mut stream = sqlx::query(sql).fetch(&mut *tx);
            while let Some(row) = stream.try_next().await? {
                if result.columns.is_empty() {
                    result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                if result.rows.len() == limit {
                    result.truncated = true;
                    break;
                }
                result
                    .rows
                    .push((0..row.len()).map(|i| pg_value(&row, i)).collect());
            }
        }

        tx.rollback().await?;
        Ok(result)
    }
}

fn decode<'r, T, F>(row: &'r PgRow, idx: usize, convert: F) -> Value
where
    T: Decode<'r, Postgres> + Type<Postgres>,
    F: FnOnce(T) -> Value,
{
    match row.try_get::<Option<T>, _>(idx) {
        Ok(Some(value)) => convert(value),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::debug!("Could not decode column {}: {}", idx, e);
            Value::Null
        }
    }
}

/// Convert one Postgres cell to JSON according to its column type.
fn pg_value(row: &PgRow, idx: usize) -> Value {
    let type_name = row.columns()[idx].type_info().name().to_string();
    match type_name.as_str() {
        "BOOL" => decode::<bool, _>(row, idx, Value::from),
        "INT2" => decode::<i16, _>(row, idx, Value::from),
        "INT4" => decode::<i32, _>(row, idx, Value::from),
        "INT8" => decode::<i64, _>(row, idx, Value::from),
        "FLOAT4" => decode::<f32, _>(row, idx, |v| json!(v)),
        "FLOAT8" => decode::<f64, _>(row, idx, |v| json!(v)),
        "NUMERIC" => decode::<sqlx::types::Decimal, _>(row, idx, |v| Value::String(v.to_string())),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "\"CHAR\"" => {
            decode::<String, _>(row, idx, Value::String)
        }
        "TIMESTAMP" => decode::<sqlx::types::chrono::NaiveDateTime, _>(row, idx, |v| {
            Value::String(v.to_string())
        }),
        "TIMESTAMPTZ" => {
            decode::<sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc>, _>(row, idx, |v| {
                Value::String(v.to_rfc3339())
            })
        }
        "DATE" => decode::<sqlx::types::chrono::NaiveDate, _>(row, idx, |v| {
            Value::String(v.to_string())
        }),
        "TIME" => decode::<sqlx::types::chrono::NaiveTime, _>(row, idx, |v| {
            Value::String(v.to_string())
        }),
        "UUID" => decode::<sqlx::types::Uuid, _>(row, idx, |v| Value::String(v.to_string())),
        "JSON" | "JSONB" => decode::<Value, _>(row, idx, |v| v),
        other => match row.try_get::<Option<String>, _>(idx) {
            Ok(Some(text)) => Value::String(text),
            Ok(None) => Value::Null,
            Err(_) => Value::String(format!("<unsupported type {}; cast to text>", other)),
        },
    }
}
