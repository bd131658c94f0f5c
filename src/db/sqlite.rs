// ABOUTME: SQLite implementation of the Database trait on a sqlx pool.
// ABOUTME: Opens file databases read-only and reads metadata via pragma functions.

use std::str::FromStr;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row};

use super::{ColumnInfo, Database, Dialect, ForeignKey, QueryRows};
use crate::error::DbError;

const LIST_TABLES: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const DESCRIBE_COLUMNS: &str =
    "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid";

const FOREIGN_KEYS: &str = "SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1)";

/// SQLite database backed by a sqlx pool.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open a read-only pool for a `sqlite:` URL.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(DbError::Connect)?
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(DbError::Connect)?;
        tracing::info!("Connected to SQLite (read-only)");
        Ok(Self { pool })
    }

    /// Wrap an existing pool. The caller decides whether it is read-only.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        Ok(sqlx::query_scalar::<_, String>(LIST_TABLES)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        let foreign: Vec<(String, String, String)> = sqlx::query_as(FOREIGN_KEYS)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let columns: Vec<(String, String, i64, i64)> = sqlx::query_as(DESCRIBE_COLUMNS)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        Ok(columns
            .into_iter()
            .map(|(name, data_type, not_null, pk)| {
                let foreign_key = foreign
                    .iter()
                    .find(|(from, _, _)| *from == name)
                    .map(|(_, table, to)| ForeignKey {
                        table: table.clone(),
                        column: to.clone(),
                    });
                ColumnInfo {
                    // SQLite lets an INTEGER PRIMARY KEY column be declared without NOT NULL.
                    nullable: not_null == 0 && pk == 0,
                    primary_key: pk > 0,
                    foreign_key,
                    data_type,
                    name,
                }
            })
            .collect())
    }

    async fn fetch_rows(&self, sql: &str, limit: usize) -> Result<QueryRows, DbError> {
        let mut conn = self.pool.acquire().await?;
        let mut stream = sqlx::query(sql).fetch(&mut *conn);

        let mut result = QueryRows::default();
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
                .push((0..row.len()).map(|i| sqlite_value(&row, i)).collect());
        }

        Ok(result)
    }
}

/// Convert one SQLite cell to JSON according to its storage class.
fn sqlite_value(row: &SqliteRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Value::String(format!("<blob {} bytes>", v.len()));
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> SqliteDatabase {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT NOT NULL, email TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL REFERENCES users(id), total_amount REAL)",
        )
        .execute(&pool)
        .await
        .unwrap();
        for i in 1..=5 {
            sqlx::query("INSERT INTO users (username, email) VALUES (?1, NULL)")
                .bind(format!("user{}", i))
                .execute(&pool)
                .await
                .unwrap();
        }
        SqliteDatabase::from_pool(pool)
    }

    #[tokio::test]
    async fn test_list_tables_sorted() {
        let db = seeded().await;
        assert_eq!(db.list_tables().await.unwrap(), vec!["orders", "users"]);
    }

    #[tokio::test]
    async fn test_describe_table_keys() {
        let db = seeded().await;
        let columns = db.describe_table("orders").await.unwrap();
        assert_eq!(columns.len(), 3);

        assert_eq!(columns[0].name, "id");
        assert!(columns[0].primary_key);
        assert!(!columns[0].nullable);

        assert_eq!(columns[1].name, "user_id");
        assert_eq!(
            columns[1].foreign_key,
            Some(ForeignKey {
                table: "users".into(),
                column: "id".into()
            })
        );
        assert!(columns[2].nullable);
        assert_eq!(columns[2].data_type, "REAL");
    }

    #[tokio::test]
    async fn test_describe_unknown_table_is_empty() {
        let db = seeded().await;
        assert!(db.describe_table("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rows_values_and_nulls() {
        let db = seeded().await;
        let rows = db
            .fetch_rows("SELECT id, username, email FROM users ORDER BY id", 10)
            .await
            .unwrap();
        assert_eq!(rows.columns, vec!["id", "username", "email"]);
        assert_eq!(rows.rows.len(), 5);
        assert_eq!(rows.rows[0][0], json!(1));
        assert_eq!(rows.rows[0][1], json!("user1"));
        assert_eq!(rows.rows[0][2], Value::Null);
        assert!(!rows.truncated);
    }

    #[tokio::test]
    async fn test_fetch_rows_truncates_at_limit() {
        let db = seeded().await;
        let rows = db.fetch_rows("SELECT id FROM users", 3).await.unwrap();
        assert_eq!(rows.rows.len(), 3);
        assert!(rows.truncated);

        let exact = db.fetch_rows("SELECT id FROM users", 5).await.unwrap();
        assert_eq!(exact.rows.len(), 5);
        assert!(!exact.truncated);
    }

    #[tokio::test]
    async fn test_read_only_connection_refuses_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.db");
        let url = format!("sqlite://{}", path.display());

        let writable = SqlitePoolOptions::new()
            .connect_with(
                SqliteConnectOptions::from_str(&url)
                    .unwrap()
                    .create_if_missing(true),
            )
            .await
            .unwrap();
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY)")
            .execute(&writable)
            .await
            .unwrap();
        writable.close().await;

        let db = SqliteDatabase::connect(&url).await.unwrap();
        assert_eq!(db.list_tables().await.unwrap(), vec!["users"]);
        assert!(db.fetch_rows("INSERT INTO users (id) VALUES (1)", 10).await.is_err());
    }
}
