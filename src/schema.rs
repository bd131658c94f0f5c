// ABOUTME: Schema inspector - lists tables and describes columns of one table.
// ABOUTME: Exact, case-sensitive table matching; unknown names list the valid ones.

use std::sync::Arc;

use serde::Serialize;

use crate::db::{ColumnInfo, Database};
use crate::error::SchemaError;

/// Column layout of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

/// Read-only view over the database catalog. Nothing is cached between calls.
#[derive(Clone)]
pub struct SchemaInspector {
    db: Arc<dyn Database>,
}

impl SchemaInspector {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Table names known to the connected database; empty if there are none.
    pub async fn list_tables(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.db.list_tables().await?)
    }

    /// Columns of `table_name`, which must match a listed table exactly.
    pub async fn get_table_schema(&self, table_name: &str) -> Result<TableSchema, SchemaError> {
        let available = self.db.list_tables().await?;
        if !available.iter().any(|t| t == table_name) {
            return Err(SchemaError::TableNotFound {
                table: table_name.to_string(),
                available,
            });
        }

        let columns = self.db.describe_table(table_name).await?;
        if columns.is_empty() {
            // Dropped between the listing and the describe.
            let available = self.db.list_tables().await?;
            return Err(SchemaError::TableNotFound {
                table: table_name.to_string(),
                available,
            });
        }

        Ok(TableSchema {
            table: table_name.to_string(),
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SpyDatabase;

    #[tokio::test]
    async fn test_list_tables_passthrough() {
        let db = Arc::new(SpyDatabase::shop());
        let inspector = SchemaInspector::new(db);
        let tables = inspector.list_tables().await.unwrap();
        assert_eq!(
            tables,
            vec!["categories", "order_items", "orders", "products", "users"]
        );
    }

    #[tokio::test]
    async fn test_list_tables_empty_database() {
        let inspector = SchemaInspector::new(Arc::new(SpyDatabase::default()));
        assert!(inspector.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_table_schema_found() {
        let inspector = SchemaInspector::new(Arc::new(SpyDatabase::shop()));
        let schema = inspector.get_table_schema("users").await.unwrap();
        assert_eq!(schema.table, "users");
        assert_eq!(schema.columns[0].name, "id");
        assert!(schema.columns[0].primary_key);
    }

    #[tokio::test]
    async fn test_get_table_schema_not_found_lists_tables() {
        let db = Arc::new(SpyDatabase::shop());
        let inspector = SchemaInspector::new(db.clone());
        let err = inspector
            .get_table_schema("nonexistent_table")
            .await
            .unwrap_err();

        match &err {
            SchemaError::TableNotFound { table, available } => {
                assert_eq!(table, "nonexistent_table");
                assert!(available.contains(&"users".to_string()));
            }
            other => panic!("expected TableNotFound, got {:?}", other),
        }
        assert!(err.to_string().contains("users"));
        assert!(!db.calls().iter().any(|c| c.starts_with("describe_table")));
    }

    #[tokio::test]
    async fn test_get_table_schema_is_case_sensitive() {
        let inspector = SchemaInspector::new(Arc::new(SpyDatabase::shop()));
        let err = inspector.get_table_schema("Users").await.unwrap_err();
        assert!(matches!(err, SchemaError::TableNotFound { .. }));
    }
}
