// ABOUTME: Built-in SQL tools exposed to the agent.
// ABOUTME: Table listing, table schema lookup, and guarded query execution.

mod execute_query;
mod table_names;
mod table_schema;

use std::sync::Arc;

pub use execute_query::ExecuteSqlQueryTool;
pub use table_names::GetTableNamesTool;
pub use table_schema::GetTableSchemaTool;

use crate::db::Database;
use crate::executor::{ExecutorSettings, SqlExecutor};
use crate::schema::SchemaInspector;
use crate::tool::Registry;

/// Register the three SQL tools against one database.
pub async fn register_sql_tools(
    registry: &Registry,
    db: Arc<dyn Database>,
    settings: ExecutorSettings,
) {
    let inspector = SchemaInspector::new(db.clone());
    registry
        .register(GetTableNamesTool::new(inspector.clone()))
        .await;
    registry.register(GetTableSchemaTool::new(inspector)).await;
    registry
        .register(ExecuteSqlQueryTool::new(SqlExecutor::with_settings(
            db, settings,
        )))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SpyDatabase;

    #[tokio::test]
    async fn test_registers_fixed_tool_set() {
        let registry = Registry::new();
        register_sql_tools(
            &registry,
            Arc::new(SpyDatabase::shop()),
            ExecutorSettings::default(),
        )
        .await;

        assert_eq!(
            registry.list().await,
            vec!["execute_sql_query", "get_table_names", "get_table_schema"]
        );
        let descriptors = registry.descriptors().await;
        assert!(descriptors.iter().all(|d| d.output_schema["type"] == "object"));
    }
}
