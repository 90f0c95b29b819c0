//! Pass-through SQL tools over the relational store.
//!
//! `sql_db_query` deliberately performs no statement validation or
//! hardening; the model is handed the same surface a SQL console would be.

use anyhow::Result;
use async_trait::async_trait;

use stocky_db::{rendering, DbPool};

use super::Tool;

pub struct SqlQueryTool {
    pool: DbPool,
}

impl SqlQueryTool {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Tool for SqlQueryTool {
    fn name(&self) -> &'static str {
        "sql_db_query"
    }

    fn description(&self) -> &'static str {
        "Execute a SQLite query against the database and return the result rows. \
         Input is a complete SQL statement."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(rendering::run_query_to_string(&self.pool, input.trim()).await?)
    }
}

pub struct ListTablesTool {
    pool: DbPool,
}

impl ListTablesTool {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &'static str {
        "sql_db_list_tables"
    }

    fn description(&self) -> &'static str {
        "List the tables available in the database. Input is ignored."
    }

    async fn invoke(&self, _input: &str) -> Result<String> {
        Ok(rendering::list_tables(&self.pool).await?)
    }
}

pub struct TableSchemaTool {
    pool: DbPool,
}

impl TableSchemaTool {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Tool for TableSchemaTool {
    fn name(&self) -> &'static str {
        "sql_db_schema"
    }

    fn description(&self) -> &'static str {
        "Show the CREATE TABLE statement and three sample rows for the given \
         comma-separated table names."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(rendering::table_schema_with_samples(&self.pool, input).await?)
    }
}

#[cfg(test)]
mod tests {
    use stocky_db::{connect_with_settings, migrations, DbPool, DemoInventoryDataset};

    use super::{ListTablesTool, SqlQueryTool, TableSchemaTool};
    use crate::tools::Tool;

    async fn seeded_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        DemoInventoryDataset::load(&pool).await.expect("seed demo rows");
        pool
    }

    #[tokio::test]
    async fn query_tool_renders_result_rows() {
        let tool = SqlQueryTool::new(seeded_pool().await);

        let observation = tool
            .invoke("SELECT name FROM inventory WHERE quantity_in_stock < 20 ORDER BY name")
            .await
            .expect("query should succeed");

        assert_eq!(observation, "[('Desk Lamp'), ('Laptop Computer'), ('Mechanical Keyboard')]");
    }

    #[tokio::test]
    async fn query_tool_surfaces_sql_errors() {
        let tool = SqlQueryTool::new(seeded_pool().await);

        let result = tool.invoke("SELEC * FROM inventory").await;

        assert!(result.is_err(), "invalid SQL should come back as an error");
    }

    #[tokio::test]
    async fn list_tables_tool_ignores_its_input() {
        let tool = ListTablesTool::new(seeded_pool().await);

        let observation = tool.invoke("anything at all").await.expect("listing should succeed");

        assert_eq!(observation, "inventory");
    }

    #[tokio::test]
    async fn schema_tool_renders_ddl_and_samples() {
        let tool = TableSchemaTool::new(seeded_pool().await);

        let observation = tool.invoke("inventory").await.expect("schema should render");

        assert!(observation.contains("CREATE TABLE inventory"));
        assert!(observation.contains("3 rows from inventory table:"));
    }
}
