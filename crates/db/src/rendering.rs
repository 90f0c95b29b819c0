//! Textual rendering of query results and schema introspection.
//!
//! Observations fed back to the model use one parenthesized tuple per row,
//! wrapped in `[...]`. An empty result set renders as an empty string.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

use crate::repositories::RepositoryError;
use crate::DbPool;

const SCHEMA_SAMPLE_ROWS: usize = 3;

/// Execute an arbitrary SQL string and render its result set.
pub async fn run_query_to_string(pool: &DbPool, sql: &str) -> Result<String, RepositoryError> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    render_rows(&rows)
}

/// Comma-separated list of user tables.
pub async fn list_tables(pool: &DbPool) -> Result<String, RepositoryError> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(names.join(", "))
}

/// `CREATE TABLE` DDL plus the first few rows for each named table.
/// `table_names` is a comma-separated list.
pub async fn table_schema_with_samples(
    pool: &DbPool,
    table_names: &str,
) -> Result<String, RepositoryError> {
    let names: Vec<&str> =
        table_names.split(',').map(str::trim).filter(|name| !name.is_empty()).collect();
    if names.is_empty() {
        return Err(RepositoryError::Decode("no table names were provided".to_string()));
    }

    let mut sections = Vec::with_capacity(names.len());
    for name in names {
        sections.push(schema_section(pool, name).await?);
    }
    Ok(sections.join("\n\n"))
}

async fn schema_section(pool: &DbPool, table: &str) -> Result<String, RepositoryError> {
    if table.contains('"') {
        return Err(RepositoryError::Decode(format!("invalid table name '{table}'")));
    }

    let ddl: Option<String> =
        sqlx::query_scalar("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await?;
    let ddl =
        ddl.ok_or_else(|| RepositoryError::Decode(format!("table '{table}' was not found")))?;

    let rows = sqlx::query(&format!("SELECT * FROM \"{table}\" LIMIT {SCHEMA_SAMPLE_ROWS}"))
        .fetch_all(pool)
        .await?;
    let mut samples = Vec::with_capacity(rows.len());
    for row in &rows {
        samples.push(render_row(row)?);
    }

    Ok(format!(
        "{ddl}\n\n/*\n{SCHEMA_SAMPLE_ROWS} rows from {table} table:\n{}\n*/",
        samples.join("\n")
    ))
}

fn render_rows(rows: &[SqliteRow]) -> Result<String, RepositoryError> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let mut rendered = Vec::with_capacity(rows.len());
    for row in rows {
        rendered.push(render_row(row)?);
    }
    Ok(format!("[{}]", rendered.join(", ")))
}

fn render_row(row: &SqliteRow) -> Result<String, RepositoryError> {
    let mut values = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        values.push(render_value(row, index)?);
    }
    Ok(format!("({})", values.join(", ")))
}

fn render_value(row: &SqliteRow, index: usize) -> Result<String, RepositoryError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok("NULL".to_string());
    }
    let type_name = raw.type_info().name().to_string();

    match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Ok(row.try_get::<i64, _>(index)?.to_string()),
        "REAL" => Ok(row.try_get::<f64, _>(index)?.to_string()),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(index)?;
            Ok(format!("X'{}'", to_hex(&bytes)))
        }
        _ => Ok(quote_text(&row.try_get::<String, _>(index)?)),
    }
}

fn quote_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
