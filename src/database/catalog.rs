//! Schema Catalog Reader
//!
//! Reads table and column definitions straight from `sqlite_master` and
//! `pragma_table_info`. Nothing here is cached; every call sees the live
//! state of the store.

use crate::database::connection::Store;
use crate::database::schema::{quote_identifier, Column, SchemaCatalog, Table};
use crate::error::Result;
use sqlx::Row;

/// User tables, skipping SQLite's internal bookkeeping tables
const TABLES_QUERY: &str = r#"
    SELECT name
    FROM sqlite_master
    WHERE type = 'table'
        AND name NOT LIKE 'sqlite_%'
    ORDER BY name
"#;

/// Columns of one table in declaration order
const COLUMNS_QUERY: &str = "SELECT name, type FROM pragma_table_info(?1) ORDER BY cid";

/// Read every table and its columns
pub async fn read_catalog(store: &Store) -> Result<SchemaCatalog> {
    let mut conn = store.acquire().await?;
    let mut catalog = SchemaCatalog::new();

    let table_rows = sqlx::query(TABLES_QUERY).fetch_all(&mut *conn).await?;

    for row in table_rows {
        let table_name: String = row.get("name");
        let mut table = Table::new(&table_name);

        let column_rows = sqlx::query(COLUMNS_QUERY)
            .bind(&table_name)
            .fetch_all(&mut *conn)
            .await?;

        for col_row in column_rows {
            table.add_column(Column {
                name: col_row.get("name"),
                column_type: col_row.get("type"),
            });
        }

        catalog.add_table(table);
    }

    tracing::debug!(tables = catalog.tables.len(), "read schema catalog");

    Ok(catalog)
}

/// Names of all user tables
pub async fn table_names(store: &Store) -> Result<Vec<String>> {
    let mut conn = store.acquire().await?;
    let rows: Vec<(String,)> = sqlx::query_as(TABLES_QUERY).fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Whether a table with this name exists.
///
/// SQLite table names are case-insensitive, so the lookup is too.
pub async fn table_exists(store: &Store, name: &str) -> Result<bool> {
    let mut conn = store.acquire().await?;
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.is_some())
}

/// Drop a table and all of its rows
pub async fn drop_table(store: &Store, name: &str) -> Result<()> {
    let mut conn = store.acquire().await?;
    let statement = format!("DROP TABLE IF EXISTS {}", quote_identifier(name));
    sqlx::query(&statement).execute(&mut *conn).await?;

    tracing::info!(table = name, "dropped table");
    Ok(())
}

/// Number of rows currently stored in a table
pub async fn row_count(store: &Store, name: &str) -> Result<i64> {
    let mut conn = store.acquire().await?;
    let statement = format!("SELECT COUNT(*) FROM {}", quote_identifier(name));
    let (count,): (i64,) = sqlx::query_as(&statement).fetch_one(&mut *conn).await?;
    Ok(count)
}
