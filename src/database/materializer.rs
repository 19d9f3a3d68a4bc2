//! Table Materializer
//!
//! Creates the destination table (idempotently) and appends the whole row
//! set in a single transaction. The create step is committed on its own, so
//! a failed append can leave an empty table behind.

use crate::database::connection::Store;
use crate::database::schema::TableDefinition;
use crate::error::{ChatSheetError, Result};
use crate::ingest::inference::infer_table_definition;
use crate::ingest::source::{CellValue, DataSource};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::query::Query;
use sqlx::Connection;

/// Create `table` from the source's inferred schema and load every row.
///
/// Returns the number of rows appended. Any store failure is reported as
/// [`ChatSheetError::Materialize`] carrying the original cause.
pub async fn materialize(store: &Store, source: &DataSource, table: &str) -> Result<usize> {
    let definition = infer_table_definition(source, table);

    let appended = load(store, &definition, source)
        .await
        .map_err(|e| ChatSheetError::materialize(table, e))?;

    tracing::info!(table, rows = appended, "materialized table");
    Ok(appended)
}

async fn load(
    store: &Store,
    definition: &TableDefinition,
    source: &DataSource,
) -> std::result::Result<usize, sqlx::Error> {
    let mut conn = store.pool().acquire().await?;

    let create = definition.create_statement();
    tracing::debug!(statement = %create, "creating table");
    sqlx::query(&create).execute(&mut *conn).await?;

    let insert = definition.insert_statement();
    let mut tx = conn.begin().await?;
    for row in &source.rows {
        bind_row(sqlx::query(&insert), row).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    Ok(source.rows.len())
}

fn bind_row<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    row: &'q [CellValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in row {
        query = match value {
            CellValue::Null => query.bind(None::<String>),
            CellValue::Integer(v) => query.bind(*v),
            CellValue::Real(v) => query.bind(*v),
            CellValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}
