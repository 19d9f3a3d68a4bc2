//! Query Executor
//!
//! Runs a SQL statement against the store and renders the result as a
//! delimited table. Failures are logged and turned into a readable outcome;
//! nothing propagates past this boundary.

use crate::database::connection::Store;
use crate::error::{ChatSheetError, Result};
use crate::error_log::ErrorLog;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, Statement};

/// Shown when a statement produces no result columns
pub const NO_RESULT_MESSAGE: &str = "No result returned (e.g. DDL or update statement).";

/// Shown when there was nothing to execute
pub const NO_QUERY_MESSAGE: &str = "No SQL query found in the response.";

/// Rendering of SQL NULL
const NULL_TEXT: &str = "NULL";

/// Columns and rows returned by a statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOutput {
    /// Result column names (empty for DDL / DML)
    pub columns: Vec<String>,
    /// Rows rendered as text
    pub rows: Vec<Vec<String>>,
}

impl QueryOutput {
    /// Render as a `|` delimited table
    pub fn render(&self) -> String {
        if self.columns.is_empty() {
            return NO_RESULT_MESSAGE.to_string();
        }

        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(self.columns.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }
}

/// Result of handing a statement to the executor
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// There was no statement to run
    NoQuery,
    /// The statement ran
    Completed(QueryOutput),
    /// The store rejected the statement; the message is user-facing
    Failed(String),
}

impl ExecutionOutcome {
    /// Text shown to the user
    pub fn render(&self) -> String {
        match self {
            ExecutionOutcome::NoQuery => NO_QUERY_MESSAGE.to_string(),
            ExecutionOutcome::Completed(output) => output.render(),
            ExecutionOutcome::Failed(message) => message.clone(),
        }
    }
}

/// Executes statements and records failures
pub struct QueryExecutor<'a> {
    store: &'a Store,
    error_log: &'a ErrorLog,
}

impl<'a> QueryExecutor<'a> {
    /// Create an executor over a store and error log
    pub fn new(store: &'a Store, error_log: &'a ErrorLog) -> Self {
        Self { store, error_log }
    }

    /// Execute an optional statement.
    ///
    /// An absent or blank statement is the "no actionable query" state, not
    /// an error.
    pub async fn execute(&self, sql: Option<&str>) -> ExecutionOutcome {
        let sql = match sql.map(str::trim).filter(|s| !s.is_empty()) {
            Some(sql) => sql,
            None => return ExecutionOutcome::NoQuery,
        };

        match run_statement(self.store, sql).await {
            Ok(output) => {
                tracing::debug!(rows = output.rows.len(), "statement completed");
                ExecutionOutcome::Completed(output)
            }
            Err(e) => {
                let error = match e {
                    err @ ChatSheetError::Execution { .. } => err,
                    other => ChatSheetError::execution(other),
                };
                tracing::warn!(sql, error = %error, "statement failed");
                self.error_log.record(&error);
                ExecutionOutcome::Failed(error.to_string())
            }
        }
    }

    /// Execute a raw, caller-supplied statement
    pub async fn execute_raw(&self, sql: &str) -> ExecutionOutcome {
        self.execute(Some(sql)).await
    }
}

/// Run one statement, capturing column names and rows
pub async fn run_statement(store: &Store, sql: &str) -> Result<QueryOutput> {
    let mut conn = store.acquire().await?;

    // Preparing first yields the column names even when no rows come back
    let columns: Vec<String> = {
        let statement = (&mut *conn)
            .prepare(sql)
            .await
            .map_err(ChatSheetError::execution)?;
        statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    };

    let rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(ChatSheetError::execution)?;

    let rows = rows.iter().map(render_row).collect();

    Ok(QueryOutput { columns, rows })
}

fn render_row(row: &SqliteRow) -> Vec<String> {
    (0..row.len()).map(|idx| render_value(row, idx)).collect()
}

fn render_value(row: &SqliteRow, idx: usize) -> String {
    // SQLite converts integers and reals to text on request
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(Some(value)) => value,
        Ok(None) => NULL_TEXT.to_string(),
        Err(_) => "<binary>".to_string(),
    }
}
