//! Ingestion and question-answering pipelines
//!
//! Ties the components together: CSV file → inference → conflict
//! resolution → materialization, and model text → parser → executor.

use crate::config::AppState;
use crate::database::catalog;
use crate::database::executor::{ExecutionOutcome, QueryExecutor};
use crate::database::materializer;
use crate::error::{ChatSheetError, Result};
use crate::ingest::conflict::{resolve_table_name, ConflictResolver};
use crate::ingest::source::DataSource;
use crate::llm::parser::{parse_response, ParsedResponse};
use std::path::Path;

/// Result of a `load` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were appended to `table`
    Loaded { table: String, rows: usize },
    /// The target existed and the load was abandoned
    Skipped { table: String },
}

/// Result of running a model response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseOutcome {
    /// What the parser extracted
    pub parsed: ParsedResponse,
    /// What the executor did with it
    pub execution: ExecutionOutcome,
}

impl ResponseOutcome {
    /// Text shown to the user
    pub fn render(&self) -> String {
        let mut out = format!("Explanation:\n{}\n", self.parsed.explanation);
        match &self.execution {
            ExecutionOutcome::NoQuery => {}
            _ => out.push_str("\nQuery Results:\n"),
        }
        out.push_str(&self.execution.render());
        out
    }
}

/// Load a CSV file into `table`.
///
/// The file is read and validated before the store is touched, so a missing
/// or empty file never creates a table.
pub async fn load_csv(
    state: &AppState,
    path: &Path,
    table: &str,
    resolver: &mut dyn ConflictResolver,
) -> Result<LoadOutcome> {
    let source = DataSource::read(path)?;

    let target = match resolve_table_name(&state.store, table, resolver).await? {
        Some(target) => target,
        None => {
            return Ok(LoadOutcome::Skipped {
                table: table.to_string(),
            })
        }
    };

    let rows = materializer::materialize(&state.store, &source, &target).await?;
    Ok(LoadOutcome::Loaded { table: target, rows })
}

/// Live schema listing
pub async fn describe_tables(state: &AppState) -> Result<String> {
    let catalog = catalog::read_catalog(&state.store).await?;
    Ok(catalog.format_for_llm())
}

/// Execute a raw statement
pub async fn run_query(state: &AppState, sql: &str) -> ExecutionOutcome {
    QueryExecutor::new(&state.store, &state.error_log)
        .execute_raw(sql)
        .await
}

/// Parse a model response and execute any statement it carries
pub async fn run_response(state: &AppState, response: &str) -> ResponseOutcome {
    let parsed = parse_response(response);
    let execution = QueryExecutor::new(&state.store, &state.error_log)
        .execute(parsed.sql.as_deref())
        .await;

    ResponseOutcome { parsed, execution }
}

/// Ask the model a question, then run its answer.
///
/// Returns the raw model text alongside the outcome.
pub async fn ask(state: &AppState, question: &str) -> Result<(String, ResponseOutcome)> {
    let provider = state
        .provider()
        .ok_or_else(|| ChatSheetError::LLMApiKeyMissing("OpenAI".to_string()))?;

    let schema = describe_tables(state).await?;
    let response = provider.generate_sql_response(&schema, question).await?;
    tracing::debug!(chars = response.len(), "received model response");

    let outcome = run_response(state, &response).await;
    Ok((response, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::executor::QueryOutput;

    #[test]
    fn test_render_with_results() {
        let outcome = ResponseOutcome {
            parsed: ParsedResponse {
                sql: Some("SELECT 1 AS one".to_string()),
                explanation: "=== one".to_string(),
            },
            execution: ExecutionOutcome::Completed(QueryOutput {
                columns: vec!["one".to_string()],
                rows: vec![vec!["1".to_string()]],
            }),
        };

        let rendered = outcome.render();
        assert!(rendered.starts_with("Explanation:\n=== one\n"));
        assert!(rendered.contains("Query Results:"));
        assert!(rendered.contains("one"));
    }

    #[test]
    fn test_render_without_query() {
        let outcome = ResponseOutcome {
            parsed: ParsedResponse {
                sql: None,
                explanation: "No explanation provided.".to_string(),
            },
            execution: ExecutionOutcome::NoQuery,
        };

        assert_eq!(
            outcome.render(),
            "Explanation:\nNo explanation provided.\nNo SQL query found in the response."
        );
    }
}
