//! Integration tests for ChatSheet
//!
//! Exercise the load and query pipelines against a real SQLite file in a
//! temporary directory.

use async_trait::async_trait;
use chat_sheet::cli::commands::{format_error, handle_command, Command, CommandType};
use chat_sheet::config::{AppState, Config};
use chat_sheet::database::catalog;
use chat_sheet::database::executor::ExecutionOutcome;
use chat_sheet::error::{ChatSheetError, Result};
use chat_sheet::ingest::{Decision, ScriptedResolver};
use chat_sheet::llm::{GenerationParams, LLMProvider, LLMResponse, Message};
use chat_sheet::pipeline::{self, LoadOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PEOPLE_CSV: &str = "name,age,score,active,joined\n\
                          Alice,30,9.5,true,2024-01-15\n\
                          Bob,25,7.25,false,2024-02-20\n\
                          Carol,41,,true,2024-03-25\n";

const MORE_PEOPLE_CSV: &str = "name,age,score,active,joined\n\
                               Dave,52,6.0,false,2023-12-01\n";

/// Fresh state rooted in its own temporary directory
async fn setup() -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = AppState::open(Config::in_dir(dir.path()))
        .await
        .expect("Failed to open state");
    (dir, state)
}

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write CSV");
    path
}

fn log_contents(state: &AppState) -> String {
    fs::read_to_string(state.error_log.path()).unwrap_or_default()
}

/// Provider that always answers with the same text
struct CannedProvider {
    answer: String,
}

#[async_trait]
impl LLMProvider for CannedProvider {
    async fn generate(
        &self,
        messages: &[Message],
        _params: Option<&GenerationParams>,
    ) -> Result<LLMResponse> {
        assert!(!messages.is_empty());
        Ok(LLMResponse::new(self.answer.clone()))
    }

    fn provider_name(&self) -> &str {
        "Canned"
    }

    fn has_api_key(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn test_load_creates_typed_table() {
    let (dir, state) = setup().await;
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();

    let outcome = pipeline::load_csv(&state, &csv, "people", &mut resolver)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            table: "people".to_string(),
            rows: 3
        }
    );

    let listing = pipeline::describe_tables(&state).await.unwrap();
    assert_eq!(
        listing,
        "- people (name TEXT, age INTEGER, score REAL, active INTEGER, joined TEXT)"
    );
    assert!(resolver.asked().is_empty());
}

#[tokio::test]
async fn test_missing_file_creates_nothing() {
    let (dir, state) = setup().await;
    let mut resolver = ScriptedResolver::default();

    let command = Command::parse(&format!("load {} people", dir.path().join("nope.csv").display())).unwrap();
    let result = handle_command(&command, &state, &mut resolver).await;

    assert!(matches!(result, Err(ChatSheetError::SourceNotFound(_))));
    assert!(catalog::table_names(&state.store).await.unwrap().is_empty());
    // Ingestion failures are reported, not logged
    assert!(log_contents(&state).is_empty());
}

#[tokio::test]
async fn test_empty_files_create_nothing() {
    let (dir, state) = setup().await;
    let empty = write_csv(dir.path(), "empty.csv", "");
    let header_only = write_csv(dir.path(), "header.csv", "a,b,c\n");
    let mut resolver = ScriptedResolver::default();

    for path in [&empty, &header_only] {
        let result = pipeline::load_csv(&state, path, "t", &mut resolver).await;
        assert!(matches!(result, Err(ChatSheetError::EmptySource(_))));
    }
    assert!(catalog::table_names(&state.store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_skip_keeps_existing_rows() {
    let (dir, state) = setup().await;
    let first = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let second = write_csv(dir.path(), "more.csv", MORE_PEOPLE_CSV);
    let mut resolver = ScriptedResolver::new([Decision::Skip]);

    pipeline::load_csv(&state, &first, "people", &mut resolver).await.unwrap();
    let outcome = pipeline::load_csv(&state, &second, "people", &mut resolver)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Skipped {
            table: "people".to_string()
        }
    );
    assert_eq!(catalog::row_count(&state.store, "people").await.unwrap(), 3);
    assert_eq!(resolver.asked(), &["people".to_string()]);
}

#[tokio::test]
async fn test_overwrite_replaces_rows() {
    let (dir, state) = setup().await;
    let first = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let second = write_csv(dir.path(), "more.csv", MORE_PEOPLE_CSV);
    let mut resolver = ScriptedResolver::new([Decision::Overwrite]);

    pipeline::load_csv(&state, &first, "people", &mut resolver).await.unwrap();
    pipeline::load_csv(&state, &second, "people", &mut resolver).await.unwrap();

    match pipeline::run_query(&state, "SELECT name FROM people").await {
        ExecutionOutcome::Completed(output) => {
            assert_eq!(output.rows, vec![vec!["Dave".to_string()]]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_rename_loads_into_new_table() {
    let (dir, state) = setup().await;
    let first = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let second = write_csv(dir.path(), "more.csv", MORE_PEOPLE_CSV);
    let mut resolver = ScriptedResolver::new([Decision::RenameTo("people_2023".to_string())]);

    pipeline::load_csv(&state, &first, "people", &mut resolver).await.unwrap();
    let outcome = pipeline::load_csv(&state, &second, "people", &mut resolver)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            table: "people_2023".to_string(),
            rows: 1
        }
    );
    assert_eq!(catalog::row_count(&state.store, "people").await.unwrap(), 3);
    assert_eq!(catalog::row_count(&state.store, "people_2023").await.unwrap(), 1);
}

#[tokio::test]
async fn test_run_response_executes_fenced_sql() {
    let (dir, state) = setup().await;
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();
    pipeline::load_csv(&state, &csv, "people", &mut resolver).await.unwrap();

    let response = "Sure.\n```sql\nSELECT name FROM people WHERE active = 1 ORDER BY name;\n```\n\
                    '''explanation\n=== Active people, alphabetically.\n'''";
    let outcome = pipeline::run_response(&state, response).await;

    assert_eq!(outcome.parsed.explanation, "=== Active people, alphabetically.");
    match &outcome.execution {
        ExecutionOutcome::Completed(output) => {
            assert_eq!(output.columns, vec!["name"]);
            assert_eq!(
                output.rows,
                vec![vec!["Alice".to_string()], vec!["Carol".to_string()]]
            );
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_fence_runs_nothing() {
    let (dir, state) = setup().await;
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();
    pipeline::load_csv(&state, &csv, "people", &mut resolver).await.unwrap();

    let outcome = pipeline::run_response(&state, "```sql\n```\nSQL Query: DROP TABLE people").await;

    assert_eq!(outcome.parsed.sql, None);
    assert_eq!(outcome.execution, ExecutionOutcome::NoQuery);
    assert!(outcome.render().contains("No SQL query found in the response."));
    assert_eq!(catalog::table_names(&state.store).await.unwrap(), vec!["people"]);
}

#[tokio::test]
async fn test_failed_load_is_logged_with_generic_notice() {
    let (dir, state) = setup().await;
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();

    let command = Command::parse(&format!("load {} sqlite_x", csv.display())).unwrap();
    let err = handle_command(&command, &state, &mut resolver)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatSheetError::Materialize { ref table, .. } if table == "sqlite_x"));

    let notice = format_error(&err);
    assert!(notice.contains("'sqlite_x'"));
    assert!(!notice.contains("reserved"));

    let log = log_contents(&state);
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("] materialize: Failed to materialize table 'sqlite_x'"));
    assert!(catalog::table_names(&state.store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_table_is_logged_and_reported() {
    let (_dir, state) = setup().await;
    let mut resolver = ScriptedResolver::default();

    let command = Command::parse("query SELECT * FROM ghosts").unwrap();
    let message = handle_command(&command, &state, &mut resolver).await.unwrap();

    assert!(message.contains("no such table: ghosts"));
    let log = log_contents(&state);
    assert_eq!(log.lines().count(), 1);
    assert!(log.starts_with('['));
    assert!(log.contains("no such table: ghosts"));
}

#[tokio::test]
async fn test_catalog_tracks_session_changes() {
    let (dir, state) = setup().await;
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();

    pipeline::load_csv(&state, &csv, "people", &mut resolver).await.unwrap();
    pipeline::run_query(&state, "CREATE TABLE notes (body TEXT)").await;
    let listing = pipeline::describe_tables(&state).await.unwrap();
    assert!(listing.contains("- notes (body TEXT)"));
    assert!(listing.contains("- people ("));

    pipeline::run_query(&state, "DROP TABLE people").await;
    let listing = pipeline::describe_tables(&state).await.unwrap();
    assert_eq!(listing, "- notes (body TEXT)");
}

#[tokio::test]
async fn test_ask_uses_provider_and_runs_answer() {
    let (dir, state) = setup().await;
    let state = state.with_provider(Box::new(CannedProvider {
        answer: "```sql\nSELECT COUNT(*) AS total FROM people;\n```\n'''explanation\n=== Counts people.\n'''"
            .to_string(),
    }));
    let csv = write_csv(dir.path(), "people.csv", PEOPLE_CSV);
    let mut resolver = ScriptedResolver::default();
    pipeline::load_csv(&state, &csv, "people", &mut resolver).await.unwrap();

    let (raw, outcome) = pipeline::ask(&state, "how many people are there?").await.unwrap();
    assert!(raw.contains("SELECT COUNT(*)"));
    match outcome.execution {
        ExecutionOutcome::Completed(output) => {
            assert_eq!(output.columns, vec!["total"]);
            assert_eq!(output.rows, vec![vec!["3".to_string()]]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_ask_without_provider() {
    let (_dir, state) = setup().await;
    let result = pipeline::ask(&state, "anything").await;
    assert!(matches!(result, Err(ChatSheetError::LLMApiKeyMissing(_))));
}

#[tokio::test]
async fn test_command_surface() {
    let (_dir, state) = setup().await;
    let mut resolver = ScriptedResolver::default();

    let tables = Command::parse("tables").unwrap();
    let message = handle_command(&tables, &state, &mut resolver).await.unwrap();
    assert_eq!(message, "No tables loaded.");

    let run = Command::parse("run no sql here").unwrap();
    let message = handle_command(&run, &state, &mut resolver).await.unwrap();
    assert!(message.contains("No explanation provided."));
    assert!(message.contains("No SQL query found in the response."));

    let quit = Command::parse("exit").unwrap();
    assert_eq!(quit.command_type, CommandType::Quit);
    let message = handle_command(&quit, &state, &mut resolver).await.unwrap();
    assert_eq!(message, "Exiting ChatSheet...");

    assert!(matches!(
        Command::parse("frobnicate now"),
        Err(ChatSheetError::UnknownCommand(_))
    ));
}
