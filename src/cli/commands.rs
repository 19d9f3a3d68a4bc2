//! Command handlers for CLI
//!
//! Parses REPL lines into commands and runs them against the application
//! state. Every failure is turned into a message here; nothing escapes to
//! the loop.

use crate::config::AppState;
use crate::error::{ChatSheetError, Result};
use crate::ingest::conflict::ConflictResolver;
use crate::pipeline::{self, LoadOutcome};
use std::path::PathBuf;

/// Help text
const HELP: &str = r#"
ChatSheet Commands

Data:
  load <csv_file> <table>   Load a CSV file into a table
  tables                    List tables and their columns

Queries:
  query <sql>               Run a SQL statement directly
  ask <question>            Ask the model for SQL and run it
  run <model response>      Run the SQL found in a pasted model response

Session:
  help                      Show this help message
  exit, quit                Exit ChatSheet

Examples:
  load sales.csv sales
  query SELECT region, SUM(amount) FROM sales GROUP BY region
  ask which region sold the most?
"#;

/// Command types
#[derive(Debug, Clone, PartialEq)]
pub enum CommandType {
    /// Ingest a CSV file into a table
    Load { file: PathBuf, table: String },
    /// Print the schema listing
    Tables,
    /// Execute raw SQL
    Query { sql: String },
    /// Parse a model response and execute its SQL
    Run { response: String },
    /// Ask the model a question
    Ask { question: String },
    /// Show help message
    Help,
    /// Exit the application
    Quit,
}

/// Parsed command
#[derive(Debug, Clone)]
pub struct Command {
    /// The type of command
    pub command_type: CommandType,
}

impl Command {
    /// Parse a command from user input.
    ///
    /// Only the keyword is case-insensitive; arguments keep their case.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (keyword, rest) = match input.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (input, ""),
        };

        let command_type = match keyword.to_lowercase().as_str() {
            "load" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(ChatSheetError::InvalidCommandSyntax {
                        command: "load".to_string(),
                        expected: "load <csv_file> <table_name>".to_string(),
                    });
                }
                CommandType::Load {
                    file: PathBuf::from(parts[0]),
                    table: parts[1].to_string(),
                }
            }
            "tables" => CommandType::Tables,
            "query" => CommandType::Query {
                sql: required(rest, "query", "query <sql>")?,
            },
            "run" => CommandType::Run {
                response: required(rest, "run", "run <model response>")?,
            },
            "ask" => CommandType::Ask {
                question: required(rest, "ask", "ask <question>")?,
            },
            "help" => CommandType::Help,
            "exit" | "quit" => CommandType::Quit,
            _ => return Err(ChatSheetError::UnknownCommand(keyword.to_string())),
        };

        Ok(Command { command_type })
    }
}

fn required(rest: &str, command: &str, expected: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(ChatSheetError::InvalidCommandSyntax {
            command: command.to_string(),
            expected: expected.to_string(),
        });
    }
    Ok(rest.to_string())
}

/// Handle a command and return the message to print.
///
/// Store and execution failures are written to the error log before being
/// returned.
pub async fn handle_command(
    command: &Command,
    state: &AppState,
    resolver: &mut dyn ConflictResolver,
) -> Result<String> {
    dispatch(command, state, resolver).await.map_err(|e| {
        if e.is_logged() {
            state.error_log.record(&e);
        }
        e
    })
}

async fn dispatch(
    command: &Command,
    state: &AppState,
    resolver: &mut dyn ConflictResolver,
) -> Result<String> {
    match &command.command_type {
        CommandType::Load { file, table } => {
            match pipeline::load_csv(state, file, table, resolver).await? {
                LoadOutcome::Loaded { table, rows } => Ok(format!(
                    "✓ Table '{}' created from '{}' ({} rows).",
                    table,
                    file.display(),
                    rows
                )),
                LoadOutcome::Skipped { table } => {
                    Ok(format!("Skipped loading into existing table '{}'.", table))
                }
            }
        }
        CommandType::Tables => {
            let listing = pipeline::describe_tables(state).await?;
            if listing.is_empty() {
                Ok("No tables loaded.".to_string())
            } else {
                Ok(listing)
            }
        }
        CommandType::Query { sql } => Ok(pipeline::run_query(state, sql).await.render()),
        CommandType::Run { response } => Ok(pipeline::run_response(state, response).await.render()),
        CommandType::Ask { question } => {
            let (raw, outcome) = pipeline::ask(state, question).await?;
            Ok(format!("{}\n\n{}", raw.trim(), outcome.render()))
        }
        CommandType::Help => Ok(HELP.to_string()),
        CommandType::Quit => Ok("Exiting ChatSheet...".to_string()),
    }
}

/// Format an error for display
pub fn format_error(error: &ChatSheetError) -> String {
    match error {
        ChatSheetError::Materialize { table, .. } => format!(
            "Error: failed to load table '{}'. Details were written to the error log.",
            table
        ),
        ChatSheetError::SourceNotFound(_) | ChatSheetError::EmptySource(_) => error.to_string(),
        _ => format!("Error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_command() {
        let cmd = Command::parse("load data/Sales.csv Sales").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Load {
                file: PathBuf::from("data/Sales.csv"),
                table: "Sales".to_string()
            }
        );
    }

    #[test]
    fn test_parse_load_wrong_arity() {
        assert!(matches!(
            Command::parse("load only.csv"),
            Err(ChatSheetError::InvalidCommandSyntax { .. })
        ));
        assert!(Command::parse("load a.csv t extra").is_err());
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(Command::parse("TABLES").unwrap().command_type, CommandType::Tables);
        assert_eq!(Command::parse("Exit").unwrap().command_type, CommandType::Quit);
        assert_eq!(Command::parse("quit").unwrap().command_type, CommandType::Quit);
    }

    #[test]
    fn test_parse_query_keeps_case() {
        let cmd = Command::parse("query SELECT Name FROM People WHERE city = 'Oslo'").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Query {
                sql: "SELECT Name FROM People WHERE city = 'Oslo'".to_string()
            }
        );
    }

    #[test]
    fn test_parse_run_and_ask() {
        let cmd = Command::parse("run ```sql SELECT 1; ```").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Run {
                response: "```sql SELECT 1; ```".to_string()
            }
        );

        let cmd = Command::parse("ask how many rows are in sales?").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Ask {
                question: "how many rows are in sales?".to_string()
            }
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert!(Command::parse("query").is_err());
        assert!(Command::parse("ask   ").is_err());
        assert!(Command::parse("run").is_err());
    }

    #[test]
    fn test_unknown_command() {
        match Command::parse("SELECT * FROM sales") {
            Err(ChatSheetError::UnknownCommand(keyword)) => assert_eq!(keyword, "SELECT"),
            other => panic!("unexpected parse result: {:?}", other.map(|c| c.command_type)),
        }
    }

    #[test]
    fn test_format_materialize_error_is_generic() {
        let err = ChatSheetError::materialize("sales", "table sales has no column named x");
        let message = format_error(&err);
        assert!(message.contains("'sales'"));
        assert!(!message.contains("no column named"));
    }
}
