//! REPL implementation
//!
//! This module implements the interactive Read-Eval-Print Loop for ChatSheet.

use crate::cli::commands::{self, format_error, Command, CommandType};
use crate::cli::prompt::TerminalResolver;
use crate::config::AppState;
use crate::error::{ChatSheetError, Result};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::Context;
use rustyline::Helper;
use rustyline::{CompletionType, Config, Editor};
use std::path::{Path, PathBuf};

/// Command keywords offered for completion
const COMMANDS: &[&str] = &["load", "tables", "query", "ask", "run", "help", "exit", "quit"];

/// ChatSheet command completer
struct ChatSheetCompleter;

impl Completer for ChatSheetCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> std::result::Result<(usize, Vec<String>), ReadlineError> {
        let prefix = &line[..pos];

        // Only the leading keyword is completed
        if prefix.contains(char::is_whitespace) {
            return Ok((0, vec![]));
        }

        let prefix = prefix.to_lowercase();
        let matches = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|s| s.to_string())
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for ChatSheetCompleter {
    type Hint = String;
}

impl Highlighter for ChatSheetCompleter {}

impl Validator for ChatSheetCompleter {}

impl Helper for ChatSheetCompleter {}

/// ChatSheet REPL
pub struct Repl {
    /// The rustyline editor
    editor: Editor<ChatSheetCompleter, DefaultHistory>,
    /// Whether the REPL should continue running
    running: bool,
    /// Application state
    state: AppState,
    /// History file
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(state: AppState) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();

        let mut editor = Editor::<ChatSheetCompleter, DefaultHistory>::with_config(config)
            .map_err(|e| {
                ChatSheetError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to initialize editor: {}", e),
                ))
            })?;

        editor.set_helper(Some(ChatSheetCompleter));

        let history_path = dirs::home_dir()
            .map(|p| p.join(".chat-sheet").join("history"))
            .unwrap_or_else(|| ".chat-sheet-history".into());

        if let Err(e) = editor.load_history(&history_path) {
            // History file doesn't exist yet, that's fine
            tracing::debug!(error = %e, "could not load history");
        }

        Ok(Self {
            editor,
            running: true,
            state,
            history_path,
        })
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        while self.running {
            match self.editor.readline(">> ") {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    // Add to history (ignore result as history failure is non-critical)
                    let _ = self.editor.add_history_entry(line);

                    match Command::parse(line) {
                        Ok(command) => self.handle_command(command).await,
                        Err(e) => println!("{}", format_error(&e)),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    self.running = false;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    self.running = false;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Consume the REPL, returning the application state
    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("Welcome to ChatSheet v{}!", env!("CARGO_PKG_VERSION"));
        println!("Store: {}", self.state.store.path().display());
        println!("Error log: {}", self.state.error_log.path().display());
        if self.state.provider().is_none() {
            println!("No model credential configured; 'ask' is unavailable.");
        }
        println!("Type 'help' for available commands.");
        println!();
    }

    /// Handle a command
    async fn handle_command(&mut self, command: Command) {
        let mut resolver = TerminalResolver::new(&mut self.editor);

        match commands::handle_command(&command, &self.state, &mut resolver).await {
            Ok(msg) => println!("{}", msg),
            Err(e) => println!("{}", format_error(&e)),
        }

        if command.command_type == CommandType::Quit {
            self.running = false;
        }
    }

    fn save_history(&mut self) {
        if let Err(e) = create_history_dir(&self.history_path) {
            tracing::debug!(path = %self.history_path.display(), error = %e, "could not create history directory");
        }
        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::debug!(error = %e, "could not save history");
        }
    }
}

/// Create the directory holding the history file
fn create_history_dir(history_path: &Path) -> std::io::Result<()> {
    match history_path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}
