//! Terminal conflict prompt
//!
//! Asks the user what to do when a load targets an existing table.

use crate::ingest::conflict::{ConflictResolver, Decision};
use rustyline::history::History;
use rustyline::{Editor, Helper};

/// Parsed answer to the overwrite / rename / skip question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Overwrite,
    Rename,
    Skip,
}

/// Interpret an answer. Anything unrecognized yields `None`.
pub fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "o" | "overwrite" => Some(Choice::Overwrite),
        "r" | "rename" => Some(Choice::Rename),
        "s" | "skip" => Some(Choice::Skip),
        _ => None,
    }
}

/// Resolver that prompts on the REPL's own editor
pub struct TerminalResolver<'a, H: Helper, I: History> {
    editor: &'a mut Editor<H, I>,
}

impl<'a, H: Helper, I: History> TerminalResolver<'a, H, I> {
    /// Borrow the editor for the duration of one command
    pub fn new(editor: &'a mut Editor<H, I>) -> Self {
        Self { editor }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::debug!(error = %e, "prompt aborted");
                None
            }
        }
    }
}

impl<H: Helper, I: History> ConflictResolver for TerminalResolver<'_, H, I> {
    fn resolve(&mut self, table: &str) -> Decision {
        let prompt = format!(
            "Table '{}' exists. Overwrite (o), Rename (r), or Skip (s)? ",
            table
        );
        let answer = match self.ask(&prompt) {
            Some(answer) => answer,
            None => return Decision::Skip,
        };

        match parse_choice(&answer) {
            Some(Choice::Overwrite) => Decision::Overwrite,
            Some(Choice::Rename) => match self.ask("Enter new table name: ") {
                Some(name) => Decision::RenameTo(name.trim().to_string()),
                None => Decision::Skip,
            },
            Some(Choice::Skip) => Decision::Skip,
            None => {
                tracing::warn!(table, answer = %answer.trim(), "unrecognized answer, skipping load");
                println!("Unrecognized answer '{}'; skipping.", answer.trim());
                Decision::Skip
            }
        }
    }
}
