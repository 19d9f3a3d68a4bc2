//! Error types for ChatSheet
//!
//! This module defines the error types used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ChatSheet
pub type Result<T> = std::result::Result<T, ChatSheetError>;

/// Main error type for ChatSheet
#[derive(Error, Debug)]
pub enum ChatSheetError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The CSV file to ingest does not exist
    #[error("CSV file '{}' not found.", .0.display())]
    SourceNotFound(PathBuf),

    /// The CSV file has no data rows
    #[error("CSV file '{}' is empty.", .0.display())]
    EmptySource(PathBuf),

    /// Table creation or bulk append failed
    #[error("Failed to materialize table '{table}': {message}")]
    Materialize { table: String, message: String },

    /// A SQL statement was rejected by the store
    #[error("Error executing SQL: {message}")]
    Execution { message: String },

    /// LLM API key missing
    #[error("No API key configured for provider '{0}'")]
    LLMApiKeyMissing(String),

    /// LLM API returned an error
    #[error("{provider} API error ({status}): {message}")]
    LLMApiError {
        provider: String,
        message: String,
        status: u16,
    },

    /// Command had the wrong shape
    #[error("Invalid syntax for '{command}'. Usage: {expected}")]
    InvalidCommandSyntax { command: String, expected: String },

    /// Command is not recognized
    #[error("Unknown command: '{0}'. Type 'help' for available commands.")]
    UnknownCommand(String),
}

impl ChatSheetError {
    /// Build a materialization error from the underlying cause
    pub fn materialize(table: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Materialize {
            table: table.into(),
            message: cause.to_string(),
        }
    }

    /// Build an execution error from the underlying cause
    pub fn execution(cause: impl std::fmt::Display) -> Self {
        Self::Execution {
            message: cause.to_string(),
        }
    }

    /// Short, stable label for the error category.
    ///
    /// Used as the prefix of error log records so the original cause and its
    /// category travel together.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Io(_) => "io",
            Self::Csv(_) | Self::SourceNotFound(_) | Self::EmptySource(_) => "ingest",
            Self::Http(_) | Self::LLMApiKeyMissing(_) | Self::LLMApiError { .. } => "llm",
            Self::ConfigParse(_) | Self::Config(_) => "config",
            Self::Materialize { .. } => "materialize",
            Self::Execution { .. } => "execution",
            Self::InvalidCommandSyntax { .. } | Self::UnknownCommand(_) => "command",
        }
    }

    /// Whether this failure belongs in the persistent error log.
    ///
    /// Ingestion, configuration and command errors are reported to the user
    /// only.
    pub fn is_logged(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Materialize { .. }
                | Self::Execution { .. }
                | Self::Http(_)
                | Self::LLMApiError { .. }
        )
    }
}
