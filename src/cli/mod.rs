//! CLI module
//!
//! This module provides the command-line interface for ChatSheet,
//! including the REPL implementation and command handlers.

pub mod commands;
pub mod prompt;
pub mod repl;

// Re-exports
pub use repl::Repl;
