//! ChatSheet Library
//!
//! Loads CSV files into a SQLite store with inferred column types and runs
//! SQL extracted from language-model responses against it.
//! The main binary is in src/main.rs.

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod error_log;
pub mod ingest;
pub mod llm;
pub mod pipeline;
