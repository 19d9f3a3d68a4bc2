//! Database module
//!
//! This module provides the store connection, the schema catalog reader,
//! table materialization and query execution.

pub mod catalog;
pub mod connection;
pub mod executor;
pub mod materializer;
pub mod schema;

// Re-exports
pub use connection::Store;
pub use executor::{ExecutionOutcome, QueryExecutor, QueryOutput};
pub use schema::{Column, ColumnDefinition, SchemaCatalog, StorageType, Table, TableDefinition};
