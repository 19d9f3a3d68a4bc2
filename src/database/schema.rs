//! Schema data structures
//!
//! This module defines the table definitions proposed for ingestion and the
//! catalog view of tables that already exist in the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Storage class of a column in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    /// TEXT affinity
    Text,
    /// INTEGER affinity
    Integer,
    /// REAL affinity
    Real,
}

impl StorageType {
    /// SQL keyword for this storage type
    pub fn as_sql(&self) -> &'static str {
        match self {
            StorageType::Text => "TEXT",
            StorageType::Integer => "INTEGER",
            StorageType::Real => "REAL",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// A column of a proposed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, as read from the source header
    pub name: String,
    /// Storage type derived from the source values
    pub storage_type: StorageType,
}

/// A table to be created in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// Ordered columns
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create an empty definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column to the definition
    pub fn add_column(&mut self, name: impl Into<String>, storage_type: StorageType) {
        self.columns.push(ColumnDefinition {
            name: name.into(),
            storage_type,
        });
    }

    /// Idempotent `CREATE TABLE` statement for this definition
    pub fn create_statement(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.storage_type))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            quote_identifier(&self.name),
            columns.join(", ")
        )
    }

    /// Parameterized `INSERT` statement covering every column in order
    pub fn insert_statement(&self) -> String {
        let names: Vec<String> = self.columns.iter().map(|c| quote_identifier(&c.name)).collect();
        let placeholders = vec!["?"; self.columns.len()];

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(&self.name),
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Represents a column of an existing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type, as stored in the table definition (may be empty)
    pub column_type: String,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.column_type)
    }
}

/// Represents an existing table in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Table columns in declaration order
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// One catalog line: `- name (col1 type1, col2 type2)`
    pub fn format_line(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        format!("- {} ({})", self.name, columns.join(", "))
    }
}

/// All tables currently present in the store.
///
/// Always read fresh from the store; never held across commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Tables indexed by name
    pub tables: BTreeMap<String, Table>,
}

impl SchemaCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Whether the store holds no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Newline-separated listing, one table per line.
    ///
    /// This is the only schema context handed to the model.
    pub fn format_for_llm(&self) -> String {
        self.tables
            .values()
            .map(Table::format_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SchemaCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_for_llm())
    }
}
