//! Ingestion module
//!
//! Reading CSV sources, inferring their column types and deciding which
//! table a load writes into.

pub mod conflict;
pub mod inference;
pub mod source;

// Re-exports
pub use conflict::{ConflictResolver, Decision, ScriptedResolver};
pub use inference::ValueType;
pub use source::{CellValue, DataSource, SourceColumn};
