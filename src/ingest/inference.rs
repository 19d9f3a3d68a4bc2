//! Schema Inferencer
//!
//! Derives a value type for every source column and maps it onto a storage
//! type with a fixed lookup. Anything the lookup does not recognize becomes
//! TEXT.

use crate::database::schema::{StorageType, TableDefinition};
use crate::ingest::source::{CellValue, DataSource};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date and date-time layouts recognized as temporal values
const TEMPORAL_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Uniform value type of a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Free text
    Text,
    /// 64-bit signed integer
    Integer,
    /// Floating point
    Real,
    /// `true` / `false`
    Boolean,
    /// Date or date-time
    Temporal,
    /// No non-empty value was seen
    Unknown,
}

impl ValueType {
    /// Storage type for this value type
    pub fn storage_type(&self) -> StorageType {
        match self {
            ValueType::Integer | ValueType::Boolean => StorageType::Integer,
            ValueType::Real => StorageType::Real,
            ValueType::Text | ValueType::Temporal => StorageType::Text,
            _ => StorageType::Text,
        }
    }

    /// Convert one raw cell to a value of this type.
    ///
    /// Empty cells are NULL. A cell that no longer fits the inferred type
    /// is kept as text.
    pub fn convert(&self, raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }

        match self {
            ValueType::Integer => trimmed
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ValueType::Real => trimmed
                .parse::<f64>()
                .map(CellValue::Real)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ValueType::Boolean => match parse_bool(trimmed) {
                Some(b) => CellValue::Integer(i64::from(b)),
                None => CellValue::Text(raw.to_string()),
            },
            ValueType::Temporal => CellValue::Text(trimmed.to_string()),
            ValueType::Text | ValueType::Unknown => CellValue::Text(raw.to_string()),
        }
    }
}

/// Infer the value type of a column from its raw cells
pub fn infer_value_type<'a, I>(values: I) -> ValueType
where
    I: IntoIterator<Item = &'a str>,
{
    let values: Vec<&str> = values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return ValueType::Unknown;
    }

    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        ValueType::Integer
    } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        ValueType::Real
    } else if values.iter().all(|v| parse_bool(v).is_some()) {
        ValueType::Boolean
    } else if values.iter().all(|v| is_temporal(v)) {
        ValueType::Temporal
    } else {
        ValueType::Text
    }
}

/// Propose a table definition for a data source.
///
/// The column count and order always match the source.
pub fn infer_table_definition(source: &DataSource, table_name: &str) -> TableDefinition {
    let mut definition = TableDefinition::new(table_name);

    for column in &source.columns {
        let storage_type = column.value_type.storage_type();
        tracing::debug!(
            column = %column.name,
            value_type = ?column.value_type,
            storage_type = %storage_type,
            "mapped column"
        );
        definition.add_column(&column.name, storage_type);
    }

    definition
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn is_temporal(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || TEMPORAL_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}
