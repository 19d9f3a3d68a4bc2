//! CSV data source
//!
//! Reads a delimited file with a header row into typed columns and rows.
//! A source is read once per load and then discarded.

use crate::error::{ChatSheetError, Result};
use crate::ingest::inference::{infer_value_type, ValueType};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::path::Path;

/// A single converted cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Null,
    /// Integer (also used for booleans)
    Integer(i64),
    /// Floating point
    Real(f64),
    /// Text (also used for temporal values)
    Text(String),
}

/// A named source column with its inferred value type
#[derive(Debug, Clone, PartialEq)]
pub struct SourceColumn {
    /// Column name from the header row
    pub name: String,
    /// Uniform value type of the column
    pub value_type: ValueType,
}

impl SourceColumn {
    /// Create a new column
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// Tabular data read from a file
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Columns in header order
    pub columns: Vec<SourceColumn>,
    /// Rows, each with one value per column
    pub rows: Vec<Vec<CellValue>>,
}

impl DataSource {
    /// Read a CSV file.
    ///
    /// Fails with [`ChatSheetError::SourceNotFound`] for a missing path and
    /// [`ChatSheetError::EmptySource`] when the file has no data rows.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ChatSheetError::SourceNotFound(path.to_path_buf()));
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ChatSheetError::EmptySource(path.to_path_buf()));
        }

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;
        if records.is_empty() {
            return Err(ChatSheetError::EmptySource(path.to_path_buf()));
        }

        let source = Self::from_records(&headers, &records);
        tracing::info!(
            path = %path.display(),
            columns = source.columns.len(),
            rows = source.rows.len(),
            "read data source"
        );
        Ok(source)
    }

    /// Build a source from an already-parsed header and records
    pub fn from_records(headers: &StringRecord, records: &[StringRecord]) -> Self {
        let names = column_names(headers);

        let columns: Vec<SourceColumn> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let value_type = infer_value_type(records.iter().map(|r| r.get(idx).unwrap_or("")));
                SourceColumn::new(name, value_type)
            })
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, column)| column.value_type.convert(record.get(idx).unwrap_or("")))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }
}

/// Column names from a header row.
///
/// Blank names become `Unnamed: <index>` and repeated names get a `.N`
/// suffix so every column can be created in the store.
fn column_names(headers: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (idx, raw) in headers.iter().enumerate() {
        let base = match raw.trim() {
            "" => format!("Unnamed: {}", idx),
            name => name.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.to_lowercase()) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    #[test]
    fn test_read_typed_columns() {
        let file = create_test_file(
            "id,name,score,active,joined\n\
             1,Alice,9.5,true,2024-01-15\n\
             2,Bob,,false,2024-02-20\n",
        );

        let source = DataSource::read(file.path()).unwrap();
        let types: Vec<ValueType> = source.columns.iter().map(|c| c.value_type).collect();
        assert_eq!(
            types,
            vec![
                ValueType::Integer,
                ValueType::Text,
                ValueType::Real,
                ValueType::Boolean,
                ValueType::Temporal,
            ]
        );
        assert_eq!(source.rows.len(), 2);
        assert_eq!(
            source.rows[1],
            vec![
                CellValue::Integer(2),
                CellValue::Text("Bob".to_string()),
                CellValue::Null,
                CellValue::Integer(0),
                CellValue::Text("2024-02-20".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(
            DataSource::read(&path),
            Err(ChatSheetError::SourceNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_empty_file() {
        let file = create_test_file("");
        assert!(matches!(
            DataSource::read(file.path()),
            Err(ChatSheetError::EmptySource(_))
        ));
    }

    #[test]
    fn test_header_only_file() {
        let file = create_test_file("a,b,c\n");
        assert!(matches!(
            DataSource::read(file.path()),
            Err(ChatSheetError::EmptySource(_))
        ));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let file = create_test_file("a,b\n1,2\n3\n");
        assert!(matches!(
            DataSource::read(file.path()),
            Err(ChatSheetError::Csv(_))
        ));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let headers = StringRecord::from(vec!["id", "", "id", "ID"]);
        assert_eq!(
            column_names(&headers),
            vec!["id", "Unnamed: 1", "id.1", "ID.2"]
        );
    }
}
