//! Persistent error log
//!
//! Failure records are appended to a plain text file, one per line, in the
//! form `[<timestamp>] <message>`. The file is never read back or rotated.

use crate::error::{ChatSheetError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout of a record, matching `ctime(3)`
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Append-only error log
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Create a log writing to `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single record
    pub fn append(&self, message: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", timestamp, message.replace('\n', " "))?;
        Ok(())
    }

    /// Record an error as `<kind>: <message>`.
    ///
    /// A failure to write the log itself is traced and otherwise ignored so
    /// that logging never masks the original error.
    pub fn record(&self, error: &ChatSheetError) {
        let message = format!("{}: {}", error.kind(), error);
        if let Err(e) = self.append(&message) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write error log");
        }
    }
}
