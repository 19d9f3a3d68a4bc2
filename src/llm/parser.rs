//! Response Parser
//!
//! Extracts a SQL statement and an explanation from free-form model output.
//! The grammar is a small set of ordered rules:
//!
//! 1. a fenced ` ```sql ... ``` ` block (non-greedy, may span lines);
//! 2. otherwise a `SQL Query:` label, taking the rest of that line;
//! 3. otherwise no statement.
//!
//! A rule that matches decides the outcome even when its content is empty:
//! an empty fenced block means "no statement" and rule 2 is not tried.
//!
//! Independently, an `'''explanation ... '''` block supplies the explanation.
//! No SQL validation happens here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Explanation used when the response carries none
pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";

static FENCED_SQL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```sql\s*(.*?)```").expect("valid fenced SQL pattern"));

static LABELLED_SQL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SQL Query:\s*(.*)").expect("valid labelled SQL pattern"));

static EXPLANATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)'''explanation\s*(.*?)\s*'''").expect("valid explanation pattern")
});

/// Parsed model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Extracted statement, if any
    pub sql: Option<String>,
    /// Extracted explanation, or [`DEFAULT_EXPLANATION`]
    pub explanation: String,
}

/// Parse a full model response
pub fn parse_response(text: &str) -> ParsedResponse {
    let sql = extract_fenced_sql(text)
        .or_else(|| extract_labelled_sql(text))
        .filter(|sql| !sql.is_empty());
    let explanation = extract_explanation(text).unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    tracing::debug!(found_sql = sql.is_some(), "parsed model response");

    ParsedResponse { sql, explanation }
}

/// Rule 1: first ` ```sql ` fenced block.
///
/// `Some("")` means a block was found but is empty.
pub fn extract_fenced_sql(text: &str) -> Option<String> {
    first_capture(&FENCED_SQL, text)
}

/// Rule 2: first `SQL Query:` label
pub fn extract_labelled_sql(text: &str) -> Option<String> {
    first_capture(&LABELLED_SQL, text)
}

/// Explanation rule: first `'''explanation` block
pub fn extract_explanation(text: &str) -> Option<String> {
    first_capture(&EXPLANATION, text)
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
