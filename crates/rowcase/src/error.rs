//! Error types for the rowcase library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where a table row came from, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// File the row was read from, if any.
    pub file: Option<PathBuf>,
    /// Line number (1-based) if known.
    pub line: Option<u32>,
}

impl Location {
    /// Create a location from an optional file and line.
    pub fn new(file: Option<PathBuf>, line: Option<u32>) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file.display(), line),
            (Some(file), None) => write!(f, "{}", file.display()),
            (None, Some(line)) => write!(f, "line {}", line),
            (None, None) => write!(f, "unknown location"),
        }
    }
}

/// Main error type for rowcase operations.
#[derive(Debug, Error)]
pub enum RowcaseError {
    /// A cell parsed as a literal but could not be turned into a value.
    #[error("Malformed cell `{cell}` in row `{row}` at {location}: {message}")]
    MalformedCell {
        cell: String,
        row: String,
        location: Location,
        message: String,
    },

    /// A data row does not have as many cells as the header.
    #[error(
        "Row `{row}` at {location} has {found} cell(s), expected {expected} to match headers {}",
        render_headers(.headers)
    )]
    ColumnCountMismatch {
        row: String,
        expected: usize,
        found: usize,
        headers: Vec<String>,
        location: Location,
    },

    /// A header names the same column twice.
    #[error(
        "Header `{header}` appears more than once in headers {} at {location}",
        render_headers(.headers)
    )]
    DuplicateHeader {
        header: String,
        headers: Vec<String>,
        location: Location,
    },

    /// Records of a hand-written list do not share one key set.
    #[error("Records have inconsistent keys, found key sets: {}", render_key_sets(.key_sets))]
    InconsistentKeys { key_sets: Vec<Vec<String>> },

    /// File extension is not one of the supported table formats.
    #[error("Unsupported file extension for '{}', expected .md, .markdown, .csv or .tsv", .0.display())]
    UnsupportedFileExtension(PathBuf),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Table without a header row.
    #[error("Empty table: {0}")]
    EmptyTable(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rowcase operations.
pub type Result<T> = std::result::Result<T, RowcaseError>;

/// Render a header list as `[a, b]`.
pub(crate) fn render_headers(headers: &[String]) -> String {
    format!("[{}]", headers.join(", "))
}

fn render_key_sets(key_sets: &[Vec<String>]) -> String {
    key_sets
        .iter()
        .map(|set| render_headers(set))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mismatch_message() {
        let err = RowcaseError::ColumnCountMismatch {
            row: "| 1 |".to_string(),
            expected: 2,
            found: 1,
            headers: vec!["a".to_string(), "b".to_string()],
            location: Location::new(Some(PathBuf::from("cases.md")), Some(4)),
        };

        let msg = err.to_string();
        assert!(msg.contains("| 1 |"));
        assert!(msg.contains("[a, b]"));
        assert!(msg.contains("cases.md:4"));
    }

    #[test]
    fn test_duplicate_header_message() {
        let err = RowcaseError::DuplicateHeader {
            header: "a".to_string(),
            headers: vec!["a".to_string(), "a".to_string()],
            location: Location::new(Some(PathBuf::from("cases.csv")), Some(1)),
        };

        assert_eq!(
            err.to_string(),
            "Header `a` appears more than once in headers [a, a] at cases.csv:1"
        );
    }

    #[test]
    fn test_inconsistent_keys_message() {
        let err = RowcaseError::InconsistentKeys {
            key_sets: vec![
                vec!["a".to_string()],
                vec!["a".to_string(), "b".to_string()],
            ],
        };

        assert_eq!(
            err.to_string(),
            "Records have inconsistent keys, found key sets: [a], [a, b]"
        );
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::default().to_string(), "unknown location");
        assert_eq!(Location::new(None, Some(7)).to_string(), "line 7");
    }
}
