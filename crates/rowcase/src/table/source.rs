//! Loading tables from files, dispatched on extension.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decoder::{DelimitedRow, Origin, decode_delimited, decode_markdown};
use crate::error::{Result, RowcaseError};
use crate::example::ParsedExample;

/// Table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// `.md` / `.markdown`, pipe tables.
    Markdown,
    /// `.csv`, comma separated with `"` quoting.
    Csv,
    /// `.tsv`, tab separated with `"` quoting.
    Tsv,
}

impl TableFormat {
    /// Pick the format from a file's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("md") | Some("markdown") => Ok(TableFormat::Markdown),
            Some("csv") => Ok(TableFormat::Csv),
            Some("tsv") => Ok(TableFormat::Tsv),
            _ => Err(RowcaseError::UnsupportedFileExtension(path.to_path_buf())),
        }
    }

    /// Field delimiter for delimited formats.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            TableFormat::Markdown => None,
            TableFormat::Csv => Some(b','),
            TableFormat::Tsv => Some(b'\t'),
        }
    }

    /// Short name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            TableFormat::Markdown => "markdown",
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
        }
    }
}

/// Read a file, keeping the path in the error.
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| RowcaseError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and decode a table file.
///
/// The extension is checked before the file is opened, so an unsupported
/// extension is reported even when the file does not exist.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<ParsedExample>> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    let contents = read_to_string(path)?;

    debug!(path = %path.display(), format = format.name(), "loading table file");

    match format.delimiter() {
        None => decode_markdown(&contents, &Origin::new(path, 1)),
        Some(delimiter) => {
            let rows = read_delimited(&contents, delimiter)?;
            decode_delimited(rows, Some(path))
        }
    }
}

/// Split delimited text into rows with their physical line numbers.
///
/// Rows may have any length; width is checked by the decoder so that the error
/// can name the header.
pub fn read_delimited(contents: &str, delimiter: u8) -> Result<Vec<DelimitedRow>> {
    let physical: Vec<&str> = contents.lines().collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quote(b'"')
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as u32)
            .unwrap_or(rows.len() as u32 + 1);
        let raw = physical
            .get(line.saturating_sub(1) as usize)
            .map(|s| s.to_string())
            .unwrap_or_default();

        rows.push(DelimitedRow {
            cells: record.iter().map(|s| s.to_string()).collect(),
            line,
            raw,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("a.md")).unwrap(), TableFormat::Markdown);
        assert_eq!(
            TableFormat::from_path(Path::new("a.MARKDOWN")).unwrap(),
            TableFormat::Markdown
        );
        assert_eq!(TableFormat::from_path(Path::new("a.csv")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a.tsv")).unwrap(), TableFormat::Tsv);
        assert!(matches!(
            TableFormat::from_path(Path::new("a.json")),
            Err(RowcaseError::UnsupportedFileExtension(_))
        ));
        assert!(TableFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_read_delimited_quotes_and_lines() {
        let rows = read_delimited("name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n\nx,y\n", b',').unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].cells, vec!["Smith, J", "said \"hi\""]);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[2].line, 4);
        assert_eq!(rows[2].raw, "x,y");
    }

    #[test]
    fn test_read_tsv() {
        let rows = read_delimited("a\tb\n1\t2\n", b'\t').unwrap();
        assert_eq!(rows[1].cells, vec!["1", "2"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, RowcaseError::Io { .. }));
    }
}
