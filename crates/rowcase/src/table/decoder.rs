//! Table decoders: pipe-markdown text, pre-split delimited rows, and
//! hand-written record lists.
//!
//! All three produce the same thing, an ordered `Vec<ParsedExample>` whose
//! records share one key set.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::row::{RowKind, classify};
use crate::error::{Location, Result, RowcaseError};
use crate::example::{ExampleBuilder, ExampleRecord, ParsedExample, RowContext};
use crate::value::{CellSite, Value, evaluate};

/// Where an inline table was declared.
///
/// Callers usually pass `file!()` and `line!()` of the declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    /// File containing the declaration.
    pub file: Option<PathBuf>,
    /// Line of the header row, or of the declaration when unknown.
    pub line: u32,
}

impl Origin {
    /// Origin in a file at the given line.
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }

    /// Origin without a file; lines count from 1.
    pub fn detached() -> Self {
        Self { file: None, line: 1 }
    }
}

/// One row produced by a delimited-text reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedRow {
    /// Cell strings, unquoted but not trimmed.
    pub cells: Vec<String>,
    /// Physical line the row starts on.
    pub line: u32,
    /// Physical text of that line.
    pub raw: String,
}

/// Decode a pipe-markdown table.
///
/// The first data-like line is the header. Separator, comment and blank lines
/// are dropped before rows are numbered, so the n-th data row is given line
/// `origin.line + n`. That can be lower than the row's real line but never
/// higher, and is also used as the row's `min_line`.
pub fn decode_markdown(text: &str, origin: &Origin) -> Result<Vec<ParsedExample>> {
    let file = origin.file.as_deref();
    let mut lines = text.lines().map(str::trim);

    let headers = lines
        .by_ref()
        .find_map(|line| match classify(line) {
            RowKind::Data { cells } if !cells.is_empty() => Some(cells),
            _ => None,
        })
        .ok_or_else(|| RowcaseError::EmptyTable(describe(file, "no header row")))?;
    check_headers(&headers, file, origin.line)?;

    let builder = ExampleBuilder::new(headers, origin.file.clone());
    let mut examples = Vec::new();
    let mut line_no = origin.line;

    for line in lines {
        let cells = match classify(line) {
            RowKind::Data { cells } if !cells.is_empty() => cells,
            _ => continue,
        };
        line_no += 1;

        if let Some(example) = decode_row(&builder, &cells, line, file, line_no, line_no)? {
            examples.push(example);
        }
    }

    debug!(
        headers = ?builder.headers(),
        rows = examples.len(),
        file = ?file,
        "decoded markdown table"
    );
    Ok(examples)
}

/// Decode rows already split by a delimited-text reader. The first row is the
/// header.
pub fn decode_delimited(rows: Vec<DelimitedRow>, file: Option<&Path>) -> Result<Vec<ParsedExample>> {
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| RowcaseError::EmptyTable(describe(file, "no header row")))?;
    let headers: Vec<String> = header.cells.iter().map(|c| c.trim().to_string()).collect();
    check_headers(&headers, file, header.line)?;

    let builder = ExampleBuilder::new(headers, file.map(Path::to_path_buf));
    let mut examples = Vec::new();
    let mut min_line = header.line;

    for row in rows {
        min_line = min_line.max(row.line);
        let cells: Vec<String> = row.cells.iter().map(|c| c.trim().to_string()).collect();
        if let Some(example) = decode_row(&builder, &cells, row.raw.trim(), file, row.line, min_line)? {
            examples.push(example);
        }
    }

    debug!(
        headers = ?builder.headers(),
        rows = examples.len(),
        file = ?file,
        "decoded delimited table"
    );
    Ok(examples)
}

/// Validate a hand-written list of records and attach `origin` as context.
///
/// Empty records are dropped. The rest must share exactly one key set; if not,
/// the error lists every distinct key set, each sorted, in sorted order.
pub fn decode_records<I>(records: I, origin: &Origin) -> Result<Vec<ParsedExample>>
where
    I: IntoIterator<Item = ExampleRecord>,
{
    let records: Vec<ExampleRecord> = records.into_iter().filter(|r| !r.is_empty()).collect();

    let key_sets: BTreeSet<Vec<String>> = records.iter().map(ExampleRecord::key_set).collect();
    if key_sets.len() > 1 {
        return Err(RowcaseError::InconsistentKeys {
            key_sets: key_sets.into_iter().collect(),
        });
    }

    let examples: Vec<ParsedExample> = records
        .into_iter()
        .map(|record| ParsedExample::new(record, RowContext::new(origin.file.clone(), origin.line)))
        .collect();

    debug!(rows = examples.len(), "decoded record list");
    Ok(examples)
}

/// Check width, evaluate cells, and build the example. Rows whose cells are
/// all blank yield `None`.
fn decode_row(
    builder: &ExampleBuilder,
    cells: &[String],
    raw: &str,
    file: Option<&Path>,
    line: u32,
    min_line: u32,
) -> Result<Option<ParsedExample>> {
    let headers = builder.headers();
    if cells.len() != headers.len() {
        return Err(RowcaseError::ColumnCountMismatch {
            row: raw.to_string(),
            expected: headers.len(),
            found: cells.len(),
            headers: headers.to_vec(),
            location: Location::new(file.map(Path::to_path_buf), Some(line)),
        });
    }

    if cells.iter().all(|c| c.is_empty()) {
        return Ok(None);
    }

    let site = CellSite {
        row: raw,
        file,
        line: Some(line),
    };
    let values = cells
        .iter()
        .map(|cell| evaluate(cell, &site))
        .collect::<Result<Vec<Value>>>()?;

    Ok(Some(builder.build(values, line, min_line, raw)))
}

/// Every header cell becomes a record key, so each must be distinct.
fn check_headers(headers: &[String], file: Option<&Path>, line: u32) -> Result<()> {
    let mut seen = HashSet::with_capacity(headers.len());
    match headers.iter().find(|h| !seen.insert(h.as_str())) {
        Some(header) => Err(RowcaseError::DuplicateHeader {
            header: header.clone(),
            headers: headers.to_vec(),
            location: Location::new(file.map(Path::to_path_buf), Some(line)),
        }),
        None => Ok(()),
    }
}

fn describe(file: Option<&Path>, problem: &str) -> String {
    match file {
        Some(path) => format!("{} in '{}'", problem, path.display()),
        None => problem.to_string(),
    }
}
