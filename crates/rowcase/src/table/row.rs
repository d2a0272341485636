//! Line classification for pipe-markdown tables.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cells made of hyphens between pipes, each optionally padded by one space.
/// Alignment colons (`:---:`) are tolerated.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?(?: ?:?-+:? ?\|)*(?: ?:?-+:? ?)\|?$").expect("separator pattern is valid")
});

/// Whether a separator row has spaces around its hyphen runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// `| --- | --- |`
    Padded,
    /// `|-----|-----|`
    Unpadded,
}

/// Classification of one table line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    /// First data-like line of a table.
    Header { cells: Vec<String> },
    /// Hyphen separator line.
    Separator { padding: Padding },
    /// `#` comment line, text kept verbatim.
    Comment { text: String },
    /// Data row. A blank line is a data row with no cells.
    Data { cells: Vec<String> },
}

impl RowKind {
    /// Cells of header and data rows.
    pub fn cells(&self) -> Option<&[String]> {
        match self {
            RowKind::Header { cells } | RowKind::Data { cells } => Some(cells),
            _ => None,
        }
    }

    /// Data row with no cells (a blank line).
    pub fn is_blank(&self) -> bool {
        matches!(self, RowKind::Data { cells } if cells.is_empty())
    }
}

/// Classify one line. The line is trimmed first.
///
/// Never produces [`RowKind::Header`]; the header is decided by position, see
/// [`classify_table`].
pub fn classify(line: &str) -> RowKind {
    let line = line.trim();

    if line.is_empty() {
        return RowKind::Data { cells: Vec::new() };
    }
    if line.starts_with('#') {
        return RowKind::Comment {
            text: line.to_string(),
        };
    }
    if line.contains('-') && SEPARATOR.is_match(line) {
        let padding = if line.contains(' ') {
            Padding::Padded
        } else {
            Padding::Unpadded
        };
        return RowKind::Separator { padding };
    }

    RowKind::Data {
        cells: split_cells(line),
    }
}

/// Classify every line of a table, promoting the first data line to the header.
///
/// Blank lines before the header are skipped; blank lines after it are kept as
/// empty data rows.
pub fn classify_table(text: &str) -> Vec<RowKind> {
    let mut rows = Vec::new();
    let mut seen_header = false;

    for line in text.lines() {
        let kind = classify(line);
        match kind {
            RowKind::Data { cells } if !seen_header => {
                if cells.is_empty() {
                    continue;
                }
                seen_header = true;
                rows.push(RowKind::Header { cells });
            }
            other => rows.push(other),
        }
    }

    rows
}

/// Split a trimmed row on `|`, dropping the empty boundary cells produced by
/// leading and trailing pipes, and trimming each cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut parts: Vec<&str> = line.split('|').collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    if parts.len() > 1 && parts.first().is_some_and(|p| p.is_empty()) {
        parts.remove(0);
    }
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        assert_eq!(
            classify("| --- | --- |"),
            RowKind::Separator {
                padding: Padding::Padded
            }
        );
        assert_eq!(
            classify("|-----|---|"),
            RowKind::Separator {
                padding: Padding::Unpadded
            }
        );
        assert_eq!(
            classify("  |:---|---:|  "),
            RowKind::Separator {
                padding: Padding::Unpadded
            }
        );
        assert!(matches!(classify("| - |"), RowKind::Separator { .. }));
    }

    #[test]
    fn test_not_separators() {
        assert!(matches!(classify("| -1 | 2 |"), RowKind::Data { .. }));
        assert!(matches!(classify("|  ---  |"), RowKind::Data { .. }));
        assert!(matches!(classify("| a-b |"), RowKind::Data { .. }));
    }

    #[test]
    fn test_comment_and_blank() {
        assert_eq!(
            classify("  # skipped for now"),
            RowKind::Comment {
                text: "# skipped for now".to_string()
            }
        );
        assert!(classify("   ").is_blank());
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_cells("a | b"), vec!["a", "b"]);
        assert_eq!(split_cells("| a |  |"), vec!["a", ""]);
        assert_eq!(split_cells("| 1 |"), vec!["1"]);
    }

    #[test]
    fn test_classify_table_promotes_header() {
        let rows = classify_table("\n| a | b |\n|---|---|\n| 1 | 2 |\n\n# c\n");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].cells(), Some(&["a".to_string(), "b".to_string()][..]));
        assert!(matches!(rows[0], RowKind::Header { .. }));
        assert!(matches!(rows[1], RowKind::Separator { .. }));
        assert!(matches!(rows[2], RowKind::Data { .. }));
        assert!(rows[3].is_blank());
        assert!(matches!(rows[4], RowKind::Comment { .. }));
    }
}
