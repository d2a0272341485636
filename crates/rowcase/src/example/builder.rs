//! Zips header keys with evaluated cells.

use std::path::PathBuf;

use tracing::trace;

use super::record::{ExampleRecord, ParsedExample, RowContext};
use crate::value::Value;

/// Builds records for one table. Keys keep header order.
#[derive(Debug, Clone)]
pub struct ExampleBuilder {
    headers: Vec<String>,
    source_file: Option<PathBuf>,
}

impl ExampleBuilder {
    /// Create a builder for a table with the given header keys.
    pub fn new(headers: Vec<String>, source_file: Option<PathBuf>) -> Self {
        Self {
            headers,
            source_file,
        }
    }

    /// Header keys in declaration order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Build one example. `cells` must already match the header width.
    pub fn build(&self, cells: Vec<Value>, line: u32, min_line: u32, raw: &str) -> ParsedExample {
        debug_assert_eq!(cells.len(), self.headers.len());

        let record: ExampleRecord = self.headers.iter().cloned().zip(cells).collect();
        let context = RowContext::new(self.source_file.clone(), line)
            .with_min_line(min_line)
            .with_raw_text(raw);

        trace!(line, keys = record.len(), "built example");
        ParsedExample::new(record, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_zips_in_header_order() {
        let builder = ExampleBuilder::new(
            vec!["b".to_string(), "a".to_string()],
            Some(PathBuf::from("t.md")),
        );
        let example = builder.build(vec![Value::from(1), Value::from(2)], 5, 4, "| 1 | 2 |");

        assert_eq!(example.record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(example.record.get("a"), Some(&Value::from(2)));
        assert_eq!(example.context.declared_line, 5);
        assert_eq!(example.context.min_line, 4);
        assert_eq!(example.context.raw_text.as_deref(), Some("| 1 | 2 |"));
        assert_eq!(example.context.source_path(), Some(std::path::Path::new("t.md")));
    }
}
