//! Test names for parsed examples.
//!
//! A name is a pure function of the base name, the row index, the record and
//! the length budget. Records that compare equal produce the same name no
//! matter in which order their keys were inserted, so "re-run failed tests"
//! by name keeps working across runs.

use std::collections::HashSet;

use tracing::trace;

use crate::example::{ExampleRecord, ParsedExample};

/// Default maximum name length, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 212;

/// Name one example.
///
/// 1. `"{base} - {description}"` when the record has a description.
/// 2. Otherwise `"{base} (k: v, ...)"` with keys sorted.
/// 3. If that fits in `max_len` characters it is used as is.
/// 4. An over-long listing falls back to `"{base} row {index}"`.
/// 5. An over-long description is cut to exactly `max_len` characters.
pub fn synthesize(base: &str, index: usize, record: &ExampleRecord, max_len: usize) -> String {
    let description = record.description();
    let candidate = match &description {
        Some(desc) => format!("{} - {}", base, desc),
        None => format!("{} ({})", base, listing(record)),
    };

    if candidate.chars().count() <= max_len {
        return candidate;
    }

    match description {
        None => row_name(base, index),
        Some(_) => candidate.chars().take(max_len).collect(),
    }
}

/// Name every example of one batch.
///
/// A row whose name repeats an earlier one (identical rows, or rows sharing a
/// description) gets the `"{base} row {index}"` form instead. That form never
/// collides with the other two, which start with `"{base} ("` and
/// `"{base} - "`.
pub fn synthesize_batch(base: &str, examples: &[ParsedExample], max_len: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(examples.len());

    examples
        .iter()
        .enumerate()
        .map(|(index, example)| {
            let mut name = synthesize(base, index, &example.record, max_len);
            if seen.contains(&name) {
                trace!(index, name = %name, "duplicate test name, using row index");
                name = row_name(base, index);
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn row_name(base: &str, index: usize) -> String {
    format!("{} row {}", base, index)
}

/// `k: v` pairs in sorted key order.
fn listing(record: &ExampleRecord) -> String {
    let mut pairs: Vec<_> = record.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}: {}", key, value.canonical()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::RowContext;
    use crate::value::Value;

    fn example(record: ExampleRecord) -> ParsedExample {
        ParsedExample::new(record, RowContext::new(None, 1))
    }

    #[test]
    fn test_listing_name() {
        let record = ExampleRecord::new()
            .with("b", "two")
            .with("a", 1)
            .with("c", Value::Symbol("ok".into()));
        assert_eq!(
            synthesize("adds", 0, &record, DEFAULT_MAX_NAME_LEN),
            "adds (a: 1, b: \"two\", c: :ok)"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let first = ExampleRecord::new().with("x", 1).with("y", vec![1, 2]);
        let second = ExampleRecord::new().with("y", vec![1, 2]).with("x", 1);
        assert_eq!(
            synthesize("t", 3, &first, DEFAULT_MAX_NAME_LEN),
            synthesize("t", 3, &second, DEFAULT_MAX_NAME_LEN)
        );
    }

    #[test]
    fn test_description_name() {
        let record = ExampleRecord::new()
            .with("input", 1)
            .with("test_description", "handles one");
        assert_eq!(synthesize("t", 0, &record, 212), "t - handles one");
    }

    #[test]
    fn test_long_listing_falls_back_to_row_index() {
        let record = ExampleRecord::new().with("text", "x".repeat(300));
        assert_eq!(synthesize("parses", 7, &record, 212), "parses row 7");
    }

    #[test]
    fn test_long_description_is_truncated() {
        let record = ExampleRecord::new().with("description", "é".repeat(50));
        let name = synthesize("base", 0, &record, 20);
        assert_eq!(name.chars().count(), 20);
        assert!(name.starts_with("base - é"));
    }

    #[test]
    fn test_fits_exactly_at_budget() {
        let record = ExampleRecord::new().with("a", 1);
        let name = synthesize("b", 0, &record, 8);
        assert_eq!(name, "b (a: 1)");
        assert_eq!(synthesize("b", 0, &record, 7), "b row 0");
    }

    #[test]
    fn test_batch_names_are_unique() {
        let examples = vec![
            example(ExampleRecord::new().with("a", 1)),
            example(ExampleRecord::new().with("a", 1)),
            example(ExampleRecord::new().with("description", "same")),
            example(ExampleRecord::new().with("description", "same")),
        ];
        let names = synthesize_batch("t", &examples, 212);
        assert_eq!(names, vec!["t (a: 1)", "t row 1", "t - same", "t row 3"]);
    }
}
