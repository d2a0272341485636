//! Parsed example records and their provenance.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Keys checked, in priority order, for a human-written row description.
pub const DESCRIPTION_KEYS: &[&str] = &["test_description", "test_desc", "description", "Description"];

/// One row's values keyed by header name, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleRecord {
    values: IndexMap<String, Value>,
}

impl ExampleRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Key/value pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys sorted, used to compare the shape of records.
    pub fn key_set(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The row description: the first non-nil value among [`DESCRIPTION_KEYS`].
    ///
    /// String-like values are returned verbatim, anything else rendered.
    pub fn description(&self) -> Option<String> {
        DESCRIPTION_KEYS
            .iter()
            .find_map(|key| self.values.get(*key).filter(|v| !v.is_nil()))
            .map(|value| match value.as_str() {
                Some(text) => text.to_string(),
                None => value.canonical(),
            })
    }

    /// Render as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ExampleRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, Value>> for ExampleRecord {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }
}

impl<'a> IntoIterator for &'a ExampleRecord {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Provenance of one parsed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowContext {
    /// File the table was declared in or read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
    /// Line reported for the row. Approximate for inline markdown tables.
    pub declared_line: u32,
    /// Lower bound on the row's real line; never decreases within a table.
    pub min_line: u32,
    /// Exact row text, used to find the row again at failure time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl RowContext {
    /// Context for a row at a known line.
    pub fn new(source_file: Option<PathBuf>, line: u32) -> Self {
        Self {
            source_file,
            declared_line: line,
            min_line: line,
            raw_text: None,
        }
    }

    /// Set the raw row text.
    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = Some(raw.into());
        self
    }

    /// Set the lower bound used when searching for the row.
    pub fn with_min_line(mut self, min_line: u32) -> Self {
        self.min_line = min_line;
        self
    }

    /// Source file as a path, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }
}

/// A record together with where it came from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedExample {
    pub record: ExampleRecord,
    pub context: RowContext,
}

impl ParsedExample {
    /// Pair a record with its context.
    pub fn new(record: ExampleRecord, context: RowContext) -> Self {
        Self { record, context }
    }
}
