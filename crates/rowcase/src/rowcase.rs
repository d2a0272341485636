//! Main Rowcase struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attribution::{Attributor, DEFAULT_FRAME_NAME_CAP, DEFAULT_TEST_PREFIX};
use crate::cases::CaseSet;
use crate::error::Result;
use crate::example::{ExampleRecord, ParsedExample};
use crate::identity::DEFAULT_MAX_NAME_LEN;
use crate::table::{Origin, decode_markdown, decode_records, load_file};

/// Configuration for parsing tables and naming cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowcaseConfig {
    /// Maximum length of a generated test name, in characters.
    pub max_name_len: usize,
    /// Prefix identifying the test function's frame in a failure trace.
    pub test_prefix: String,
    /// Maximum length of the synthetic row frame's name.
    pub frame_name_cap: usize,
}

impl Default for RowcaseConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            test_prefix: DEFAULT_TEST_PREFIX.to_string(),
            frame_name_cap: DEFAULT_FRAME_NAME_CAP,
        }
    }
}

impl RowcaseConfig {
    /// Set the maximum test name length.
    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// Set the test function prefix used for attribution.
    pub fn with_test_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.test_prefix = prefix.into();
        self
    }

    /// Set the cap on the synthetic frame name.
    pub fn with_frame_name_cap(mut self, cap: usize) -> Self {
        self.frame_name_cap = cap;
        self
    }

    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Attributor configured from these settings.
    pub fn attributor(&self) -> Attributor {
        Attributor::new(self.test_prefix.clone(), self.frame_name_cap)
    }
}

/// Entry point for turning parameter tables into named test cases.
///
/// # Example
///
/// ```
/// use rowcase::{Origin, Rowcase};
///
/// let rowcase = Rowcase::new();
/// let cases = rowcase
///     .markdown_cases(
///         "doubles",
///         "| input | expected |\n|---|---|\n| 2 | 4 |\n| 1_000 | 2_000 |",
///         &Origin::new(file!(), line!()),
///     )
///     .unwrap();
///
/// cases.assert_all(|row| {
///     let input = row.get("input").and_then(|v| v.as_i64()).unwrap_or_default();
///     let expected = row.get("expected").and_then(|v| v.as_i64()).unwrap_or_default();
///     if input * 2 == expected { Ok(()) } else { Err("mismatch") }
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rowcase {
    config: RowcaseConfig,
}

impl Rowcase {
    /// Create a Rowcase instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(RowcaseConfig::default())
    }

    /// Create a Rowcase instance with custom configuration.
    pub fn with_config(config: RowcaseConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &RowcaseConfig {
        &self.config
    }

    /// Parse an inline pipe-markdown table.
    pub fn parse_markdown(&self, text: &str, origin: &Origin) -> Result<Vec<ParsedExample>> {
        decode_markdown(text, origin)
    }

    /// Parse a `.md`, `.markdown`, `.csv` or `.tsv` file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<ParsedExample>> {
        load_file(path)
    }

    /// Validate a hand-written list of records.
    pub fn parse_records<I>(&self, records: I, origin: &Origin) -> Result<Vec<ParsedExample>>
    where
        I: IntoIterator<Item = ExampleRecord>,
    {
        decode_records(records, origin)
    }

    /// Name parsed examples and wrap them as cases.
    pub fn cases(&self, base: &str, examples: Vec<ParsedExample>) -> CaseSet {
        CaseSet::new(base, examples, &self.config)
    }

    /// Parse an inline markdown table straight into cases.
    pub fn markdown_cases(&self, base: &str, text: &str, origin: &Origin) -> Result<CaseSet> {
        Ok(self.cases(base, self.parse_markdown(text, origin)?))
    }

    /// Parse a table file straight into cases.
    pub fn file_cases(&self, base: &str, path: impl AsRef<Path>) -> Result<CaseSet> {
        Ok(self.cases(base, self.parse_file(path)?))
    }

    /// Validate records straight into cases.
    pub fn record_cases<I>(&self, base: &str, records: I, origin: &Origin) -> Result<CaseSet>
    where
        I: IntoIterator<Item = ExampleRecord>,
    {
        Ok(self.cases(base, self.parse_records(records, origin)?))
    }
}
