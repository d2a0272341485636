//! Named test cases built from parsed examples.
//!
//! Each [`TestCase`] owns its record and context, so cases can be handed to
//! any test framework (or run directly from a `#[test]`) without sharing
//! state. A failing case is reported with its trace attributed to the row.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::debug;

use crate::attribution::{Attributor, FailureReport, Trace};
use crate::example::{ExampleRecord, ParsedExample, RowContext};
use crate::identity::synthesize_batch;
use crate::rowcase::RowcaseConfig;

/// Why a case failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Name of the failing case.
    pub case: String,
    /// Error or panic message.
    pub message: String,
    /// Whether the body panicked rather than returning an error.
    pub panicked: bool,
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let how = if self.panicked { "panicked" } else { "failed" };
        write!(f, "case '{}' {}: {}", self.case, how, self.message)
    }
}

/// One generated test.
#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    /// Unique, reproducible name.
    pub name: String,
    /// Position of the row in its table, from 0.
    pub index: usize,
    /// The row's record and provenance.
    pub example: ParsedExample,
    #[serde(skip)]
    attributor: Attributor,
}

impl TestCase {
    /// Record passed to the case body.
    pub fn record(&self) -> &ExampleRecord {
        &self.example.record
    }

    /// Where the row came from.
    pub fn context(&self) -> &RowContext {
        &self.example.context
    }

    /// Run `body` against this case's record.
    ///
    /// An error or a panic from the body is returned as a [`FailureReport`]
    /// whose trace points at the table row when that can be worked out.
    pub fn run<F, E>(&self, body: F) -> Result<(), FailureReport<CaseFailure>>
    where
        F: FnOnce(&ExampleRecord) -> Result<(), E>,
        E: fmt::Display,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(self.record())));

        let (message, panicked) = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => (e.to_string(), false),
            Err(payload) => (panic_message(payload.as_ref()), true),
        };

        debug!(case = %self.name, panicked, "case failed");
        let failure = CaseFailure {
            case: self.name.clone(),
            message,
            panicked,
        };
        Err(self
            .attributor
            .attribute(failure, Trace::capture(), self.context()))
    }

    /// Like [`TestCase::run`], panicking with the rendered report on failure.
    pub fn run_or_panic<F, E>(&self, body: F)
    where
        F: FnOnce(&ExampleRecord) -> Result<(), E>,
        E: fmt::Display,
    {
        if let Err(report) = self.run(body) {
            panic!("{}", report);
        }
    }
}

/// The cases generated from one table.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CaseSet {
    cases: Vec<TestCase>,
}

impl CaseSet {
    /// Name every example and wrap it as a case.
    pub fn new(base: &str, examples: Vec<ParsedExample>, config: &RowcaseConfig) -> Self {
        let names = synthesize_batch(base, &examples, config.max_name_len);
        let attributor = config.attributor();

        let cases = names
            .into_iter()
            .zip(examples)
            .enumerate()
            .map(|(index, (name, example))| TestCase {
                name,
                index,
                example,
                attributor: attributor.clone(),
            })
            .collect();

        Self { cases }
    }

    /// Cases in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Find a case by name.
    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// All case names, in table order.
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if there are no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run `body` for every case, collecting the failures.
    pub fn run_all<F, E>(&self, body: F) -> Vec<FailureReport<CaseFailure>>
    where
        F: Fn(&ExampleRecord) -> Result<(), E>,
        E: fmt::Display,
    {
        self.cases
            .iter()
            .filter_map(|case| case.run(&body).err())
            .collect()
    }

    /// Run every case and panic with all failure reports if any failed.
    pub fn assert_all<F, E>(&self, body: F)
    where
        F: Fn(&ExampleRecord) -> Result<(), E>,
        E: fmt::Display,
    {
        let failures = self.run_all(body);
        if !failures.is_empty() {
            let rendered: Vec<String> = failures.iter().map(ToString::to_string).collect();
            panic!(
                "{} of {} cases failed:\n\n{}",
                failures.len(),
                self.len(),
                rendered.join("\n")
            );
        }
    }
}

impl IntoIterator for CaseSet {
    type Item = TestCase;
    type IntoIter = std::vec::IntoIter<TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

impl<'a> IntoIterator for &'a CaseSet {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
