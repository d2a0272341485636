//! Splicing the source row of a failing example into its stack trace.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::locator::locate;
use super::trace::{Frame, FrameLocation, Trace};
use crate::error::RowcaseError;
use crate::example::RowContext;

/// Default prefix of the generated test's function name.
pub const DEFAULT_TEST_PREFIX: &str = "test";

/// Default cap, in characters, on the synthetic frame's name.
pub const DEFAULT_FRAME_NAME_CAP: usize = 128;

/// Why a trace could not be attributed. Never returned to callers.
#[derive(Debug, Error)]
enum AttributionError {
    #[error("no frame whose function starts with `{0}`")]
    NoTestFrame(String),

    #[error("row has no source file")]
    NoSourceFile,

    #[error(transparent)]
    Locate(#[from] RowcaseError),
}

/// A failure together with its (possibly augmented) trace.
#[derive(Debug, Clone)]
pub struct FailureReport<E> {
    /// The original failure, untouched.
    pub error: E,
    /// The trace, with a synthetic frame for the source row when `attributed`.
    pub trace: Trace,
    /// Whether the synthetic frame was added.
    pub attributed: bool,
    row_frame: Option<usize>,
}

impl<E> FailureReport<E> {
    /// A report whose trace was left as is.
    pub fn unattributed(error: E, trace: Trace) -> Self {
        Self {
            error,
            trace,
            attributed: false,
            row_frame: None,
        }
    }

    /// Location of the synthetic row frame, if one was added.
    pub fn row_location(&self) -> Option<&FrameLocation> {
        self.row_frame
            .and_then(|i| self.trace.frames().get(i))
            .and_then(|frame| frame.location.as_ref())
    }
}

impl<E: fmt::Display> fmt::Display for FailureReport<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;
        if let Some(loc) = self.row_location() {
            writeln!(f, "  row: {}:{}", loc.file.display(), loc.line)?;
        }
        if !self.trace.is_empty() {
            writeln!(f, "\nstack trace:")?;
            write!(f, "{}", self.trace)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for FailureReport<E> {}

/// Adds a frame pointing at the table row to a failing example's trace.
#[derive(Debug, Clone)]
pub struct Attributor {
    test_prefix: String,
    frame_name_cap: usize,
}

impl Default for Attributor {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_PREFIX, DEFAULT_FRAME_NAME_CAP)
    }
}

impl Attributor {
    /// Create an attributor.
    pub fn new(test_prefix: impl Into<String>, frame_name_cap: usize) -> Self {
        Self {
            test_prefix: test_prefix.into(),
            frame_name_cap,
        }
    }

    /// Attribute a failure to its row.
    ///
    /// Best effort: if anything goes wrong (no test frame, no source file, the
    /// file cannot be read) the report carries the original trace unchanged.
    /// The error is always the one passed in.
    pub fn attribute<E>(&self, error: E, trace: Trace, context: &RowContext) -> FailureReport<E> {
        match self.try_attribute(&trace, context) {
            Ok((augmented, row_frame)) => FailureReport {
                error,
                trace: augmented,
                attributed: true,
                row_frame: Some(row_frame),
            },
            Err(e) => {
                debug!(reason = %e, "leaving failure trace unattributed");
                FailureReport::unattributed(error, trace)
            }
        }
    }

    /// Returns the augmented trace and the index of the synthetic frame.
    fn try_attribute(
        &self,
        trace: &Trace,
        context: &RowContext,
    ) -> Result<(Trace, usize), AttributionError> {
        let frames = trace.frames();
        let test_index = frames
            .iter()
            .position(|f| f.function.starts_with(&self.test_prefix))
            .ok_or_else(|| AttributionError::NoTestFrame(self.test_prefix.clone()))?;
        let test_frame = &frames[test_index];

        let source = context.source_path().ok_or(AttributionError::NoSourceFile)?;
        let resolved = resolve_source(source);

        let function = match &context.raw_text {
            Some(raw) => sanitize(raw, self.frame_name_cap),
            None => test_frame.function.clone(),
        };

        let needle = context.raw_text.as_deref().unwrap_or("");
        let best_line = locate(&resolved, context.min_line, needle)?;

        let synthetic = Frame {
            module: test_frame.module.clone(),
            function,
            arity: 0,
            location: Some(FrameLocation {
                file: relative_to_cwd(&resolved),
                line: best_line,
            }),
        };

        let mut out = Vec::with_capacity(frames.len() + 1);
        out.extend_from_slice(&frames[..=test_index]);
        out.push(synthetic);
        out.extend_from_slice(&frames[test_index + 1..]);

        debug!(
            file = %source.display(),
            line = best_line,
            "attributed failure to table row"
        );
        Ok((Trace::from(out), test_index + 1))
    }
}

/// Collapse whitespace and cap at `cap` characters, marking a cut with `...`.
fn sanitize(raw: &str, cap: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= cap {
        return collapsed;
    }
    if cap < 3 {
        return collapsed.chars().take(cap).collect();
    }
    let mut out: String = collapsed.chars().take(cap - 3).collect();
    out.push_str("...");
    out
}

/// `file!()` paths are relative to the workspace root while tests run from
/// the crate directory, so a relative path that does not exist is retried
/// against each ancestor of the working directory.
fn resolve_source(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| {
            cwd.ancestors()
                .map(|dir| dir.join(path))
                .find(|candidate| candidate.exists())
        })
        .unwrap_or_else(|| path.to_path_buf())
}

fn relative_to_cwd(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn sample_trace() -> Trace {
        Trace::from(vec![
            Frame::from_symbol("rowcase::cases::TestCase::run").at("src/cases.rs", 90),
            Frame::from_symbol("my_crate::tests::test_adds").at("src/lib.rs", 12),
            Frame::from_symbol("core::ops::function::FnOnce::call_once"),
        ])
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("|  1 |\t2  |", 128), "| 1 | 2 |");
        let long = sanitize(&"x".repeat(200), 128);
        assert_eq!(long.chars().count(), 128);
        assert!(long.ends_with("..."));

        for cap in 0..4 {
            assert!(sanitize("| 1 | 2 |", cap).chars().count() <= cap);
        }
        assert_eq!(sanitize("| 1 | 2 |", 2), "| ");
        assert_eq!(sanitize("| 1 | 2 |", 3), "...");
    }

    #[test]
    fn test_attribute_inserts_row_frame() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "header\n| a | b |\n| 1 | 2 |\n| 3 | 4 |\n").unwrap();

        let context = RowContext::new(Some(file.path().to_path_buf()), 2).with_raw_text("| 3 | 4 |");
        let report = Attributor::default().attribute("boom", sample_trace(), &context);

        assert!(report.attributed);
        assert_eq!(report.error, "boom");
        let frames = report.trace.frames();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1].function, "test_adds");
        assert_eq!(frames[2].module, "my_crate::tests");
        assert_eq!(frames[2].function, "| 3 | 4 |");
        assert_eq!(frames[2].location.as_ref().unwrap().line, 4);
        assert_eq!(frames[3].function, "call_once");
        assert_eq!(report.row_location().unwrap().line, 4);
    }

    #[test]
    fn test_attribute_without_raw_text_reuses_test_name() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a\nb\n").unwrap();

        let context = RowContext::new(Some(file.path().to_path_buf()), 2);
        let report = Attributor::default().attribute("e", sample_trace(), &context);

        assert!(report.attributed);
        assert_eq!(report.trace.frames()[2].function, "test_adds");
        assert_eq!(report.trace.frames()[2].location.as_ref().unwrap().line, 2);
    }

    #[test]
    fn test_missing_file_leaves_trace_untouched() {
        let context = RowContext::new(Some(PathBuf::from("/no/such/file.rs")), 3).with_raw_text("| 1 |");
        let original = sample_trace();
        let report = Attributor::default().attribute("original", original.clone(), &context);

        assert!(!report.attributed);
        assert_eq!(report.error, "original");
        assert_eq!(report.trace, original);
        assert!(report.row_location().is_none());
    }

    #[test]
    fn test_no_test_frame_leaves_trace_untouched() {
        let trace = Trace::from(vec![Frame::from_symbol("a::b")]);
        let context = RowContext::new(None, 1);
        let report = Attributor::default().attribute(1, trace.clone(), &context);
        assert!(!report.attributed);
        assert_eq!(report.trace, trace);
    }

    #[test]
    fn test_report_display() {
        let report = FailureReport::unattributed("it broke", Trace::default());
        assert_eq!(report.to_string(), "it broke\n");
    }
}
