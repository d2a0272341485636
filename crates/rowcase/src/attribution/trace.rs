//! Stack traces as plain data.
//!
//! `std::backtrace::Backtrace` cannot be inspected frame by frame on stable
//! Rust, so a captured backtrace is parsed from its textual form:
//!
//! ```text
//!    0: my_crate::tests::test_add
//!              at ./src/lib.rs:42:9
//! ```

use std::backtrace::Backtrace;
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FRAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+:\s+(\S.*?)\s*$").expect("frame pattern is valid"));

static LOCATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s+(.+?):(\d+)(?::\d+)?\s*$").expect("location pattern is valid")
});

static SYMBOL_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"::h[0-9a-f]{16}$").expect("hash pattern is valid"));

/// Source position of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLocation {
    pub file: PathBuf,
    pub line: u32,
}

/// One stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Path of the enclosing module, e.g. `my_crate::tests`.
    pub module: String,
    /// Last path segment, e.g. `test_add`.
    pub function: String,
    /// Number of parameters; 0 when unknown.
    pub arity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<FrameLocation>,
}

impl Frame {
    /// Create a frame from a full symbol path such as `a::b::run`.
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = SYMBOL_HASH.replace(symbol.trim(), "");
        let (module, function) = split_symbol(&symbol);
        Self {
            module: module.to_string(),
            function: function.to_string(),
            arity: 0,
            location: None,
        }
    }

    /// Set the source position.
    pub fn at(mut self, file: impl Into<PathBuf>, line: u32) -> Self {
        self.location = Some(FrameLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// `module::function`, or just `function` at the crate root.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.function.clone()
        } else {
            format!("{}::{}", self.module, self.function)
        }
    }
}

/// An ordered list of frames, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    frames: Vec<Frame>,
}

impl Trace {
    /// Capture the current thread's stack, whatever `RUST_BACKTRACE` says.
    pub fn capture() -> Self {
        Self::parse(&Backtrace::force_capture().to_string())
    }

    /// Parse the textual backtrace format. Unrecognised lines are ignored.
    pub fn parse(text: &str) -> Self {
        let mut frames: Vec<Frame> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = LOCATION_LINE.captures(line) {
                if let (Some(frame), Ok(line_no)) = (frames.last_mut(), caps[2].parse::<u32>()) {
                    if frame.location.is_none() {
                        frame.location = Some(FrameLocation {
                            file: PathBuf::from(&caps[1]),
                            line: line_no,
                        });
                    }
                }
            } else if let Some(caps) = FRAME_LINE.captures(line) {
                frames.push(Frame::from_symbol(&caps[1]));
            }
        }

        Self { frames }
    }

    /// Frames, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take the frames out.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl From<Vec<Frame>> for Trace {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl fmt::Display for Trace {
    /// Same layout as `std::backtrace::Backtrace`, so it parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "{:>4}: {}", i, frame.qualified_name())?;
            if let Some(loc) = &frame.location {
                writeln!(f, "             at {}:{}", loc.file.display(), loc.line)?;
            }
        }
        Ok(())
    }
}

/// Split at the last `::` that is not inside `<...>` and does not open a
/// turbofish. The `>` of `->` does not close a bracket.
fn split_symbol(symbol: &str) -> (&str, &str) {
    let bytes = symbol.as_bytes();
    let mut depth = 0i32;
    let mut split = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                // `::<` starts the function's own generic arguments
                if bytes.get(i + 2) != Some(&b'<') {
                    split = Some(i);
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    match split {
        Some(at) => (&symbol[..at], &symbol[at + 2..]),
        None => ("", symbol),
    }
}
