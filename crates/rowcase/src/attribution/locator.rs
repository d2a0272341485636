//! Finding a row's line in its source file at failure time.

use std::path::Path;

use crate::error::Result;
use crate::table::read_to_string;

/// Find the line of `raw_text` in `path`, searching from `min_line`.
///
/// The file is read on every call so edits made since the table was parsed
/// are seen. A missing file is an error; text that cannot be found is not,
/// the result is then `min_line`.
pub fn locate(path: &Path, min_line: u32, raw_text: &str) -> Result<u32> {
    let contents = read_to_string(path)?;
    Ok(locate_in(&contents, min_line, raw_text))
}

/// [`locate`] over text already in memory.
///
/// Lines before `min_line` are skipped; the first remaining line containing
/// the (trimmed) text wins.
pub fn locate_in(contents: &str, min_line: u32, raw_text: &str) -> u32 {
    let min_line = min_line.max(1);
    let needle = raw_text.trim();

    contents
        .lines()
        .skip(min_line as usize - 1)
        .position(|line| line.contains(needle))
        .map(|offset| min_line + offset as u32)
        .unwrap_or(min_line)
}
