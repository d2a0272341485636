//! Locate command - find the line a row is on.

use std::path::PathBuf;

use colored::Colorize;
use rowcase::attribution::locate;

pub fn run(
    file: PathBuf,
    text: String,
    min_line: u32,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let line = locate(&file, min_line, &text)?;
    println!("{}:{}", file.display().to_string().cyan(), line);
    Ok(())
}
