//! Fmt command - align a markdown table file.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use rowcase::TableFormat;
use rowcase::table::format_markdown;

pub fn run(file: PathBuf, check: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let format = TableFormat::from_path(&file)?;
    if format != TableFormat::Markdown {
        return Err(format!(
            "Only markdown tables can be formatted, {} is {}",
            file.display(),
            format.name()
        )
        .into());
    }

    let original = fs::read_to_string(&file)?;
    let formatted = format_markdown(&original);

    if check {
        if formatted != original {
            return Err(format!("{} is not formatted", file.display()).into());
        }
        if verbose {
            println!("{} {}", "Formatted:".green(), file.display());
        }
        return Ok(());
    }

    print!("{}", formatted);
    Ok(())
}
