//! List command - show the test cases a table file produces.

use std::path::PathBuf;

use colored::Colorize;
use rowcase::attribution::locate;
use rowcase::{Rowcase, RowcaseConfig, TestCase};
use tracing::debug;

pub fn run(
    file: PathBuf,
    name: Option<String>,
    json_output: bool,
    max_len: Option<usize>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = name.unwrap_or_else(|| {
        file.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    });

    let mut config = RowcaseConfig::default();
    if let Some(len) = max_len {
        config = config.with_max_name_len(len);
    }
    let cases = Rowcase::with_config(config).file_cases(&base, &file)?;
    debug!(file = %file.display(), cases = cases.len(), "loaded table");

    let mut rows = Vec::with_capacity(cases.len());
    for case in &cases {
        rows.push((case, row_line(case)?));
    }

    if json_output {
        let listing: Vec<serde_json::Value> = rows
            .iter()
            .map(|(case, line)| {
                serde_json::json!({
                    "name": case.name,
                    "index": case.index,
                    "line": line,
                    "record": case.record().to_json(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{} {} ({} {})",
        "Cases from".cyan().bold(),
        file.display().to_string().white(),
        cases.len(),
        if cases.len() == 1 { "case" } else { "cases" }
    );
    println!();

    for (case, line) in &rows {
        println!("  {:>5}  {}", line.to_string().yellow(), case.name);
        if verbose {
            for (key, value) in case.record() {
                println!("         {} = {}", key.dimmed(), value.canonical());
            }
        }
    }

    Ok(())
}

/// Exact line of the case's row, or its declared line when it has no text to search for.
fn row_line(case: &TestCase) -> rowcase::Result<u32> {
    let context = case.context();
    match (context.source_path(), context.raw_text.as_deref()) {
        (Some(path), Some(raw)) => locate(path, context.min_line, raw),
        _ => Ok(context.declared_line),
    }
}
