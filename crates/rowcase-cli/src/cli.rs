//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rowcase: parameter tables for data-driven tests
#[derive(Parser)]
#[command(name = "rowcase")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the test cases a table file produces
    List {
        /// Path to the table file (MD/CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Base test name (default: the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum test name length
        #[arg(long, value_name = "N")]
        max_len: Option<usize>,
    },

    /// Print a markdown table file with aligned columns
    Fmt {
        /// Path to the markdown table file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Exit non-zero if the file is not already formatted
        #[arg(long)]
        check: bool,
    },

    /// Find the line a row's text is on
    Locate {
        /// Path to the file to search
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row text to search for
        #[arg(short, long)]
        text: String,

        /// First line the row can be on
        #[arg(long, default_value = "1")]
        min_line: u32,
    },
}
