//! Table dialects: classification, decoding, file loading and formatting.

mod decoder;
mod format;
mod row;
mod source;

pub use decoder::{DelimitedRow, Origin, decode_delimited, decode_markdown, decode_records};
pub use format::{format_markdown, render};
pub use row::{Padding, RowKind, classify, classify_table, split_cells};
pub use source::{TableFormat, load_file, read_delimited};

pub(crate) use source::read_to_string;
