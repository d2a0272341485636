//! Example records: one per table row, with provenance.

mod builder;
mod record;

pub use builder::ExampleBuilder;
pub use record::{DESCRIPTION_KEYS, ExampleRecord, ParsedExample, RowContext};
