//! Cell values and the literal evaluator.

mod parser;
mod types;

pub use parser::{CellSite, MAX_NESTING, evaluate};
pub use types::{Number, Value};
