//! Rowcase: parameter tables for data-driven tests.
//!
//! Rowcase reads tables of test parameters, from inline markdown or from
//! `.md`, `.csv` and `.tsv` files, and turns every row into a named test case.
//! When a case fails, the failure trace gains a frame pointing at the exact
//! table row that produced it.
//!
//! # Core Principles
//!
//! - **Typed cells**: Cells are small literals (numbers, strings, symbols, lists, maps);
//!   anything else is kept as raw text rather than rejected
//! - **Stable names**: Test names depend only on the row's contents and position
//! - **Best-effort attribution**: Locating the row never replaces the real failure
//!
//! # Example
//!
//! ```
//! use rowcase::{Origin, Rowcase, Value};
//!
//! let examples = Rowcase::new()
//!     .parse_markdown(
//!         "| name | age |\n|------|-----|\n| \"Ada\" | 36 |",
//!         &Origin::new(file!(), line!()),
//!     )
//!     .unwrap();
//!
//! assert_eq!(examples.len(), 1);
//! assert_eq!(examples[0].record.get("age"), Some(&Value::from(36)));
//! ```

pub mod attribution;
pub mod cases;
pub mod error;
pub mod example;
pub mod identity;
pub mod table;
pub mod value;

mod rowcase;

pub use crate::rowcase::{Rowcase, RowcaseConfig};
pub use attribution::{Attributor, FailureReport, Frame, Trace};
pub use cases::{CaseFailure, CaseSet, TestCase};
pub use error::{Location, Result, RowcaseError};
pub use example::{ExampleRecord, ParsedExample, RowContext};
pub use table::{Origin, RowKind, TableFormat};
pub use value::{Number, Value};
