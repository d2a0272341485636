//! CLI command implementations.

pub mod fmt;
pub mod list;
pub mod locate;
