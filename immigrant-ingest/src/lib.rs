//! immigrant-ingest: header-keyed parser for the bank's multi-section CSV export.

mod fields;
mod header;
pub mod parser;

pub use parser::{ParseError, StatementParser};
