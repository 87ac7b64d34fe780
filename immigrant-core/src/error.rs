//! Errors raised while interpreting a bank export.

use thiserror::Error;

/// The source file does not follow the expected export layout.
///
/// Line numbers are 1-based physical lines of the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: no account number (ddd-dddddd-ddd) found in {text:?}")]
    MissingAccountId { line: usize, text: String },

    #[error("line {line}: more than one account number found in {text:?}")]
    AmbiguousAccountId { line: usize, text: String },

    #[error("expected {expected} preamble lines, input ended after {found}")]
    TruncatedPreamble { expected: usize, found: usize },

    #[error("no header row after the preamble")]
    MissingHeader,

    #[error("header row has no {field} column")]
    MissingColumn { field: &'static str },

    #[error("header row needs an amount column or a deposit/withdrawal column pair")]
    MissingAmountColumns,

    #[error("line {line}: invalid date {text:?}, expected day/month/yyyy")]
    InvalidDate { line: usize, text: String },

    #[error("line {line}: invalid amount {text:?}")]
    InvalidAmount { line: usize, text: String },

    #[error("line {line}: neither deposit nor withdrawal is set")]
    MissingAmount { line: usize },

    #[error("line {line}: both deposit ({deposit}) and withdrawal ({withdrawal}) are set")]
    AmbiguousAmount {
        line: usize,
        deposit: String,
        withdrawal: String,
    },

    #[error("line {line}: continuation row {text:?} has no transaction before it")]
    OrphanContinuation { line: usize, text: String },
}

/// A [`crate::StatementConfig`] that cannot describe any export.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("account_line {account_line} is outside the {preamble_lines}-line preamble")]
    AccountLineOutOfRange {
        account_line: usize,
        preamble_lines: usize,
    },

    #[error("delimiter {0:?} is not a single-byte character")]
    InvalidDelimiter(char),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} contains a blank column name")]
    BlankAlias(&'static str),
}
