//! Statement record types produced by the parser and consumed by the emitter

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::FormatError;

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}-\d{6}-\d{3}").unwrap());

/// Sentinel end date of a statement with no transactions (1970-01-01).
pub fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

/// Bank account number in `ddd-dddddd-ddd` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Find the single account number in a preamble line.
    ///
    /// The same number repeated on the line is accepted; two different
    /// numbers are not.
    pub fn extract(text: &str, line: usize) -> Result<Self, FormatError> {
        let mut found: Option<&str> = None;
        for m in ACCOUNT_RE.find_iter(text) {
            match found {
                None => found = Some(m.as_str()),
                Some(prev) if prev == m.as_str() => {}
                Some(_) => {
                    return Err(FormatError::AmbiguousAccountId {
                        line,
                        text: text.to_string(),
                    });
                }
            }
        }

        found
            .map(|s| AccountId(s.to_string()))
            .ok_or_else(|| FormatError::MissingAccountId {
                line,
                text: text.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction id written to `<FITID>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitId {
    /// Taken from the export's reference column
    Source(String),
    /// Built from the posted date and the ordinal within that date
    Synthesized(String),
}

impl FitId {
    pub fn synthesize(posted: NaiveDate, ordinal: usize) -> Self {
        FitId::Synthesized(format!("{}-{}", posted.format("%Y%m%d"), ordinal))
    }

    pub fn as_str(&self) -> &str {
        match self {
            FitId::Source(s) | FitId::Synthesized(s) => s,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, FitId::Synthesized(_))
    }
}

/// One logical transaction, continuation rows already folded in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub posted: NaiveDate,
    /// Negative = withdrawal, positive = deposit. Keeps the source's scale.
    pub amount: Decimal,
    pub description: String,
    pub fit_id: FitId,
    /// Label matched against the transaction type table
    pub raw_category: String,
    pub name: Option<String>,
    pub memo: Option<String>,
}

impl TransactionRecord {
    /// Append a continuation row's text to the description.
    pub fn extend_description(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(text);
    }
}

/// Statement-level fields of the OFX document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub account_id: AccountId,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Last modification of the source file; becomes `<DTSERVER>`
    pub generated_at: NaiveDateTime,
}

impl StatementMetadata {
    /// Compute the date bounds from the parsed records.
    ///
    /// With no records the bounds are the sentinel pair
    /// (start = `generated_at`, end = [`epoch_date`]); see [`Self::is_empty`].
    pub fn from_records(
        account_id: AccountId,
        currency: impl Into<String>,
        generated_at: NaiveDateTime,
        records: &[TransactionRecord],
    ) -> Self {
        let start_date = records
            .iter()
            .map(|r| r.posted)
            .min()
            .unwrap_or_else(|| generated_at.date());
        let end_date = records.iter().map(|r| r.posted).max().unwrap_or_else(epoch_date);

        Self {
            account_id,
            currency: currency.into(),
            start_date,
            end_date,
            generated_at,
        }
    }

    /// True when the bounds are the no-transactions sentinel.
    pub fn is_empty(&self) -> bool {
        self.start_date > self.end_date
    }
}

/// Parser output: metadata plus records in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub metadata: StatementMetadata,
    pub transactions: Vec<TransactionRecord>,
}

impl Statement {
    pub fn synthesized_ids(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.fit_id.is_synthesized())
            .count()
    }
}
