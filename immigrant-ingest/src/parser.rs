//! Parse a bank CSV export into a [`Statement`].
//!
//! Expected layout (tab separated by default):
//!   <preamble_lines banner lines, one of them carrying the account number>
//!   Transaction date  Value date  Description            Withdrawals (SGD)  Deposits (SGD)
//!   25/3/2020         25/3/2020   POS PURCHASE                50.00
//!                                 NTUC FAIRPRICE SINGAPORE
//!
//! A row without a date continues the description of the row above it.

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ByteRecord, StringRecord};
use immigrant_core::time::local_timestamp;
use immigrant_core::{
    AccountId, ConfigError, FitId, FormatError, Statement, StatementConfig, StatementMetadata,
    TransactionRecord,
};
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fields::{parse_amount, parse_date, split_amount};
use crate::header::{AmountColumns, ColumnMap};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read statement")]
    Io(#[from] io::Error),
    #[error("could not split CSV rows")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Header-keyed parser for one institution's export layout
#[derive(Debug, Clone)]
pub struct StatementParser {
    config: StatementConfig,
    delimiter: u8,
}

impl StatementParser {
    pub fn new(config: StatementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;
        Ok(Self { config, delimiter })
    }

    /// Open and parse an export; its modification time becomes the statement's
    /// `generated_at`.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Statement, ParseError> {
        let path = path.as_ref();
        let open_err = |source| ParseError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let modified = file.metadata().and_then(|m| m.modified()).map_err(open_err)?;

        self.parse(BufReader::new(file), local_timestamp(modified))
    }

    /// Parse an export from any buffered reader.
    pub fn parse(
        &self,
        mut input: impl BufRead,
        generated_at: NaiveDateTime,
    ) -> Result<Statement, ParseError> {
        let account_id = self.read_preamble(&mut input)?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let columns = ColumnMap::bind(&decode(rdr.byte_headers()?), &self.config.columns)?;
        debug!("bound columns: {columns:?}");

        let mut rows = RowFolder::new(&columns);
        for result in rdr.byte_records() {
            let record = result?;
            let line = self.config.preamble_lines
                + record.position().map(|p| p.line() as usize).unwrap_or(0);
            rows.push(&decode(&record), line)?;
        }

        let transactions = rows.finish();
        let metadata = StatementMetadata::from_records(
            account_id,
            self.config.currency.clone(),
            generated_at,
            &transactions,
        );

        Ok(Statement {
            metadata,
            transactions,
        })
    }

    /// Consume the banner lines and pull the account number out of the designated one.
    fn read_preamble(&self, input: &mut impl BufRead) -> Result<AccountId, ParseError> {
        let mut account_id = None;
        let mut buf = Vec::new();

        for line in 1..=self.config.preamble_lines {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Err(FormatError::TruncatedPreamble {
                    expected: self.config.preamble_lines,
                    found: line - 1,
                }
                .into());
            }

            if line == self.config.account_line {
                let text = String::from_utf8_lossy(&buf);
                let text = text.trim_end_matches(['\r', '\n']);
                account_id = Some(AccountId::extract(text, line)?);
            }
        }

        // validate() keeps account_line inside the preamble
        account_id.ok_or_else(|| {
            FormatError::TruncatedPreamble {
                expected: self.config.account_line,
                found: self.config.preamble_lines,
            }
            .into()
        })
    }
}

/// Exports are often Latin-1/Windows-1252; undecodable bytes become U+FFFD
/// instead of failing the file.
fn decode(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field))
        .collect()
}

/// Folds physical rows into logical transactions.
struct RowFolder<'a> {
    columns: &'a ColumnMap,
    records: Vec<TransactionRecord>,
    per_date: HashMap<NaiveDate, usize>,
}

impl<'a> RowFolder<'a> {
    fn new(columns: &'a ColumnMap) -> Self {
        Self {
            columns,
            records: Vec::new(),
            per_date: HashMap::new(),
        }
    }

    fn push(&mut self, row: &StringRecord, line: usize) -> Result<(), FormatError> {
        if row.iter().all(|f| f.trim().is_empty()) {
            return Ok(());
        }

        let field = |i: usize| row.get(i).unwrap_or("").trim();
        let optional = |i: Option<usize>| {
            i.map(field)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let date = field(self.columns.date);
        if date.is_empty() {
            let text = row
                .iter()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            return match self.records.last_mut() {
                Some(prev) => {
                    prev.extend_description(&text);
                    Ok(())
                }
                None => Err(FormatError::OrphanContinuation { line, text }),
            };
        }

        let posted = parse_date(date, line)?;
        let amount = match self.columns.amount {
            AmountColumns::Signed(i) => parse_amount(field(i), line)?,
            AmountColumns::Split {
                deposit,
                withdrawal,
            } => split_amount(field(deposit), field(withdrawal), line)?,
        };

        let description = field(self.columns.description).to_string();
        let raw_category =
            optional(self.columns.category).unwrap_or_else(|| description.clone());

        let ordinal = self.per_date.entry(posted).or_insert(0);
        *ordinal += 1;
        let fit_id = match optional(self.columns.reference) {
            Some(reference) => FitId::Source(reference),
            None => FitId::synthesize(posted, *ordinal),
        };

        self.records.push(TransactionRecord {
            posted,
            amount,
            description,
            fit_id,
            raw_category,
            name: optional(self.columns.name),
            memo: optional(self.columns.memo),
        });
        Ok(())
    }

    fn finish(self) -> Vec<TransactionRecord> {
        self.records
    }
}
