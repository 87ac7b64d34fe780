//! Per-institution export settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layout of one bank's CSV export and the fixed fields of its OFX output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// `<CURDEF>`
    pub currency: String,
    /// `<BANKID>`
    pub bank_id: String,
    /// `<ACCTTYPE>`
    pub account_type: String,
    /// `<LANGUAGE>`
    pub language: String,
    pub delimiter: char,
    /// Banner lines before the header row
    pub preamble_lines: usize,
    /// 1-based line inside the preamble holding the account number
    pub account_line: usize,
    pub columns: ColumnAliases,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            currency: "SGD".to_string(),
            bank_id: "OCBC".to_string(),
            account_type: "CHECKING".to_string(),
            language: "ENG".to_string(),
            delimiter: '\t',
            preamble_lines: 6,
            account_line: 2,
            columns: ColumnAliases::default(),
        }
    }
}

impl StatementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_line == 0 || self.account_line > self.preamble_lines {
            return Err(ConfigError::AccountLineOutOfRange {
                account_line: self.account_line,
                preamble_lines: self.preamble_lines,
            });
        }
        self.delimiter_byte()?;
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Empty("currency"));
        }
        if self.columns.date.is_empty() {
            return Err(ConfigError::Empty("columns.date"));
        }
        self.columns.check_aliases()
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// Header names accepted for each logical column.
///
/// A header binds to an alias when it equals it, or starts with it, ignoring
/// case and surrounding whitespace (`Deposits` binds `Deposits (SGD)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub amount: Vec<String>,
    pub deposit: Vec<String>,
    pub withdrawal: Vec<String>,
    pub reference: Vec<String>,
    pub category: Vec<String>,
    pub name: Vec<String>,
    pub memo: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            date: names(&["Transaction date", "Entry date", "Date"]),
            description: names(&["Description"]),
            amount: names(&["Amount"]),
            deposit: names(&["Deposits", "Deposit"]),
            withdrawal: names(&["Withdrawals", "Withdrawal"]),
            reference: names(&["Reference", "Reference number"]),
            category: names(&["Transaction", "Category", "Transaction type"]),
            name: names(&["Name", "Payee"]),
            memo: names(&["Message", "Memo"]),
        }
    }
}

impl ColumnAliases {
    fn fields(&self) -> [(&'static str, &[String]); 9] {
        [
            ("columns.date", &self.date[..]),
            ("columns.description", &self.description[..]),
            ("columns.amount", &self.amount[..]),
            ("columns.deposit", &self.deposit[..]),
            ("columns.withdrawal", &self.withdrawal[..]),
            ("columns.reference", &self.reference[..]),
            ("columns.category", &self.category[..]),
            ("columns.name", &self.name[..]),
            ("columns.memo", &self.memo[..]),
        ]
    }

    /// A blank alias would prefix-match every header.
    fn check_aliases(&self) -> Result<(), ConfigError> {
        for (field, aliases) in self.fields() {
            if aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(ConfigError::BlankAlias(field));
            }
        }
        Ok(())
    }
}
