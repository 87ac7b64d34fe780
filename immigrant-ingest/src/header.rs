//! Bind header names to logical columns.

use csv::StringRecord;
use immigrant_core::{ColumnAliases, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountColumns {
    Signed(usize),
    Split { deposit: usize, withdrawal: usize },
}

/// Column positions resolved from one export's header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub date: usize,
    pub description: usize,
    pub amount: AmountColumns,
    pub reference: Option<usize>,
    pub category: Option<usize>,
    pub name: Option<usize>,
    pub memo: Option<usize>,
}

struct Binder {
    headers: Vec<String>,
    used: Vec<bool>,
}

impl Binder {
    /// First unused header matching an alias: exact matches win over prefix matches.
    fn bind(&mut self, aliases: &[String]) -> Option<usize> {
        let aliases: Vec<String> = aliases.iter().map(|a| a.trim().to_lowercase()).collect();

        let exact = aliases.iter().find_map(|alias| {
            (0..self.headers.len()).find(|&i| !self.used[i] && self.headers[i] == *alias)
        });
        let found = exact.or_else(|| {
            aliases.iter().find_map(|alias| {
                (0..self.headers.len())
                    .find(|&i| !self.used[i] && self.headers[i].starts_with(alias.as_str()))
            })
        })?;

        self.used[found] = true;
        Some(found)
    }
}

impl ColumnMap {
    pub fn bind(headers: &StringRecord, aliases: &ColumnAliases) -> Result<Self, FormatError> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(FormatError::MissingHeader);
        }

        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut b = Binder {
            used: vec![false; headers.len()],
            headers,
        };

        let date = b
            .bind(&aliases.date)
            .ok_or(FormatError::MissingColumn { field: "date" })?;

        let deposit = b.bind(&aliases.deposit);
        let withdrawal = b.bind(&aliases.withdrawal);
        let amount = match (deposit, withdrawal) {
            (Some(deposit), Some(withdrawal)) => AmountColumns::Split {
                deposit,
                withdrawal,
            },
            _ => AmountColumns::Signed(
                b.bind(&aliases.amount)
                    .ok_or(FormatError::MissingAmountColumns)?,
            ),
        };

        let description = b
            .bind(&aliases.description)
            .ok_or(FormatError::MissingColumn {
                field: "description",
            })?;

        Ok(ColumnMap {
            date,
            description,
            amount,
            reference: b.bind(&aliases.reference),
            category: b.bind(&aliases.category),
            name: b.bind(&aliases.name),
            memo: b.bind(&aliases.memo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(headers: &[&str]) -> Result<ColumnMap, FormatError> {
        ColumnMap::bind(&StringRecord::from(headers.to_vec()), &ColumnAliases::default())
    }

    #[test]
    fn test_bind_deposit_withdrawal_layout() {
        let map = bind(&[
            "Transaction date",
            "Value date",
            "Description",
            "Withdrawals (SGD)",
            "Deposits (SGD)",
        ])
        .unwrap();
        assert_eq!(map.date, 0);
        assert_eq!(map.description, 2);
        assert_eq!(
            map.amount,
            AmountColumns::Split {
                deposit: 4,
                withdrawal: 3
            }
        );
        // "Transaction" must not steal the date column
        assert_eq!(map.category, None);
        assert_eq!(map.reference, None);
    }

    #[test]
    fn test_bind_signed_amount_layout() {
        let map = bind(&[
            "Entry date",
            "Value date",
            "Payment date",
            "Amount",
            "Name",
            "Account",
            "BIC",
            "Transaction",
            "Reference number",
            "Originator's reference",
            "Message",
            "Card number",
            "Receipt",
            "Description",
        ])
        .unwrap();
        assert_eq!(map.date, 0);
        assert_eq!(map.amount, AmountColumns::Signed(3));
        assert_eq!(map.name, Some(4));
        assert_eq!(map.category, Some(7));
        assert_eq!(map.reference, Some(8));
        assert_eq!(map.memo, Some(10));
        assert_eq!(map.description, 13);
    }

    #[test]
    fn test_reordered_columns_bind_by_name() {
        let map = bind(&["description", "DEPOSITS", "withdrawals", " Transaction Date "]).unwrap();
        assert_eq!(map.date, 3);
        assert_eq!(map.description, 0);
        assert_eq!(
            map.amount,
            AmountColumns::Split {
                deposit: 1,
                withdrawal: 2
            }
        );
    }

    #[test]
    fn test_missing_date_column() {
        assert_eq!(
            bind(&["Description", "Amount"]),
            Err(FormatError::MissingColumn { field: "date" })
        );
    }

    #[test]
    fn test_missing_amount_columns() {
        assert_eq!(
            bind(&["Date", "Description", "Deposits"]),
            Err(FormatError::MissingAmountColumns)
        );
    }

    #[test]
    fn test_empty_header_row() {
        assert_eq!(bind(&["", " "]), Err(FormatError::MissingHeader));
    }
}
