//! Field normalization: dates and amounts as printed in the export.

use chrono::NaiveDate;
use immigrant_core::FormatError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse `day/month/yyyy`. `.` and `-` are accepted as separators too;
/// day and month may be unpadded.
pub(crate) fn parse_date(text: &str, line: usize) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate {
        line,
        text: text.to_string(),
    };

    let parts: Vec<&str> = text.trim().split(['/', '.', '-']).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };
    if year.len() != 4
        || ![day, month, year]
            .iter()
            .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse a printed amount, dropping thousands separators and a leading `+`.
pub(crate) fn parse_amount(text: &str, line: usize) -> Result<Decimal, FormatError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    Decimal::from_str(cleaned)
        .map(unsigned_zero)
        .map_err(|_| FormatError::InvalidAmount {
            line,
            text: text.to_string(),
        })
}

/// `-0.00` would print as a negative TRNAMT on a CREDIT.
fn unsigned_zero(d: Decimal) -> Decimal {
    if d.is_zero() { d.abs() } else { d }
}

/// Signed amount from a deposit/withdrawal column pair.
///
/// Exactly one side must be set. A withdrawal is always negative.
pub(crate) fn split_amount(
    deposit: &str,
    withdrawal: &str,
    line: usize,
) -> Result<Decimal, FormatError> {
    let deposit = deposit.trim();
    let withdrawal = withdrawal.trim();

    match (deposit.is_empty(), withdrawal.is_empty()) {
        (false, true) => parse_amount(deposit, line),
        (true, false) => Ok(unsigned_zero(-parse_amount(withdrawal, line)?.abs())),
        (true, true) => Err(FormatError::MissingAmount { line }),
        (false, false) => Err(FormatError::AmbiguousAmount {
            line,
            deposit: deposit.to_string(),
            withdrawal: withdrawal.to_string(),
        }),
    }
}
