//! Deterministic mapping of the bank's transaction labels to OFX `<TRNTYPE>` codes.
//!
//! Exact, case-sensitive label match first; anything unknown falls back to the
//! amount's sign.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OFX transaction types this exporter produces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Atm,
    Dep,
    Int,
    DirectDebit,
    Payment,
    Xfer,
    Fee,
    Debit,
    Credit,
}

impl TransactionType {
    /// Code written to `<TRNTYPE>`
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Atm => "ATM",
            TransactionType::Dep => "DEP",
            TransactionType::Int => "INT",
            TransactionType::DirectDebit => "DIRECTDEBIT",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Xfer => "XFER",
            TransactionType::Fee => "FEE",
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const KNOWN_LABELS: &[(&str, TransactionType)] = &[
    ("ATM withdr/Otto.", TransactionType::Atm),
    ("Debit cash withdrawal", TransactionType::Atm),
    ("Deposit", TransactionType::Dep),
    ("Deposit interest", TransactionType::Int),
    ("Direct debit", TransactionType::DirectDebit),
    ("e-invoice", TransactionType::Payment),
    ("e-payment", TransactionType::Payment),
    ("ePiggy savings transfer", TransactionType::Xfer),
    ("Own transfer", TransactionType::Xfer),
    ("Service fee VAT 0%", TransactionType::Fee),
];

/// Classify a transaction. Total: every label/amount pair gets a type.
pub fn classify(label: &str, amount: Decimal) -> TransactionType {
    if let Some((_, t)) = KNOWN_LABELS.iter().find(|(l, _)| *l == label) {
        return *t;
    }

    if amount.is_sign_negative() && !amount.is_zero() {
        TransactionType::Debit
    } else {
        TransactionType::Credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_known_labels_ignore_sign() {
        for (label, expected) in KNOWN_LABELS {
            assert_eq!(classify(label, amt("-12.50")), *expected, "{label}");
            assert_eq!(classify(label, amt("12.50")), *expected, "{label}");
        }
    }

    #[test]
    fn test_table_codes() {
        assert_eq!(classify("ATM withdr/Otto.", amt("-20")).as_str(), "ATM");
        assert_eq!(classify("Deposit interest", amt("0.12")).as_str(), "INT");
        assert_eq!(classify("Direct debit", amt("-9")).as_str(), "DIRECTDEBIT");
        assert_eq!(classify("Service fee VAT 0%", amt("-2")).as_str(), "FEE");
    }

    #[test]
    fn test_unknown_label_falls_back_to_sign() {
        assert_eq!(classify("Unknown Fee", amt("-5.00")), TransactionType::Debit);
        assert_eq!(classify("Unknown Fee", amt("5.00")), TransactionType::Credit);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(classify("deposit", amt("100.00")), TransactionType::Credit);
        assert_eq!(classify("E-PAYMENT", amt("-40.00")), TransactionType::Debit);
    }

    #[test]
    fn test_zero_amount_is_credit() {
        assert_eq!(classify("", Decimal::ZERO), TransactionType::Credit);
        assert_eq!(classify("", amt("-0.00")), TransactionType::Credit);
    }
}
