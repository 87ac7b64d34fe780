//! OFX emitter: statement metadata + transactions → OFX 2 document text.
//!
//! Output depends only on its inputs; the server timestamp comes from
//! [`StatementMetadata::generated_at`](immigrant_core::StatementMetadata).

use immigrant_core::time::{ofx_date, ofx_datetime};
use immigrant_core::{Statement, StatementConfig, TransactionRecord, classify};
use log::warn;

use crate::xml::XmlWriter;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;
const OFX_HEADER: &str = r#"<?OFX OFXHEADER="200" VERSION="200" SECURITY="NONE" OLDFILEUID="NONE" NEWFILEUID="NONE"?>"#;

/// Longest `<NAME>` OFX allows
const NAME_MAX_CHARS: usize = 32;

/// Renders statements with one institution's fixed OFX fields
#[derive(Debug, Clone)]
pub struct OfxEmitter {
    config: StatementConfig,
}

impl OfxEmitter {
    pub fn new(config: StatementConfig) -> Self {
        Self { config }
    }

    /// Render the full document.
    pub fn render(&self, statement: &Statement) -> String {
        let meta = &statement.metadata;

        let (start, end) = if meta.is_empty() {
            warn!(
                "statement for {} has no transactions; using {} as its date range",
                meta.account_id,
                meta.generated_at.date()
            );
            (meta.generated_at.date(), meta.generated_at.date())
        } else {
            (meta.start_date, meta.end_date)
        };

        let mut w = XmlWriter::new();
        w.prolog(XML_DECLARATION);
        w.prolog(OFX_HEADER);

        w.element("OFX", |w| {
            w.element("SIGNONMSGSRSV1", |w| {
                w.element("SONRS", |w| {
                    status(w);
                    w.leaf("DTSERVER", &ofx_datetime(meta.generated_at));
                    w.leaf("LANGUAGE", &self.config.language);
                });
            });

            w.element("BANKMSGSRSV1", |w| {
                w.element("STMTTRNRS", |w| {
                    w.leaf("TRNUID", "0");
                    status(w);
                    w.element("STMTRS", |w| {
                        w.leaf("CURDEF", &meta.currency);
                        w.element("BANKACCTFROM", |w| {
                            w.leaf("BANKID", &self.config.bank_id);
                            w.leaf("ACCTID", meta.account_id.as_str());
                            w.leaf("ACCTTYPE", &self.config.account_type);
                        });
                        w.element("BANKTRANLIST", |w| {
                            w.leaf("DTSTART", &ofx_date(start));
                            w.leaf("DTEND", &ofx_date(end));
                            for txn in &statement.transactions {
                                transaction(w, txn);
                            }
                        });
                    });
                });
            });
        });

        w.finish()
    }
}

fn status(w: &mut XmlWriter) {
    w.element("STATUS", |w| {
        w.leaf("CODE", "0");
        w.leaf("SEVERITY", "INFO");
    });
}

fn transaction(w: &mut XmlWriter, txn: &TransactionRecord) {
    let name = txn.name.as_deref().unwrap_or(&txn.description);
    let memo = txn.memo.as_deref().unwrap_or(&txn.description);

    w.element("STMTTRN", |w| {
        w.leaf("TRNTYPE", classify(&txn.raw_category, txn.amount).as_str());
        w.leaf("DTPOSTED", &ofx_date(txn.posted));
        w.leaf("TRNAMT", &txn.amount.to_string());
        w.leaf("FITID", txn.fit_id.as_str());
        w.leaf("NAME", truncate_chars(name, NAME_MAX_CHARS));
        w.leaf("MEMO", memo);
    });
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim_end(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use immigrant_core::{AccountId, FitId, StatementMetadata};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 4, 2)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap()
    }

    fn txn(d: u32, amount: &str, description: &str, category: &str) -> TransactionRecord {
        let posted = NaiveDate::from_ymd_opt(2020, 3, d).unwrap();
        TransactionRecord {
            posted,
            amount: Decimal::from_str(amount).unwrap(),
            description: description.to_string(),
            fit_id: FitId::synthesize(posted, 1),
            raw_category: category.to_string(),
            name: None,
            memo: None,
        }
    }

    fn statement(transactions: Vec<TransactionRecord>) -> Statement {
        let account = AccountId::extract("501-123456-001", 2).unwrap();
        Statement {
            metadata: StatementMetadata::from_records(account, "SGD", at(), &transactions),
            transactions,
        }
    }

    fn render(stmt: &Statement) -> String {
        OfxEmitter::new(StatementConfig::default()).render(stmt)
    }

    #[test]
    fn test_header_fields() {
        let doc = render(&statement(vec![txn(25, "-50.00", "POS", "POS")]));
        assert!(doc.starts_with(XML_DECLARATION));
        assert!(doc.contains("<DTSERVER>20200402081530</DTSERVER>"));
        assert!(doc.contains("<LANGUAGE>ENG</LANGUAGE>"));
        assert!(doc.contains("<CURDEF>SGD</CURDEF>"));
        assert!(doc.contains("<BANKID>OCBC</BANKID>"));
        assert!(doc.contains("<ACCTID>501-123456-001</ACCTID>"));
        assert!(doc.contains("<ACCTTYPE>CHECKING</ACCTTYPE>"));
        assert!(doc.trim_end().ends_with("</OFX>"));
    }

    #[test]
    fn test_transaction_block() {
        let doc = render(&statement(vec![txn(25, "-50.00", "POS & Co <SG>", "POS")]));
        let expected = [
            "          <STMTTRN>",
            "            <TRNTYPE>DEBIT</TRNTYPE>",
            "            <DTPOSTED>20200325</DTPOSTED>",
            "            <TRNAMT>-50.00</TRNAMT>",
            "            <FITID>20200325-1</FITID>",
            "            <NAME>POS &amp; Co &lt;SG&gt;</NAME>",
            "            <MEMO>POS &amp; Co &lt;SG&gt;</MEMO>",
            "          </STMTTRN>",
        ]
        .join("\n");
        assert!(doc.contains(&expected), "{doc}");
    }

    #[test]
    fn test_date_range_from_records() {
        let doc = render(&statement(vec![
            txn(25, "1.00", "a", "Deposit"),
            txn(3, "1.00", "b", "Deposit"),
            txn(30, "1.00", "c", "Deposit"),
        ]));
        assert!(doc.contains("<DTSTART>20200303</DTSTART>"));
        assert!(doc.contains("<DTEND>20200330</DTEND>"));
        assert_eq!(doc.matches("<TRNTYPE>DEP</TRNTYPE>").count(), 3);
    }

    #[test]
    fn test_empty_statement_uses_generated_date() {
        let doc = render(&statement(vec![]));
        assert!(doc.contains("<DTSTART>20200402</DTSTART>"));
        assert!(doc.contains("<DTEND>20200402</DTEND>"));
        assert!(!doc.contains("<STMTTRN>"));
    }

    #[test]
    fn test_name_and_memo_columns() {
        let mut t = txn(25, "-9.90", "Monthly subscription for streaming service", "e-payment");
        t.name = Some("A VERY LONG MERCHANT NAME THAT EXCEEDS OFX LIMIT".to_string());
        t.memo = Some("ref 42".to_string());
        let doc = render(&statement(vec![t]));
        assert!(doc.contains("<TRNTYPE>PAYMENT</TRNTYPE>"));
        assert!(doc.contains("<NAME>A VERY LONG MERCHANT NAME THAT E</NAME>"));
        assert!(doc.contains("<MEMO>ref 42</MEMO>"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("café au lait", 4), "café");
        assert_eq!(truncate_chars("short", 32), "short");
        assert_eq!(truncate_chars("ab cd", 3), "ab");
    }

    #[test]
    fn test_custom_institution_fields() {
        let cfg = StatementConfig {
            bank_id: "Nordea".to_string(),
            account_type: "SAVINGS".to_string(),
            language: "FIN".to_string(),
            ..Default::default()
        };
        let doc = OfxEmitter::new(cfg).render(&statement(vec![]));
        assert!(doc.contains("<BANKID>Nordea</BANKID>"));
        assert!(doc.contains("<ACCTTYPE>SAVINGS</ACCTTYPE>"));
        assert!(doc.contains("<LANGUAGE>FIN</LANGUAGE>"));
    }
}
