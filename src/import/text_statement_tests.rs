#![allow(clippy::unwrap_used)]

use super::*;
use crate::import::StatementParser as _;
use std::io::Write;

const SAMPLE: &str = "\
Your checking account

Beginning balance as of 01/01/2025    7,703.79
Ending balance as of 01/31/2025      8,937.88

Date        Description                              Amount      Running Bal.
01/01/2025  Beginning balance                                    7,703.79
01/06/2025  PAYROLL ACME CORP DES:DIRECT DEP         1,285.00    8,988.79
01/08/2025  COFFEE ROASTERY PURCHASE                 -4.50       8,984.29
01/15/2025  ONLINE TRANSFER TO SAVINGS               -1,050.00   7,934.29
01/28/2025  INTEREST EARNED                          0.09        7,934.38
";

fn make_statement_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ── line parsing ──────────────────────────────────────────────

#[test]
fn test_parse_amount_tokens() {
    assert_eq!(parse_amount("1,285.00"), Some(128500));
    assert_eq!(parse_amount("-1,050.00"), Some(-105000));
    assert_eq!(parse_amount("(50.00)"), Some(-5000));
    assert_eq!(parse_amount("0.09"), Some(9));
    assert_eq!(parse_amount("7,703.79"), Some(770379));
    assert_eq!(parse_amount(""), None);
}

#[test]
fn test_parse_statement_date() {
    assert_eq!(parse_statement_date("01/06/2025"), Some("2025-01-06".into()));
    assert_eq!(parse_statement_date("12/30/2025"), Some("2025-12-30".into()));
    assert_eq!(parse_statement_date("2025-01-06"), None);
}

#[test]
fn test_parse_transaction_line_with_running_balance() {
    let txn =
        parse_transaction_line("01/06/2025  PAYROLL ACME CORP  1,285.00  8,988.79").unwrap();
    assert_eq!(txn.date, "2025-01-06");
    assert_eq!(txn.amount, 128500);
    assert_eq!(txn.payee.as_deref(), Some("PAYROLL ACME CORP"));
    assert!(txn.is_income());
}

#[test]
fn test_parse_transaction_line_amount_only() {
    let txn = parse_transaction_line("01/08/2025  COFFEE ROASTERY  -4.50").unwrap();
    assert_eq!(txn.amount, -450);
}

#[test]
fn test_parse_transaction_line_rejects_non_rows() {
    assert!(parse_transaction_line("Your checking account").is_none());
    assert!(parse_transaction_line("01/01/2025  Beginning balance  7,703.79").is_none());
    // Trailing integers (check numbers) are not amounts.
    assert!(parse_transaction_line("01/08/2025  CHECK 1234").is_none());
}

// ── preview / parse ───────────────────────────────────────────

#[test]
fn test_preview_extracts_balances_and_rows() {
    let file = make_statement_file(SAMPLE);
    let preview = preview_text_statement(file.path()).unwrap();
    assert_eq!(preview.beginning_balance, Some(770379));
    assert_eq!(preview.ending_balance, Some(893788));
    assert_eq!(preview.total_rows, 4);
    assert_eq!(preview.transactions[0].payee.as_deref().unwrap(), "PAYROLL ACME CORP DES:DIRECT DEP");
}

#[test]
fn test_parse_native_signs_pass_through() {
    let file = make_statement_file(SAMPLE);
    let txns = TextStatementParser.parse(file.path()).unwrap();
    assert_eq!(txns.len(), 4);
    assert_eq!(txns[0].amount, 128500);
    assert_eq!(txns[1].amount, -450);
    assert_eq!(txns[2].amount, -105000);
    assert_eq!(txns[3].amount, 9);
}

#[test]
fn test_parse_ignores_text_before_table_header() {
    let content = "01/06/2025  LOOKS LIKE A ROW  10.00\nDate  Description  Amount\n01/07/2025  REAL ROW  5.00\n";
    let file = make_statement_file(content);
    let txns = TextStatementParser.parse(file.path()).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].payee.as_deref(), Some("REAL ROW"));
}

#[test]
fn test_statement_without_transactions_is_empty() {
    let file = make_statement_file("Just a letter from your bank.\nNothing to see here.\n");
    let txns = TextStatementParser.parse(file.path()).unwrap();
    assert!(txns.is_empty());
}
