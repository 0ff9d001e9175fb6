#![allow(clippy::unwrap_used)]

use super::*;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_infer_basic_headers() {
    let mapping = infer_mapping(&headers(&["Date", "Description", "Amount"]));
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.payee_column, Some(1));
    assert_eq!(mapping.amount_column, 2);
    assert!(!mapping.use_separate_columns);
    assert!(!mapping.invert_amounts);
}

#[test]
fn test_infer_debit_credit_enables_separate_mode() {
    let mapping = infer_mapping(&headers(&["Date", "Description", "Debit", "Credit"]));
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.payee_column, Some(1));
    assert_eq!(mapping.debit_column, Some(2));
    assert_eq!(mapping.credit_column, Some(3));
    assert!(mapping.use_separate_columns);
}

#[test]
fn test_infer_debit_alone_stays_single_column() {
    let mapping = infer_mapping(&headers(&["Date", "Description", "Debit"]));
    assert_eq!(mapping.debit_column, Some(2));
    assert_eq!(mapping.credit_column, None);
    assert!(!mapping.use_separate_columns);
}

#[test]
fn test_infer_bank_style_aliases() {
    let mapping = infer_mapping(&headers(&[
        "Trans Date",
        "Merchant",
        "Withdrawal",
        "Deposit",
        "Reference",
    ]));
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.payee_column, Some(1));
    assert_eq!(mapping.debit_column, Some(2));
    assert_eq!(mapping.credit_column, Some(3));
    assert_eq!(mapping.memo_column, Some(4));
    assert!(mapping.use_separate_columns);
}

#[test]
fn test_infer_first_match_wins() {
    // Two date-ish headers: the earlier column takes the slot.
    let mapping = infer_mapping(&headers(&["Posted", "Transaction Date", "Amount"]));
    assert_eq!(mapping.date_column, 0);
}

#[test]
fn test_infer_case_and_whitespace_insensitive() {
    let mapping = infer_mapping(&headers(&[" DATE ", "PAYEE", "AMOUNT"]));
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.payee_column, Some(1));
    assert_eq!(mapping.amount_column, 2);
}

#[test]
fn test_infer_nothing_matched_uses_fallback_positions() {
    let mapping = infer_mapping(&headers(&["Column 1", "Column 2", "Column 3"]));
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.amount_column, 1);
    assert_eq!(mapping.payee_column, None);
    assert_eq!(mapping.memo_column, None);
    assert!(!mapping.use_separate_columns);
}

#[test]
fn test_infer_memo_header_feeds_payee_when_nothing_better() {
    // "memo" is in the payee keyword set; with no description column it
    // doubles as both slots.
    let mapping = infer_mapping(&headers(&["Date", "Memo", "Amount"]));
    assert_eq!(mapping.payee_column, Some(1));
    assert_eq!(mapping.memo_column, Some(1));
}

#[test]
fn test_infer_short_keywords_require_exact_match() {
    // "in"/"out" must not catch unrelated headers.
    let mapping = infer_mapping(&headers(&["Posting Date", "Description", "Amount"]));
    assert_eq!(mapping.credit_column, None);
    assert_eq!(mapping.debit_column, None);

    let mapping = infer_mapping(&headers(&["Date", "Description", "Out", "In"]));
    assert_eq!(mapping.debit_column, Some(2));
    assert_eq!(mapping.credit_column, Some(3));
}
