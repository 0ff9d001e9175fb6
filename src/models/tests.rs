#![allow(clippy::unwrap_used)]

use super::*;

// ── AccountType ───────────────────────────────────────────────

#[test]
fn test_account_type_roundtrip() {
    for t in [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::CreditCard,
        AccountType::Cash,
        AccountType::Other,
    ] {
        assert_eq!(AccountType::parse(t.as_str()), t);
    }
}

#[test]
fn test_account_type_parse_variants() {
    assert_eq!(AccountType::parse("CREDITCARD"), AccountType::CreditCard);
    assert_eq!(AccountType::parse("credit"), AccountType::CreditCard);
    assert_eq!(AccountType::parse("brokerage"), AccountType::Other);
}

// ── ParsedTransaction ─────────────────────────────────────────

#[test]
fn test_transaction_sign_helpers() {
    let mut txn = ParsedTransaction {
        date: "2024-01-15".into(),
        amount: 250000,
        payee: Some("Paycheck".into()),
        memo: None,
        category_hint: None,
    };
    assert!(txn.is_income());
    assert!(!txn.is_expense());

    txn.amount = -450;
    assert!(txn.is_expense());

    txn.amount = 0;
    assert!(!txn.is_income());
    assert!(!txn.is_expense());
}

// ── ColumnMapping ─────────────────────────────────────────────

#[test]
fn test_mapping_default_fallback_positions() {
    let mapping = ColumnMapping::default();
    assert_eq!(mapping.date_column, 0);
    assert_eq!(mapping.amount_column, 1);
    assert!(!mapping.use_separate_columns);
    assert!(!mapping.invert_amounts);
    assert!(mapping.date_format.is_empty());
}

// ── ImportResult ──────────────────────────────────────────────

#[test]
fn test_result_from_stats_starts_unlinked() {
    let result = ImportResult::from(ImportStats {
        imported: 3,
        skipped: 1,
        categorized: 2,
    });
    assert_eq!(result.imported, 3);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.categorized, 2);
    assert_eq!(result.transfers_linked, 0);
}
