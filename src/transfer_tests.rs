#![allow(clippy::unwrap_used)]

use super::*;

fn stored(id: i64, account_id: i64, date: &str, amount: i64, payee: &str) -> StoredTransaction {
    StoredTransaction {
        id,
        account_id,
        date: date.to_string(),
        amount,
        payee: Some(payee.to_string()),
        memo: None,
        category_id: None,
        transfer_peer: None,
    }
}

// ── pair_confidence ───────────────────────────────────────────

#[test]
fn test_same_day_both_keywords_scores_high() {
    let a = stored(1, 1, "2025-01-15", -105000, "Online Transfer to Savings");
    let b = stored(2, 2, "2025-01-15", 105000, "Transfer from Checking");
    let c = pair_confidence(&a, &b).unwrap();
    assert!((c - 0.92).abs() < 1e-9);
}

#[test]
fn test_same_day_no_keywords_still_passes() {
    let a = stored(1, 1, "2025-01-15", -5000, "Withdrawal");
    let b = stored(2, 2, "2025-01-15", 5000, "Deposit");
    let c = pair_confidence(&a, &b).unwrap();
    assert!((c - 0.72).abs() < 1e-9);
}

#[test]
fn test_confidence_decays_with_day_gap() {
    let a = stored(1, 1, "2025-01-15", -5000, "Transfer out");
    let near = stored(2, 2, "2025-01-16", 5000, "Deposit");
    let far = stored(3, 2, "2025-01-20", 5000, "Deposit");
    let near_score = pair_confidence(&a, &near).unwrap();
    let far_score = pair_confidence(&a, &far).unwrap();
    assert!(near_score > far_score);
    // At the full five-day gap only the payee score remains.
    assert!((far_score - 0.2).abs() < 1e-9);
}

#[test]
fn test_same_account_is_never_a_transfer() {
    let a = stored(1, 1, "2025-01-15", -5000, "Transfer");
    let b = stored(2, 1, "2025-01-15", 5000, "Transfer");
    assert!(pair_confidence(&a, &b).is_none());
}

#[test]
fn test_amounts_must_be_exactly_opposite() {
    let a = stored(1, 1, "2025-01-15", -5000, "Transfer");
    let b = stored(2, 2, "2025-01-15", 5001, "Transfer");
    assert!(pair_confidence(&a, &b).is_none());
}

#[test]
fn test_zero_amounts_are_ignored() {
    let a = stored(1, 1, "2025-01-15", 0, "Transfer");
    let b = stored(2, 2, "2025-01-15", 0, "Transfer");
    assert!(pair_confidence(&a, &b).is_none());
}

#[test]
fn test_gap_over_five_days_is_rejected() {
    let a = stored(1, 1, "2025-01-15", -5000, "Transfer");
    let b = stored(2, 2, "2025-01-21", 5000, "Transfer");
    assert!(pair_confidence(&a, &b).is_none());
}

#[test]
fn test_unparseable_date_is_rejected() {
    let a = stored(1, 1, "not-a-date", -5000, "Transfer");
    let b = stored(2, 2, "2025-01-15", 5000, "Transfer");
    assert!(pair_confidence(&a, &b).is_none());
}

#[test]
fn test_missing_payee_uses_floor_similarity() {
    let mut a = stored(1, 1, "2025-01-15", -5000, "x");
    a.payee = None;
    let b = stored(2, 2, "2025-01-15", 5000, "Transfer");
    let c = pair_confidence(&a, &b).unwrap();
    assert!((c - 0.72).abs() < 1e-9);
}

// ── find_candidates ───────────────────────────────────────────

#[test]
fn test_find_candidates_orders_by_confidence() {
    let txns = vec![
        stored(1, 1, "2025-01-15", -105000, "Online Transfer to Savings"),
        stored(2, 2, "2025-01-15", 105000, "Transfer from Checking"),
        stored(3, 1, "2025-01-10", -5000, "Coffee"),
        stored(4, 2, "2025-01-12", 5000, "Refund"),
    ];
    let candidates = find_candidates(&txns);
    assert_eq!(candidates.len(), 2);
    assert!(candidates[0].confidence > candidates[1].confidence);
    assert_eq!(candidates[0].transaction_a.id, 1);
    assert_eq!(candidates[0].transaction_b.id, 2);
}

#[test]
fn test_find_candidates_drops_low_scores() {
    // Four days apart with no transfer wording scores under the cutoff.
    let txns = vec![
        stored(1, 1, "2025-01-10", -5000, "Groceries"),
        stored(2, 2, "2025-01-14", 5000, "Deposit"),
    ];
    assert!(find_candidates(&txns).is_empty());
}

#[test]
fn test_find_candidates_caps_results() {
    let mut txns = Vec::new();
    for i in 0..30 {
        txns.push(stored(i * 2, 1, "2025-01-15", -(1000 + i), "Transfer out"));
        txns.push(stored(i * 2 + 1, 2, "2025-01-15", 1000 + i, "Transfer in"));
    }
    assert_eq!(find_candidates(&txns).len(), MAX_CANDIDATES);
}

#[test]
fn test_one_transaction_can_appear_in_multiple_pairs() {
    let txns = vec![
        stored(1, 1, "2025-01-15", -5000, "Transfer out"),
        stored(2, 2, "2025-01-15", 5000, "Transfer in"),
        stored(3, 3, "2025-01-15", 5000, "Transfer in"),
    ];
    let candidates = find_candidates(&txns);
    assert_eq!(candidates.len(), 2);
}
