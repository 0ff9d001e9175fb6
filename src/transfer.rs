use chrono::NaiveDate;

use crate::models::{StoredTransaction, TransferCandidate};

/// Two sides of a transfer post within this many days of each other.
pub const MAX_DAY_GAP: i64 = 5;
/// Pairs scoring at or below this are noise, not transfers.
pub const MIN_CONFIDENCE: f64 = 0.5;
/// Cap on candidates surfaced per detection run.
pub const MAX_CANDIDATES: usize = 20;

const TRANSFER_KEYWORDS: &[&str] = &[
    "transfer", "xfer", "payment", "ach", "wire", "zelle", "venmo",
];

/// Score a pair of transactions as the two sides of one transfer, or None
/// when the pair is structurally impossible (same account, amounts not
/// exactly opposite, more than [`MAX_DAY_GAP`] days apart, or zero amounts).
///
/// Date proximity dominates: same-day pairs score 1.0 on the date axis,
/// falling off linearly to 0.0 at the gap limit. Payee text only nudges the
/// score by whether either side mentions a transfer-ish keyword.
pub(crate) fn pair_confidence(a: &StoredTransaction, b: &StoredTransaction) -> Option<f64> {
    if a.account_id == b.account_id {
        return None;
    }
    if a.amount == 0 || a.amount != -b.amount {
        return None;
    }

    let date_a = NaiveDate::parse_from_str(&a.date, "%Y-%m-%d").ok()?;
    let date_b = NaiveDate::parse_from_str(&b.date, "%Y-%m-%d").ok()?;
    let day_gap = (date_a - date_b).num_days().abs();
    if day_gap > MAX_DAY_GAP {
        return None;
    }

    let date_score = 1.0 - (day_gap as f64 / MAX_DAY_GAP as f64);
    let payee_score = payee_similarity(a.payee.as_deref(), b.payee.as_deref());
    Some(date_score * 0.6 + payee_score * 0.4)
}

fn payee_similarity(payee_a: Option<&str>, payee_b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (payee_a, payee_b) else {
        return 0.3;
    };
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let a_has = TRANSFER_KEYWORDS.iter().any(|k| a_lower.contains(k));
    let b_has = TRANSFER_KEYWORDS.iter().any(|k| b_lower.contains(k));

    if a_has && b_has {
        0.8
    } else if a_has || b_has {
        0.5
    } else {
        0.3
    }
}

/// Pairwise scan for transfer candidates over a set of unlinked transactions.
/// Returns at most [`MAX_CANDIDATES`] pairs above [`MIN_CONFIDENCE`], best
/// first. A transaction can appear in several candidate pairs; linking one
/// pair is what removes its sides from later consideration.
pub(crate) fn find_candidates(transactions: &[StoredTransaction]) -> Vec<TransferCandidate> {
    let mut candidates = Vec::new();

    for (i, a) in transactions.iter().enumerate() {
        for b in transactions.iter().skip(i + 1) {
            if let Some(confidence) = pair_confidence(a, b) {
                if confidence > MIN_CONFIDENCE {
                    candidates.push(TransferCandidate {
                        transaction_a: a.clone(),
                        transaction_b: b.clone(),
                        confidence,
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
