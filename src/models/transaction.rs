/// Canonical output of every parser path. Amounts are signed minor currency
/// units (cents) with an income-positive / expense-negative convention; no
/// downstream code re-derives the sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub amount: i64,
    pub payee: Option<String>,
    pub memo: Option<String>,
    /// Category name suggested by the source statement itself, e.g. a PDF
    /// section heading. Resolved against real categories by the ledger.
    pub category_hint: Option<String>,
}

impl ParsedTransaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }
}

/// A transaction as persisted by the ledger boundary.
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    pub id: i64,
    pub account_id: i64,
    pub date: String,
    pub amount: i64,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub category_id: Option<i64>,
    /// Row id of the opposite side of a confirmed transfer, if linked.
    pub transfer_peer: Option<i64>,
}

/// A pair of persisted transactions in different accounts suspected to be the
/// two sides of one real-world transfer. Linking is never automatic.
#[derive(Debug, Clone)]
pub struct TransferCandidate {
    pub transaction_a: StoredTransaction,
    pub transaction_b: StoredTransaction,
    /// Amount/date proximity score in (0.5, 1.0].
    pub confidence: f64,
}
