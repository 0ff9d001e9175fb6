use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use super::StatementParser;
use crate::error::ImportError;
use crate::models::ParsedTransaction;

/// Preview of a PDF statement parsed from its extracted text layer.
#[derive(Debug, Clone)]
pub struct PdfPreview {
    pub transactions: Vec<ParsedTransaction>,
    pub total_rows: usize,
    /// Issuer guessed from the statement text, e.g. "Chase".
    pub detected_format: Option<String>,
    /// Share of date-led lines that parsed into transactions, in [0, 1].
    pub confidence: f32,
}

/// Below this confidence the caller must show a warning before commit.
pub const CONFIDENCE_WARN_FLOOR: f32 = 0.7;

impl PdfPreview {
    pub fn low_confidence(&self) -> bool {
        self.confidence < CONFIDENCE_WARN_FLOOR
    }
}

const PREVIEW_SAMPLE_ROWS: usize = 20;
const MIN_TEXT_LEN: usize = 100;
/// Anything over $10M in one line is extraction noise, not a transaction.
const MAX_SANE_CENTS: i64 = 1_000_000_000;

/// Preview a PDF statement: sample transactions, issuer guess, confidence.
pub fn preview_pdf(path: &Path) -> Result<PdfPreview, ImportError> {
    let text = extract_text(path)?;
    scan_text(&text, PREVIEW_SAMPLE_ROWS)
}

/// Parser over PDF text-layer content. Statements that group transactions
/// under category headings ("Dining", "Groceries", ...) carry the heading
/// through as a category hint on each transaction.
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl StatementParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<Vec<ParsedTransaction>, ImportError> {
        let text = extract_text(path)?;
        Ok(scan_text(&text, usize::MAX)?.transactions)
    }
}

fn extract_text(path: &Path) -> Result<String, ImportError> {
    pdf_extract::extract_text(path)
        .map_err(|e| ImportError::Parse(format!("Failed to extract PDF text: {e}")))
}

const HEADER_KEYWORDS: &[&str] = &[
    "date",
    "description",
    "amount",
    "balance",
    "debit",
    "credit",
    "withdrawal",
    "deposit",
    "transaction",
    "posted",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "total",
    "summary",
    "subtotal",
    "balance forward",
    "previous balance",
    "ending balance",
    "beginning balance",
    "minimum payment",
    "average",
    "page",
    "continued",
];

const CATEGORY_KEYWORDS: &[&str] = &[
    "groceries",
    "dining",
    "restaurants",
    "shopping",
    "entertainment",
    "utilities",
    "bills",
    "transportation",
    "gas",
    "travel",
    "healthcare",
    "insurance",
    "education",
    "subscriptions",
    "personal",
    "home",
    "fees",
    "income",
    "transfer",
    "payment",
];

const MONTH_ABBREVS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^(?:\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2}|\d{1,2}-\d{1,2}-\d{2,4})")
            .expect("static regex")
    })
}

/// Financial amounts require exactly two decimal places; optional `$`,
/// negatives as `-x`, `x-` or `(x)`, and a `CR` suffix marking credits.
fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"[$]?[-(]?[\d,]{1,12}\.\d{2}[)-]?(?:CR)?").expect("static regex")
    })
}

fn lone_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[$]?[\d,]+\.\d{2}$").expect("static regex")
    })
}

/// Scan extracted statement text into transactions.
///
/// First pass only accepts rows after some table structure (a transaction
/// section marker or header line) has been seen; if that yields almost
/// nothing the statement probably lacks clear markers and a relaxed second
/// pass takes every date-led line that survives the skip filters.
pub(crate) fn scan_text(text: &str, limit: usize) -> Result<PdfPreview, ImportError> {
    if text.trim().len() < MIN_TEXT_LEN {
        return Err(ImportError::Parse(
            "PDF appears to be image-based or contains very little text. \
             Try exporting the statement as CSV from your bank instead."
                .into(),
        ));
    }

    let detected_format = detect_issuer(text);

    let mut result = scan_lines(text, true);
    if result.transactions.len() < 3 {
        result = scan_lines(text, false);
    }

    let confidence = if result.dated_lines > 0 {
        result.parsed_lines as f32 / result.dated_lines as f32
    } else {
        0.0
    };

    let total_rows = result.transactions.len();
    Ok(PdfPreview {
        transactions: result.transactions.into_iter().take(limit).collect(),
        total_rows,
        detected_format,
        confidence,
    })
}

struct ScanResult {
    transactions: Vec<ParsedTransaction>,
    dated_lines: usize,
    parsed_lines: usize,
}

fn scan_lines(text: &str, gated: bool) -> ScanResult {
    let mut transactions = Vec::new();
    let mut dated_lines = 0;
    let mut parsed_lines = 0;
    let mut past_structure = false;
    let mut current_category: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_section_start(trimmed) || is_header_line(trimmed) {
            past_structure = true;
            continue;
        }

        if let Some(category) = category_heading(trimmed) {
            current_category = Some(category);
            continue;
        }

        if should_skip_line(trimmed) {
            continue;
        }

        if date_re().is_match(trimmed) {
            dated_lines += 1;
            if let Some(txn) = parse_transaction_line(trimmed, current_category.clone()) {
                parsed_lines += 1;
                if !gated || past_structure || transactions.is_empty() {
                    transactions.push(txn);
                }
            }
        }
    }

    ScanResult {
        transactions,
        dated_lines,
        parsed_lines,
    }
}

fn parse_transaction_line(line: &str, category: Option<String>) -> Option<ParsedTransaction> {
    let date_match = date_re().find(line)?;
    let date = parse_pdf_date(date_match.as_str())?;

    // Last few amount-like matches on the line: the transaction amount first,
    // a running balance (if present) last.
    let amounts: Vec<i64> = amount_re()
        .find_iter(line)
        .filter_map(|m| parse_pdf_amount(m.as_str()))
        .filter(|a| a.abs() <= MAX_SANE_CENTS)
        .collect();
    // With a running balance present the transaction amount is second to last.
    let amount = match amounts.len() {
        0 => return None,
        1 => amounts[0],
        n => amounts[n - 2],
    };

    let after_date = &line[date_match.end()..];
    let description = match amount_re().find(after_date) {
        Some(m) => after_date[..m.start()].trim(),
        None => after_date.trim(),
    };
    if description.len() < 2 {
        return None;
    }

    Some(ParsedTransaction {
        date,
        amount,
        payee: Some(description.to_string()),
        memo: None,
        category_hint: category,
    })
}

/// Credit-card sign convention: plain amounts are charges (negative), a `CR`
/// suffix marks a credit or refund (positive), and explicitly negative forms
/// stay negative.
fn parse_pdf_amount(s: &str) -> Option<i64> {
    let cleaned = s.trim().replace([',', '$'], "");
    if cleaned.is_empty() {
        return None;
    }

    let (is_credit, rest) = match cleaned.strip_suffix("CR") {
        Some(r) => (true, r.to_string()),
        None => (false, cleaned),
    };

    let digits = if let Some(r) = rest.strip_prefix('(') {
        r.trim_end_matches(')')
    } else if let Some(r) = rest.strip_prefix('-') {
        r
    } else if let Some(r) = rest.strip_suffix('-') {
        r
    } else {
        &rest
    };

    let value = Decimal::from_str(digits).ok()?;
    let magnitude = (value * Decimal::ONE_HUNDRED).round().to_i64()?;

    // Everything that isn't an explicit credit is money going out.
    if is_credit {
        Some(magnitude)
    } else {
        Some(-magnitude)
    }
}

fn parse_pdf_date(s: &str) -> Option<String> {
    use chrono::NaiveDate;
    let trimmed = s.trim();
    // %y before %Y: chrono's %Y would otherwise parse "25" as the year 25.
    for fmt in &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%m-%d-%y", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    None
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    let hits = HEADER_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    hits >= 2 && !date_re().is_match(line)
}

fn is_section_start(line: &str) -> bool {
    if date_re().is_match(line) {
        return false;
    }
    let lower = line.to_lowercase();
    lower.contains("transaction") || lower.contains("account activity") || lower.contains("details")
}

/// A bare category heading such as "Groceries" or "Dining:"; never a line
/// that starts with a date.
fn category_heading(line: &str) -> Option<String> {
    if date_re().is_match(line.trim()) {
        return None;
    }
    let lower = line.trim().trim_end_matches(':').to_lowercase();
    for keyword in CATEGORY_KEYWORDS {
        if lower == *keyword || lower.starts_with(&format!("{keyword} ")) {
            return Some(line.trim().trim_end_matches(':').to_string());
        }
    }
    None
}

fn should_skip_line(line: &str) -> bool {
    let lower = line.to_lowercase();

    if SUMMARY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }

    // Monthly breakdown tables mention several month names on one line.
    let month_hits = MONTH_ABBREVS.iter().filter(|m| lower.contains(*m)).count();
    if month_hits >= 2 {
        return true;
    }

    // Chart residue: tiny fragments, bare subtotals, standalone month labels.
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return true;
    }
    if lone_amount_re().is_match(trimmed) {
        return true;
    }
    if MONTH_ABBREVS
        .iter()
        .any(|m| lower == *m || lower == format!("{m}."))
    {
        return true;
    }

    false
}

/// Guess the issuer from well-known names in the statement text.
fn detect_issuer(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if !text.lines().any(is_header_line) {
        return None;
    }
    let issuer = if lower.contains("bank of america") {
        "Bank of America"
    } else if lower.contains("chase") {
        "Chase"
    } else if lower.contains("wells fargo") {
        "Wells Fargo"
    } else if lower.contains("citi") {
        "Citi"
    } else {
        "Generic"
    };
    Some(issuer.to_string())
}

#[cfg(test)]
#[path = "pdf_tests.rs"]
mod tests;
