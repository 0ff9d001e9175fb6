use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::StatementParser;
use crate::error::ImportError;
use crate::models::ParsedTransaction;

/// Preview of a fixed-format plain-text statement export. The balances come
/// from the statement's summary lines and are shown for reference only; they
/// are never used for validation.
#[derive(Debug, Clone)]
pub struct TextStatementPreview {
    pub transactions: Vec<ParsedTransaction>,
    pub total_rows: usize,
    pub beginning_balance: Option<i64>,
    pub ending_balance: Option<i64>,
}

const PREVIEW_SAMPLE_ROWS: usize = 20;

/// Preview a fixed-format text statement: sample transactions plus balances.
pub fn preview_text_statement(path: &Path) -> Result<TextStatementPreview, ImportError> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read statement: {}", path.display()))
        .map_err(|e| ImportError::Parse(format!("{e:#}")))?;
    let scan = scan_statement(&content);
    Ok(TextStatementPreview {
        total_rows: scan.transactions.len(),
        transactions: scan
            .transactions
            .into_iter()
            .take(PREVIEW_SAMPLE_ROWS)
            .collect(),
        beginning_balance: scan.beginning_balance,
        ending_balance: scan.ending_balance,
    })
}

/// Parser for the fixed-format text export. Amount signs are format-native
/// (deposits positive, withdrawals negative) and pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TextStatementParser;

impl StatementParser for TextStatementParser {
    fn parse(&self, path: &Path) -> Result<Vec<ParsedTransaction>, ImportError> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read statement: {}", path.display()))
            .map_err(|e| ImportError::Parse(format!("{e:#}")))?;
        Ok(scan_statement(&content).transactions)
    }
}

struct StatementScan {
    transactions: Vec<ParsedTransaction>,
    beginning_balance: Option<i64>,
    ending_balance: Option<i64>,
}

/// Walk the statement line by line. Summary balances appear as
/// "Beginning/Ending balance as of MM/DD/YYYY <amount>" anchor lines; the
/// transaction table starts at a "Date ... Description ... Amount" header and
/// repeats the beginning balance as its first row, which is skipped.
fn scan_statement(content: &str) -> StatementScan {
    let mut transactions = Vec::new();
    let mut beginning_balance = None;
    let mut ending_balance = None;
    let mut in_transactions = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("Beginning balance as of") {
            beginning_balance = trailing_amount(trimmed);
        } else if trimmed.starts_with("Ending balance as of") {
            ending_balance = trailing_amount(trimmed);
        }

        if trimmed.starts_with("Date")
            && trimmed.contains("Description")
            && trimmed.contains("Amount")
        {
            in_transactions = true;
            continue;
        }

        if !in_transactions || trimmed.is_empty() {
            continue;
        }

        if let Some(txn) = parse_transaction_line(trimmed) {
            transactions.push(txn);
        }
    }

    StatementScan {
        transactions,
        beginning_balance,
        ending_balance,
    }
}

/// One table row: a leading MM/DD/YYYY date, a description, then the amount
/// and running balance right-aligned at the end. Yields None for anything
/// that doesn't fit (continuation lines, section text).
fn parse_transaction_line(line: &str) -> Option<ParsedTransaction> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }

    let date = parse_statement_date(tokens[0])?;

    // Peel up to two amount tokens off the end: running balance last, the
    // transaction amount before it.
    let mut numbers: Vec<i64> = Vec::new();
    while numbers.len() < 2 {
        let Some(&last) = tokens.last() else { break };
        if !last.contains('.') {
            break;
        }
        match parse_amount(last) {
            Some(cents) => {
                numbers.insert(0, cents);
                tokens.pop();
            }
            None => break,
        }
    }
    if numbers.is_empty() {
        return None;
    }
    let amount = numbers[0];

    let description = tokens[1..].join(" ");
    if description.is_empty() || description.contains("Beginning balance") {
        return None;
    }

    Some(ParsedTransaction {
        date,
        amount,
        payee: Some(description),
        memo: None,
        category_hint: None,
    })
}

/// Amount from a summary anchor line, e.g.
/// "Beginning balance as of 01/01/2025    7,703.79".
fn trailing_amount(line: &str) -> Option<i64> {
    line.split_whitespace().last().and_then(parse_amount)
}

/// "1,285.00" / "-1,050.00" / "(50.00)" to signed cents.
fn parse_amount(s: &str) -> Option<i64> {
    let cleaned = s
        .trim()
        .replace([',', '$'], "")
        .replace('(', "-")
        .replace(')', "");
    if cleaned.is_empty() {
        return None;
    }
    let value = Decimal::from_str(&cleaned).ok()?;
    (value * Decimal::ONE_HUNDRED).round().to_i64()
}

/// MM/DD/YYYY to YYYY-MM-DD.
fn parse_statement_date(s: &str) -> Option<String> {
    NaiveDate::parse_from_str(s.trim(), "%m/%d/%Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
#[path = "text_statement_tests.rs"]
mod tests;
