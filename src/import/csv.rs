use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::StatementParser;
use crate::error::ImportError;
use crate::models::{ColumnMapping, ParsedTransaction};

/// Raw CSV preview shown during the Mapping step: headers plus sample rows.
#[derive(Debug, Clone)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

const PREVIEW_SAMPLE_ROWS: usize = 10;

/// Read headers and the first few rows for the mapping UI.
pub fn preview_csv(path: &Path) -> Result<CsvPreview, ImportError> {
    let (headers, rows) = read_rows(path).map_err(|e| ImportError::Parse(format!("{e:#}")))?;
    let total_rows = rows.len();
    Ok(CsvPreview {
        headers,
        rows: rows.into_iter().take(PREVIEW_SAMPLE_ROWS).collect(),
        total_rows,
    })
}

/// CSV parser applying a frozen [`ColumnMapping`].
#[derive(Debug, Clone)]
pub struct CsvParser {
    pub mapping: ColumnMapping,
}

impl StatementParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Vec<ParsedTransaction>, ImportError> {
        parse_rows(path, &self.mapping).map_err(|e| ImportError::Parse(format!("{e:#}")))
    }
}

fn parse_rows(path: &Path, mapping: &ColumnMapping) -> Result<Vec<ParsedTransaction>> {
    let (_, rows) = read_rows(path)?;
    let mut transactions = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let date_str = row
            .get(mapping.date_column)
            .map(|s| s.trim())
            .unwrap_or_default();
        if date_str.is_empty() {
            continue;
        }

        let date = parse_date(date_str, &mapping.date_format)
            .with_context(|| format!("Row {}: failed to parse date '{}'", i + 1, date_str))?;

        let amount = row_amount(row, mapping)
            .with_context(|| format!("Row {}: failed to parse amount", i + 1))?;

        transactions.push(ParsedTransaction {
            date: date.format("%Y-%m-%d").to_string(),
            amount,
            payee: optional_cell(row, mapping.payee_column),
            memo: optional_cell(row, mapping.memo_column),
            category_hint: optional_cell(row, mapping.category_column),
        });
    }

    Ok(transactions)
}

/// Read the whole file, detecting whether the first row is a header. Files
/// without headers get synthetic "Column N" names so the mapper and preview
/// table still have labels to work with.
fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .context("Failed to open CSV file")?;

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        all_rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    if all_rows.is_empty() {
        anyhow::bail!("CSV file is empty");
    }

    // Headers typically don't parse as dates or numbers.
    let first_row = &all_rows[0];
    let looks_like_header = first_row.iter().all(|field| {
        let trimmed = field.trim();
        Decimal::from_str(trimmed.replace(['$', ','], "").trim()).is_err()
            && NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").is_err()
            && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err()
    });

    if looks_like_header {
        let headers = all_rows.remove(0);
        Ok((headers, all_rows))
    } else {
        let headers: Vec<String> = (0..first_row.len())
            .map(|i| format!("Column {}", i + 1))
            .collect();
        Ok((headers, all_rows))
    }
}

/// Amount for one row, normalized to income-positive cents.
///
/// Separate-column mode: `credit − debit`, both read as positive magnitudes.
/// Single-column mode: the raw signed value, negated when the mapping says the
/// source uses an inverted convention (e.g. card exports with positive
/// charges).
fn row_amount(row: &[String], mapping: &ColumnMapping) -> Result<i64> {
    if mapping.use_separate_columns {
        let debit = cell_cents(row, mapping.debit_column)?;
        let credit = cell_cents(row, mapping.credit_column)?;
        Ok(credit - debit)
    } else {
        let raw = cell_cents(row, Some(mapping.amount_column))?;
        Ok(if mapping.invert_amounts { -raw } else { raw })
    }
}

fn cell_cents(row: &[String], column: Option<usize>) -> Result<i64> {
    let raw = column
        .and_then(|c| row.get(c))
        .map(|s| s.trim())
        .unwrap_or_default();
    parse_cents(raw)
}

/// Parse an amount string to signed cents, exactly, via `Decimal`. Handles
/// `$`, thousands separators, accounting parentheses, and stray quotes; an
/// empty cell is zero.
fn parse_cents(s: &str) -> Result<i64> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Ok(0);
    }
    let value =
        Decimal::from_str(&cleaned).with_context(|| format!("Failed to parse '{s}' as amount"))?;
    (value * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .with_context(|| format!("Amount '{s}' out of range"))
}

fn parse_date(s: &str, fmt: &str) -> Result<NaiveDate> {
    // Try the mapping's format first, then fall back to common bank formats.
    if !fmt.is_empty() {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // Two-digit-year formats come first: chrono's %Y happily parses "25" as
    // the year 25, so %y must get a chance before %Y swallows it.
    for fallback in &[
        "%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%y", "%m-%d-%Y",
        "%d-%m-%Y",
    ] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fallback) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn optional_cell(row: &[String], column: Option<usize>) -> Option<String> {
    column
        .and_then(|c| row.get(c))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "csv_tests.rs"]
mod tests;
