use crate::models::ColumnMapping;

const DATE_KEYWORDS: &[&str] = &["date", "posted", "trans date", "transaction date"];
const AMOUNT_KEYWORDS: &[&str] = &["amount", "total", "value"];
const DEBIT_KEYWORDS: &[&str] = &["debit", "withdrawal", "out"];
const CREDIT_KEYWORDS: &[&str] = &["credit", "deposit", "in"];
const PAYEE_KEYWORDS: &[&str] = &["payee", "description", "merchant", "name", "memo"];
const MEMO_KEYWORDS: &[&str] = &["memo", "note", "notes", "reference"];

/// Best-guess column mapping from a CSV header row.
///
/// Headers are lowercased and scanned per semantic slot; the first column
/// matching any of the slot's keywords wins. When both a debit and a credit
/// column are found the mapping defaults to separate-column mode; otherwise
/// single signed-amount mode with the fallback positions date=0, amount=1 for
/// slots that matched nothing. Always user-editable before parsing.
pub fn infer_mapping(headers: &[String]) -> ColumnMapping {
    let h: Vec<String> = headers
        .iter()
        .map(|s| s.to_lowercase().trim().to_string())
        .collect();

    let date_column = find_column(&h, DATE_KEYWORDS);
    let amount_column = find_column(&h, AMOUNT_KEYWORDS);
    let debit_column = find_column(&h, DEBIT_KEYWORDS);
    let credit_column = find_column(&h, CREDIT_KEYWORDS);

    ColumnMapping {
        date_column: date_column.unwrap_or(0),
        amount_column: amount_column.unwrap_or(1),
        debit_column,
        credit_column,
        payee_column: find_column(&h, PAYEE_KEYWORDS),
        memo_column: find_column(&h, MEMO_KEYWORDS),
        category_column: None,
        date_format: String::new(),
        invert_amounts: false,
        use_separate_columns: debit_column.is_some() && credit_column.is_some(),
    }
}

/// First column whose header is one of the keywords; ties break by column
/// order. Exact match after lowercasing, so short names like "in" never catch
/// headers such as "Posting Date".
fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| keywords.iter().any(|k| h == k))
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;
