/// Correspondence between CSV column indices and semantic fields.
///
/// Exactly one of `amount_column` or the `debit_column`/`credit_column` pair
/// is authoritative at parse time, selected by `use_separate_columns`. The
/// mapping is a best guess the user can edit until the wizard leaves the
/// Mapping step; it is frozen from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    pub debit_column: Option<usize>,
    pub credit_column: Option<usize>,
    pub payee_column: Option<usize>,
    pub memo_column: Option<usize>,
    pub category_column: Option<usize>,
    /// chrono format string; empty means "try common formats".
    pub date_format: String,
    pub invert_amounts: bool,
    pub use_separate_columns: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            debit_column: None,
            credit_column: None,
            payee_column: None,
            memo_column: None,
            category_column: None,
            date_format: String::new(),
            invert_amounts: false,
            use_separate_columns: false,
        }
    }
}
