/// Counts reported by the ledger for one `import_transactions` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
    pub categorized: usize,
}

/// Final outcome of a wizard session, accumulated across the import call and
/// any transfer-link confirmations. Immutable once the wizard is Complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub categorized: usize,
    pub transfers_linked: usize,
}

impl From<ImportStats> for ImportResult {
    fn from(stats: ImportStats) -> Self {
        Self {
            imported: stats.imported,
            skipped: stats.skipped,
            categorized: stats.categorized,
            transfers_linked: 0,
        }
    }
}
