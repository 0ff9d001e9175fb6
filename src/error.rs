use thiserror::Error;

/// Import pipeline errors. Each variant maps to a wizard recovery path:
/// detection failures keep the session on Upload, parse failures keep it on
/// Mapping, commit failures keep it on Preview so the user can retry without
/// re-parsing, and transfer detection failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No parser could extract any transactions from the file.
    #[error("could not detect statement format: {0}")]
    FormatDetection(String),

    /// Malformed mapping or unreadable content.
    #[error("failed to parse statement: {0}")]
    Parse(String),

    /// The ledger rejected the import or link write.
    #[error("import failed: {0}")]
    Commit(#[source] anyhow::Error),

    /// Best-effort transfer detection failed; never blocks the wizard.
    #[error("transfer detection failed: {0}")]
    TransferDetection(#[source] anyhow::Error),

    /// The requested operation is not valid in the current wizard step.
    #[error("operation not valid in the {0} step")]
    InvalidState(&'static str),
}
