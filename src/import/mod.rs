mod csv;
mod detect;
mod mapper;
mod pdf;
mod text_statement;

pub use csv::{preview_csv, CsvParser, CsvPreview};
pub use detect::detect_statement;
pub use mapper::infer_mapping;
pub use pdf::{preview_pdf, PdfParser, PdfPreview, CONFIDENCE_WARN_FLOOR};
pub use text_statement::{preview_text_statement, TextStatementParser, TextStatementPreview};

use std::path::Path;

use crate::error::ImportError;
use crate::models::ParsedTransaction;

/// Detected source format plus the preview shown before parsing is confirmed.
#[derive(Debug, Clone)]
pub enum StatementFormat {
    Csv(CsvPreview),
    FixedText(TextStatementPreview),
    Pdf(PdfPreview),
}

/// Common contract for the three parser variants: turn a statement file into
/// canonical transactions, or fail without touching any shared state.
pub trait StatementParser {
    fn parse(&self, path: &Path) -> Result<Vec<ParsedTransaction>, ImportError>;
}
