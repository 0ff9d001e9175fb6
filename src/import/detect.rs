use std::path::Path;

use super::{preview_csv, preview_pdf, preview_text_statement, StatementFormat};
use crate::error::ImportError;

/// Decide how to parse a statement file, by extension first and then by
/// content.
///
/// PDFs never fall back: a PDF that yields no transactions is an error, since
/// treating binary PDF bytes as CSV would only produce garbage rows. A `.txt`
/// file that doesn't match the fixed statement format is retried as CSV,
/// because plenty of banks hand out comma-separated data with a `.txt` name.
pub fn detect_statement(path: &Path) -> Result<StatementFormat, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => {
            let preview =
                preview_pdf(path).map_err(|e| ImportError::FormatDetection(e.to_string()))?;
            if preview.transactions.is_empty() {
                return Err(ImportError::FormatDetection(
                    "No transactions found in the PDF. Try exporting the statement \
                     as CSV from your bank instead."
                        .into(),
                ));
            }
            log::info!(
                "detected PDF statement ({} rows, confidence {:.2})",
                preview.total_rows,
                preview.confidence
            );
            Ok(StatementFormat::Pdf(preview))
        }
        "txt" => {
            match preview_text_statement(path) {
                Ok(preview) if !preview.transactions.is_empty() => {
                    log::info!(
                        "detected fixed-format text statement ({} rows)",
                        preview.total_rows
                    );
                    return Ok(StatementFormat::FixedText(preview));
                }
                Ok(_) => {
                    log::debug!(
                        "no fixed-format rows in {}, retrying as CSV",
                        path.display()
                    );
                }
                Err(e) => {
                    log::debug!(
                        "fixed-format scan failed for {}, retrying as CSV: {e}",
                        path.display()
                    );
                }
            }
            detect_csv(path)
        }
        _ => detect_csv(path),
    }
}

fn detect_csv(path: &Path) -> Result<StatementFormat, ImportError> {
    let preview = preview_csv(path).map_err(|e| ImportError::FormatDetection(e.to_string()))?;
    log::info!("detected CSV statement ({} rows)", preview.total_rows);
    Ok(StatementFormat::Csv(preview))
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
