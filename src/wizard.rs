use std::path::PathBuf;

use crate::error::ImportError;
use crate::import::{
    detect_statement, infer_mapping, CsvParser, CsvPreview, PdfParser, StatementFormat,
    StatementParser, TextStatementParser, CONFIDENCE_WARN_FLOOR,
};
use crate::ledger::Ledger;
use crate::models::{ColumnMapping, ImportResult, ParsedTransaction, TransferCandidate};
use crate::selection::{sorted_view, SelectionSet, SortColumn, SortOrder};

/// The Mapping step: raw CSV sample plus the editable column mapping. Only
/// here is the mapping mutable; confirming it freezes a copy into the
/// preview.
#[derive(Debug)]
pub struct MappingState {
    pub path: PathBuf,
    pub preview: CsvPreview,
    pub mapping: ColumnMapping,
}

/// Where the previewed transactions came from, with the source-specific
/// details the Preview step surfaces.
#[derive(Debug)]
pub enum PreviewSource {
    Csv {
        path: PathBuf,
        raw: CsvPreview,
        mapping: ColumnMapping,
    },
    FixedText {
        beginning_balance: Option<i64>,
        ending_balance: Option<i64>,
    },
    Pdf {
        detected_format: Option<String>,
        confidence: f32,
    },
}

/// The Preview step: fully parsed transactions awaiting row selection and
/// commit. Sorting is a view concern; the transaction list and the selection
/// indices never reorder.
#[derive(Debug)]
pub struct PreviewState {
    pub transactions: Vec<ParsedTransaction>,
    pub selection: SelectionSet,
    pub sort: Option<SortOrder>,
    pub source: PreviewSource,
}

impl PreviewState {
    fn new(transactions: Vec<ParsedTransaction>, source: PreviewSource) -> Self {
        let selection = SelectionSet::all(transactions.len());
        PreviewState {
            transactions,
            selection,
            sort: None,
            source,
        }
    }

    /// True when the source was a PDF extracted with shaky confidence; the
    /// caller should warn before letting the user commit.
    pub fn low_confidence(&self) -> bool {
        match &self.source {
            PreviewSource::Pdf { confidence, .. } => *confidence < CONFIDENCE_WARN_FLOOR,
            _ => false,
        }
    }

    /// Cycle the sort for a column: first click applies the column default,
    /// a second click reverses it.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = Some(match self.sort {
            Some(order) if order.column == column => order.reversed(),
            _ => SortOrder::default_for(column),
        });
    }

    /// Row indices in display order.
    pub fn view(&self) -> Vec<usize> {
        match self.sort {
            Some(order) => sorted_view(&self.transactions, order),
            None => (0..self.transactions.len()).collect(),
        }
    }

    /// Net signed sum of the selected rows, in cents.
    pub fn selected_sum(&self) -> i64 {
        self.selection.sum(&self.transactions)
    }
}

/// The Transfers step: candidates awaiting confirmation, plus the result so
/// far. Confirmed links accumulate into the result.
#[derive(Debug)]
pub struct TransfersState {
    pub candidates: Vec<TransferCandidate>,
    result: ImportResult,
}

/// Wizard steps. Data flows strictly forward: each state owns exactly what
/// its step needs, so there is no way to commit without a preview or to link
/// transfers without a committed import.
#[derive(Debug)]
pub enum WizardState {
    Upload,
    Mapping(MappingState),
    Preview(PreviewState),
    Transfers(TransfersState),
    Complete(ImportResult),
}

impl WizardState {
    fn step_name(&self) -> &'static str {
        match self {
            WizardState::Upload => "Upload",
            WizardState::Mapping(_) => "Mapping",
            WizardState::Preview(_) => "Preview",
            WizardState::Transfers(_) => "Transfers",
            WizardState::Complete(_) => "Complete",
        }
    }
}

/// Statement import wizard: Upload, Mapping (CSV only), Preview, Transfers,
/// Complete. Every failure leaves the current step intact so the user can
/// correct and retry; only a successful commit moves past Preview.
pub struct ImportWizard<L: Ledger> {
    ledger: L,
    state: WizardState,
}

impl<L: Ledger> ImportWizard<L> {
    pub fn new(ledger: L) -> Self {
        ImportWizard {
            ledger,
            state: WizardState::Upload,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Final counts, once the wizard has completed.
    pub fn result(&self) -> Option<ImportResult> {
        match &self.state {
            WizardState::Complete(result) => Some(*result),
            _ => None,
        }
    }

    /// Detect the chosen file's format and advance. CSV goes through the
    /// Mapping step with an inferred starting mapping; fixed-text and PDF
    /// statements carry their own structure and jump straight to Preview.
    pub fn choose_file(&mut self, path: PathBuf) -> Result<(), ImportError> {
        if !matches!(self.state, WizardState::Upload) {
            return Err(ImportError::InvalidState(self.state.step_name()));
        }

        match detect_statement(&path)? {
            StatementFormat::Csv(preview) => {
                let mapping = infer_mapping(&preview.headers);
                self.state = WizardState::Mapping(MappingState {
                    path,
                    preview,
                    mapping,
                });
            }
            StatementFormat::FixedText(preview) => {
                let transactions = TextStatementParser.parse(&path)?;
                self.state = WizardState::Preview(PreviewState::new(
                    transactions,
                    PreviewSource::FixedText {
                        beginning_balance: preview.beginning_balance,
                        ending_balance: preview.ending_balance,
                    },
                ));
            }
            StatementFormat::Pdf(preview) => {
                let transactions = PdfParser.parse(&path)?;
                self.state = WizardState::Preview(PreviewState::new(
                    transactions,
                    PreviewSource::Pdf {
                        detected_format: preview.detected_format,
                        confidence: preview.confidence,
                    },
                ));
            }
        }
        Ok(())
    }

    /// The editable mapping, while on the Mapping step.
    pub fn mapping_mut(&mut self) -> Option<&mut ColumnMapping> {
        match &mut self.state {
            WizardState::Mapping(m) => Some(&mut m.mapping),
            _ => None,
        }
    }

    /// Parse the full CSV with the current mapping and advance to Preview.
    /// A parse failure keeps the Mapping step so the mapping can be fixed.
    pub fn confirm_mapping(&mut self) -> Result<(), ImportError> {
        let WizardState::Mapping(m) = &self.state else {
            return Err(ImportError::InvalidState(self.state.step_name()));
        };

        let parser = CsvParser {
            mapping: m.mapping.clone(),
        };
        let transactions = parser.parse(&m.path)?;

        let WizardState::Mapping(m) = std::mem::replace(&mut self.state, WizardState::Upload)
        else {
            unreachable!("state checked above");
        };
        self.state = WizardState::Preview(PreviewState::new(
            transactions,
            PreviewSource::Csv {
                path: m.path,
                raw: m.preview,
                mapping: m.mapping,
            },
        ));
        Ok(())
    }

    /// The preview, while on the Preview step.
    pub fn preview_mut(&mut self) -> Option<&mut PreviewState> {
        match &mut self.state {
            WizardState::Preview(p) => Some(p),
            _ => None,
        }
    }

    /// Commit the selected rows into `account_id`. On success the wizard
    /// moves to Transfers when new transfer candidates exist, otherwise
    /// straight to Complete; the Preview state is consumed either way, so a
    /// double commit is impossible. On failure the Preview step survives
    /// untouched for a retry.
    pub fn commit(&mut self, account_id: i64) -> Result<(), ImportError> {
        let WizardState::Preview(p) = &self.state else {
            return Err(ImportError::InvalidState(self.state.step_name()));
        };
        if p.selection.is_empty() {
            return Err(ImportError::Commit(anyhow::anyhow!(
                "no transactions selected"
            )));
        }

        let selected: Vec<ParsedTransaction> = p
            .selection
            .selected_transactions(&p.transactions)
            .into_iter()
            .cloned()
            .collect();

        let stats = self
            .ledger
            .import_transactions(account_id, &selected)
            .map_err(ImportError::Commit)?;
        let result = ImportResult::from(stats);

        // Transfer detection is best-effort; a failure here never undoes a
        // successful commit.
        let candidates = if stats.imported > 0 {
            match self.ledger.detect_transfers() {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::warn!("transfer detection failed after import: {e:#}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        self.state = if candidates.is_empty() {
            WizardState::Complete(result)
        } else {
            WizardState::Transfers(TransfersState { candidates, result })
        };
        Ok(())
    }

    /// Confirm one transfer candidate. Both sides get linked in the ledger
    /// and every remaining candidate touching either side is dropped.
    pub fn link_candidate(&mut self, index: usize) -> Result<(), ImportError> {
        let WizardState::Transfers(t) = &mut self.state else {
            return Err(ImportError::InvalidState(self.state.step_name()));
        };
        let Some(candidate) = t.candidates.get(index) else {
            return Err(ImportError::InvalidState("Transfers"));
        };
        let (id_a, id_b) = (candidate.transaction_a.id, candidate.transaction_b.id);

        self.ledger
            .link_transfer(id_a, id_b)
            .map_err(ImportError::Commit)?;

        t.result.transfers_linked += 1;
        t.candidates.retain(|c| {
            c.transaction_a.id != id_a
                && c.transaction_a.id != id_b
                && c.transaction_b.id != id_a
                && c.transaction_b.id != id_b
        });

        if t.candidates.is_empty() {
            let result = t.result;
            self.state = WizardState::Complete(result);
        }
        Ok(())
    }

    /// Dismiss one candidate without linking.
    pub fn reject_candidate(&mut self, index: usize) -> Result<(), ImportError> {
        let WizardState::Transfers(t) = &mut self.state else {
            return Err(ImportError::InvalidState(self.state.step_name()));
        };
        if index >= t.candidates.len() {
            return Err(ImportError::InvalidState("Transfers"));
        }
        t.candidates.remove(index);

        if t.candidates.is_empty() {
            let result = t.result;
            self.state = WizardState::Complete(result);
        }
        Ok(())
    }

    /// Leave remaining candidates unlinked and finish.
    pub fn skip_transfers(&mut self) -> Result<(), ImportError> {
        let WizardState::Transfers(t) = &self.state else {
            return Err(ImportError::InvalidState(self.state.step_name()));
        };
        let result = t.result;
        self.state = WizardState::Complete(result);
        Ok(())
    }

    /// One step back: Mapping returns to Upload, a CSV preview returns to
    /// Mapping with its mapping intact, and previews without a mapping step
    /// return to Upload.
    pub fn back(&mut self) -> Result<(), ImportError> {
        if !matches!(
            self.state,
            WizardState::Mapping(_) | WizardState::Preview(_)
        ) {
            return Err(ImportError::InvalidState(self.state.step_name()));
        }

        if let WizardState::Preview(p) = std::mem::replace(&mut self.state, WizardState::Upload) {
            if let PreviewSource::Csv { path, raw, mapping } = p.source {
                self.state = WizardState::Mapping(MappingState {
                    path,
                    preview: raw,
                    mapping,
                });
            }
        }
        Ok(())
    }

    /// Abandon the in-flight session. Committed data stays committed; only
    /// a finished wizard refuses, since there is nothing left to abandon.
    pub fn cancel(&mut self) -> Result<(), ImportError> {
        if matches!(self.state, WizardState::Complete(_)) {
            return Err(ImportError::InvalidState("Complete"));
        }
        self.state = WizardState::Upload;
        Ok(())
    }

    /// Start a fresh session after finishing one.
    pub fn import_more(&mut self) -> Result<(), ImportError> {
        match self.state {
            WizardState::Transfers(_) | WizardState::Complete(_) => {
                self.state = WizardState::Upload;
                Ok(())
            }
            _ => Err(ImportError::InvalidState(self.state.step_name())),
        }
    }
}

#[cfg(test)]
#[path = "wizard_tests.rs"]
mod tests;
