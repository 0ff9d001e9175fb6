//! Bank statement ingestion and normalization.
//!
//! Turns raw statement exports (CSV, fixed-format text, PDF) into canonical
//! transactions in signed cents, then walks an import session through the
//! wizard steps: pick a file, map columns (CSV only), preview and select
//! rows, commit them into a [`ledger::Ledger`], and confirm any transfer
//! pairs the committed data reveals.

pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod selection;
mod transfer;
pub mod wizard;

pub use error::ImportError;
pub use ledger::{Ledger, SqliteLedger};
pub use models::{ColumnMapping, ImportResult, ParsedTransaction};
pub use wizard::{ImportWizard, WizardState};
