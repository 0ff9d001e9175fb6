mod account;
mod category;
mod mapping;
mod result;
mod transaction;

pub use account::{Account, AccountType};
pub use category::Category;
pub use mapping::ColumnMapping;
pub use result::{ImportResult, ImportStats};
pub use transaction::{ParsedTransaction, StoredTransaction, TransferCandidate};

#[cfg(test)]
mod tests;
