mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use crate::models::{
    Account, AccountType, Category, ImportStats, ParsedTransaction, StoredTransaction,
    TransferCandidate,
};
use crate::transfer;

/// Persistence boundary for committed imports. The wizard only ever talks to
/// this trait, so tests drive it with an in-memory fake and the application
/// hands it a [`SqliteLedger`].
pub trait Ledger {
    fn list_accounts(&self) -> Result<Vec<Account>>;
    fn create_account(&mut self, account: &Account) -> Result<i64>;
    fn list_categories(&self) -> Result<Vec<Category>>;

    /// Commit parsed transactions into one account, atomically. Exact
    /// duplicates (same account, date, amount, and payee) are skipped rather
    /// than inserted twice; category hints that match an existing category
    /// name are resolved.
    fn import_transactions(
        &mut self,
        account_id: i64,
        transactions: &[ParsedTransaction],
    ) -> Result<ImportStats>;

    /// Scan recent unlinked transactions for probable transfer pairs.
    fn detect_transfers(&self) -> Result<Vec<TransferCandidate>>;

    /// Mark two transactions as the two sides of one transfer.
    fn link_transfer(&mut self, id_a: i64, id_b: i64) -> Result<()>;

    /// Undo a link from either side.
    fn unlink_transfer(&mut self, id: i64) -> Result<()>;
}

/// Only transactions this recent are considered for transfer detection.
const TRANSFER_LOOKBACK_DAYS: i64 = 90;

pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set ledger pragmas")?;
        let mut ledger = Self { conn };
        ledger.migrate().context("Ledger migration failed")?;
        ledger.seed_default_categories()?;
        Ok(ledger)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut ledger = Self { conn };
        ledger.migrate()?;
        ledger.seed_default_categories()?;
        Ok(ledger)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            "Dining",
            "Entertainment",
            "Fees & Charges",
            "Gas & Fuel",
            "Groceries",
            "Healthcare",
            "Income",
            "Insurance",
            "Personal Care",
            "Shopping",
            "Subscriptions",
            "Transfer",
            "Transportation",
            "Travel",
            "Uncategorized",
            "Utilities",
        ];

        let tx = self.conn.transaction()?;
        for name in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Lowercase category name to id, for resolving parser hints.
    fn category_index(&self) -> Result<HashMap<String, i64>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM categories")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(1)?.to_lowercase(), row.get::<_, i64>(0)?))
        })?;
        Ok(rows.collect::<std::result::Result<HashMap<_, _>, _>>()?)
    }

    fn stored_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredTransaction> {
        Ok(StoredTransaction {
            id: row.get(0)?,
            account_id: row.get(1)?,
            date: row.get(2)?,
            amount: row.get(3)?,
            payee: row.get(4)?,
            memo: row.get(5)?,
            category_id: row.get(6)?,
            transfer_peer: row.get(7)?,
        })
    }

    /// All-time balance of one account, in cents.
    pub fn account_balance(&self, account_id: i64) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE account_id = ?1",
            params![account_id],
            |row| row.get(0),
        )?)
    }

    #[cfg(test)]
    pub fn get_transaction(&self, id: i64) -> Result<Option<StoredTransaction>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, account_id, date, amount, payee, memo, category_id, transfer_peer
                 FROM transactions WHERE id = ?1",
                params![id],
                |row| Self::stored_transaction(row),
            )
            .optional()?)
    }
}

impl Ledger for SqliteLedger {
    fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, account_type, currency, created_at FROM accounts ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Account {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                account_type: AccountType::parse(&row.get::<_, String>(2)?),
                currency: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn create_account(&mut self, account: &Account) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO accounts (name, account_type, currency, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                account.name,
                account.account_type.as_str(),
                account.currency,
                account.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn import_transactions(
        &mut self,
        account_id: i64,
        transactions: &[ParsedTransaction],
    ) -> Result<ImportStats> {
        let categories = self.category_index()?;
        let now = chrono::Utc::now().to_rfc3339();
        let mut stats = ImportStats::default();

        let tx = self.conn.transaction()?;
        for txn in transactions {
            // Duplicate check; `IS` keeps NULL payees comparable.
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM transactions
                  WHERE account_id = ?1 AND date = ?2 AND amount = ?3 AND payee IS ?4)",
                params![account_id, txn.date, txn.amount, txn.payee],
                |row| row.get(0),
            )?;
            if exists {
                stats.skipped += 1;
                continue;
            }

            let category_id = txn
                .category_hint
                .as_deref()
                .and_then(|hint| categories.get(&hint.to_lowercase()))
                .copied();
            if category_id.is_some() {
                stats.categorized += 1;
            }

            tx.execute(
                "INSERT INTO transactions (account_id, date, amount, payee, memo, category_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    account_id,
                    txn.date,
                    txn.amount,
                    txn.payee,
                    txn.memo,
                    category_id,
                    now,
                ],
            )?;
            stats.imported += 1;
        }
        tx.commit()?;

        log::info!(
            "imported {} transactions into account {} ({} skipped, {} categorized)",
            stats.imported,
            account_id,
            stats.skipped,
            stats.categorized
        );
        Ok(stats)
    }

    fn detect_transfers(&self) -> Result<Vec<TransferCandidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, date, amount, payee, memo, category_id, transfer_peer
             FROM transactions
             WHERE transfer_peer IS NULL
               AND date >= date('now', ?1)
             ORDER BY date DESC",
        )?;
        let lookback = format!("-{TRANSFER_LOOKBACK_DAYS} days");
        let rows = stmt.query_map(params![lookback], |row| Self::stored_transaction(row))?;
        let transactions = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transfer::find_candidates(&transactions))
    }

    fn link_transfer(&mut self, id_a: i64, id_b: i64) -> Result<()> {
        anyhow::ensure!(id_a != id_b, "cannot link a transaction to itself");
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE transactions SET transfer_peer = ?1 WHERE id = ?2",
            params![id_b, id_a],
        )? + tx.execute(
            "UPDATE transactions SET transfer_peer = ?1 WHERE id = ?2",
            params![id_a, id_b],
        )?;
        anyhow::ensure!(updated == 2, "transfer link referenced a missing transaction");
        tx.commit()?;
        Ok(())
    }

    fn unlink_transfer(&mut self, id: i64) -> Result<()> {
        let peer: Option<i64> = self
            .conn
            .query_row(
                "SELECT transfer_peer FROM transactions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE transactions SET transfer_peer = NULL WHERE id = ?1",
            params![id],
        )?;
        if let Some(peer_id) = peer {
            tx.execute(
                "UPDATE transactions SET transfer_peer = NULL WHERE id = ?1",
                params![peer_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
