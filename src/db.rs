use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::models::TransactionRecord;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    number TEXT,
    institution TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subcategories (
    id INTEGER PRIMARY KEY,
    category_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    UNIQUE(category_id, name),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    account_id INTEGER,
    date TEXT NOT NULL,
    action TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    currency TEXT NOT NULL DEFAULT 'USD',
    symbol TEXT,
    payee TEXT,
    txn_type TEXT NOT NULL,
    category_id INTEGER,
    subcategory_id INTEGER,
    confidence REAL NOT NULL DEFAULT 0,
    review_needed INTEGER NOT NULL DEFAULT 0,
    source_file TEXT,
    dedup_hash TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (account_id) REFERENCES accounts(id),
    FOREIGN KEY (category_id) REFERENCES categories(id),
    FOREIGN KEY (subcategory_id) REFERENCES subcategories(id)
);

CREATE TABLE IF NOT EXISTS patterns (
    id INTEGER PRIMARY KEY,
    pattern TEXT NOT NULL,
    scope TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    subcategory_id INTEGER,
    confidence REAL NOT NULL,
    usage_count INTEGER NOT NULL DEFAULT 1,
    last_used TEXT DEFAULT (datetime('now')),
    UNIQUE(pattern, scope),
    FOREIGN KEY (category_id) REFERENCES categories(id),
    FOREIGN KEY (subcategory_id) REFERENCES subcategories(id)
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    checksum TEXT,
    imported INTEGER NOT NULL DEFAULT 0,
    duplicates INTEGER NOT NULL DEFAULT 0,
    skipped INTEGER NOT NULL DEFAULT 0,
    errors INTEGER NOT NULL DEFAULT 0,
    processed INTEGER NOT NULL DEFAULT 0,
    imported_at TEXT DEFAULT (datetime('now'))
);
";

/// Result of attempting to persist one record against the dedup index.
/// Duplicates are an expected outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate,
}

/// Store handle owning the SQLite connection. All business logic lives in
/// the pipeline; this is CRUD only.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    pub fn get_or_create_account(&self, name: &str, number: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM accounts WHERE name = ?1", [name], |r| r.get(0))
            .optional()?;
        if let Some(id) = existing {
            if !number.is_empty() {
                self.conn.execute(
                    "UPDATE accounts SET number = ?1 WHERE id = ?2 AND (number IS NULL OR number = '')",
                    rusqlite::params![number, id],
                )?;
            }
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO accounts (name, number) VALUES (?1, ?2)",
            rusqlite::params![name, if number.is_empty() { None } else { Some(number) }],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // -----------------------------------------------------------------------
    // Taxonomy rows, created lazily on first assignment
    // -----------------------------------------------------------------------

    pub fn get_or_create_category(&self, name: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM categories WHERE name = ?1", [name], |r| r.get(0))
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_or_create_subcategory(&self, category_id: i64, name: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM subcategories WHERE category_id = ?1 AND name = ?2",
                rusqlite::params![category_id, name],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO subcategories (category_id, name) VALUES (?1, ?2)",
            rusqlite::params![category_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    pub fn hash_exists(&self, hash: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM transactions WHERE dedup_hash = ?1")?;
        Ok(stmt.exists([hash])?)
    }

    pub fn insert_transaction(&self, account_id: i64, rec: &TransactionRecord) -> Result<InsertOutcome> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO transactions \
             (account_id, date, action, description, amount, currency, symbol, payee, txn_type, \
              category_id, subcategory_id, confidence, review_needed, source_file, dedup_hash) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            rusqlite::params![
                account_id,
                rec.date.format("%Y-%m-%d").to_string(),
                rec.action,
                rec.description,
                rec.amount,
                rec.currency,
                rec.symbol,
                rec.payee,
                rec.txn_type.key(),
                rec.category_id,
                rec.subcategory_id,
                rec.confidence,
                rec.review_needed as i64,
                rec.source_file,
                rec.dedup_hash,
            ],
        )?;
        if changed == 0 {
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid()))
        }
    }

    // -----------------------------------------------------------------------
    // Import ledger
    // -----------------------------------------------------------------------

    pub fn file_already_imported(&self, checksum: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM imports WHERE checksum = ?1 AND processed = 1")?;
        Ok(stmt.exists([checksum])?)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record_import(
        &self,
        filename: &str,
        checksum: &str,
        imported: usize,
        duplicates: usize,
        skipped: usize,
        errors: usize,
        processed: bool,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO imports (filename, checksum, imported, duplicates, skipped, errors, processed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                filename,
                checksum,
                imported as i64,
                duplicates as i64,
                skipped as i64,
                errors as i64,
                processed as i64,
            ],
        )?;
        Ok(())
    }
}
