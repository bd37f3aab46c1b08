//! SQLite persistence layer.
//!
//! RULE: only the store modules talk to the database. Pipeline
//! components call typed accessors — they never execute SQL directly.

mod account;
mod cost;
mod customer;
mod ingest;
mod loan;
mod macro_obs;
mod output;
mod transaction;

pub use ingest::IngestSummary;

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Input tables required before the pipeline may run.
const REQUIRED_INPUT_TABLES: [&str; 6] = [
    "customers",
    "accounts",
    "loans",
    "transactions",
    "costs",
    "macro",
];

pub struct AnalyticsStore {
    conn: Connection,
}

impl AnalyticsStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> AnalyticsResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance on real files.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AnalyticsResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalyticsResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_inputs.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_outputs.sql"))?;
        Ok(())
    }

    /// Run `f` inside one transaction; roll back on any error so a
    /// partial batch is never visible.
    pub(crate) fn in_transaction<F>(&self, f: F) -> AnalyticsResult<()>
    where
        F: FnOnce(&Self) -> AnalyticsResult<()>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(()) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Hard failure if any required input table is absent. Empty
    /// tables are allowed — "no data" is handled downstream.
    pub fn require_input_tables(&self) -> AnalyticsResult<()> {
        for table in REQUIRED_INPUT_TABLES {
            let present: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )?;
            if present == 0 {
                return Err(AnalyticsError::MissingInput { table });
            }
        }
        Ok(())
    }
}

// ── Row conversion helpers ─────────────────────────────────────────

fn parse_date(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_enum<T>(idx: usize, s: String, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(&s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unknown enum value '{s}'"),
            )),
        )
    })
}
