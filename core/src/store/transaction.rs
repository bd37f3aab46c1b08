use super::{parse_date, parse_enum, AnalyticsStore};
use crate::{
    error::AnalyticsResult,
    model::{TransactionRecord, TransactionType},
};
use rusqlite::params;

impl AnalyticsStore {
    // ── Transactions ──────────────────────────────────────────

    pub fn insert_transactions(&self, transactions: &[TransactionRecord]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO transactions
                 (transaction_id, account_id, customer_id, transaction_date,
                  transaction_type, amount, category, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for t in transactions {
                stmt.execute(params![
                    t.transaction_id,
                    t.account_id,
                    t.customer_id,
                    t.transaction_date.to_string(),
                    t.transaction_type.as_str(),
                    t.amount,
                    t.category,
                    t.description,
                ])?;
            }
            Ok(())
        })
    }

    pub fn transactions(&self) -> AnalyticsResult<Vec<TransactionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, account_id, customer_id, transaction_date,
                    transaction_type, amount, category, description
             FROM transactions ORDER BY transaction_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TransactionRecord {
                transaction_id: row.get(0)?,
                account_id: row.get(1)?,
                customer_id: row.get(2)?,
                transaction_date: parse_date(3, row.get(3)?)?,
                transaction_type: parse_enum(4, row.get(4)?, TransactionType::parse)?,
                amount: row.get(5)?,
                category: row.get(6)?,
                description: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn transaction_count(&self) -> AnalyticsResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
