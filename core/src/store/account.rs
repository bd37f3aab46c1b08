use super::{parse_date, parse_enum, AnalyticsStore};
use crate::{
    error::AnalyticsResult,
    model::{Account, AccountStatus, AccountType},
};
use rusqlite::params;

impl AnalyticsStore {
    // ── Accounts ──────────────────────────────────────────────

    pub fn insert_accounts(&self, accounts: &[Account]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO accounts
                 (account_id, customer_id, account_type, account_status,
                  opening_date, current_balance, currency)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for a in accounts {
                stmt.execute(params![
                    a.account_id,
                    a.customer_id,
                    a.account_type.as_str(),
                    a.account_status.as_str(),
                    a.opening_date.to_string(),
                    a.current_balance,
                    a.currency,
                ])?;
            }
            Ok(())
        })
    }

    pub fn accounts(&self) -> AnalyticsResult<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_id, customer_id, account_type, account_status,
                    opening_date, current_balance, currency
             FROM accounts ORDER BY account_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Account {
                account_id: row.get(0)?,
                customer_id: row.get(1)?,
                account_type: parse_enum(2, row.get(2)?, AccountType::parse)?,
                account_status: parse_enum(3, row.get(3)?, AccountStatus::parse)?,
                opening_date: parse_date(4, row.get(4)?)?,
                current_balance: row.get(5)?,
                currency: row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
