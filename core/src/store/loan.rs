use super::{parse_date, parse_enum, AnalyticsStore};
use crate::{
    error::AnalyticsResult,
    model::{Loan, LoanStatus, LoanType},
};
use rusqlite::params;

impl AnalyticsStore {
    // ── Loans ─────────────────────────────────────────────────

    pub fn insert_loans(&self, loans: &[Loan]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO loans
                 (loan_id, customer_id, loan_type, origination_date, maturity_date,
                  original_amount, outstanding_balance, interest_rate, loan_status,
                  days_past_due, pd, lgd, ead, ecl)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for l in loans {
                stmt.execute(params![
                    l.loan_id,
                    l.customer_id,
                    l.loan_type.as_str(),
                    l.origination_date.to_string(),
                    l.maturity_date.to_string(),
                    l.original_amount,
                    l.outstanding_balance,
                    l.interest_rate,
                    l.loan_status.as_str(),
                    l.days_past_due,
                    l.pd,
                    l.lgd,
                    l.ead,
                    l.ecl,
                ])?;
            }
            Ok(())
        })
    }

    pub fn loans(&self) -> AnalyticsResult<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT loan_id, customer_id, loan_type, origination_date, maturity_date,
                    original_amount, outstanding_balance, interest_rate, loan_status,
                    days_past_due, pd, lgd, ead, ecl
             FROM loans ORDER BY loan_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Loan {
                loan_id: row.get(0)?,
                customer_id: row.get(1)?,
                loan_type: parse_enum(2, row.get(2)?, LoanType::parse)?,
                origination_date: parse_date(3, row.get(3)?)?,
                maturity_date: parse_date(4, row.get(4)?)?,
                original_amount: row.get(5)?,
                outstanding_balance: row.get(6)?,
                interest_rate: row.get(7)?,
                loan_status: parse_enum(8, row.get(8)?, LoanStatus::parse)?,
                days_past_due: row.get(9)?,
                pd: row.get(10)?,
                lgd: row.get(11)?,
                ead: row.get(12)?,
                ecl: row.get(13)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn loan_count(&self) -> AnalyticsResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM loans", [], |row| row.get(0))?;
        Ok(count)
    }
}
