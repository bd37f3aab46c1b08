use super::{parse_date, parse_enum, AnalyticsStore};
use crate::{
    error::AnalyticsResult,
    model::{Customer, CustomerSegment},
};
use rusqlite::params;
use std::collections::HashMap;

impl AnalyticsStore {
    // ── Customers ─────────────────────────────────────────────

    pub fn insert_customers(&self, customers: &[Customer]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO customers
                 (customer_id, customer_name, date_of_birth, customer_segment,
                  credit_score, registration_date, city, country)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for c in customers {
                stmt.execute(params![
                    c.customer_id,
                    c.customer_name,
                    c.date_of_birth.to_string(),
                    c.customer_segment.as_str(),
                    c.credit_score,
                    c.registration_date.to_string(),
                    c.city,
                    c.country,
                ])?;
            }
            Ok(())
        })
    }

    pub fn customers(&self) -> AnalyticsResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, customer_name, date_of_birth, customer_segment,
                    credit_score, registration_date, city, country
             FROM customers ORDER BY customer_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Customer {
                customer_id: row.get(0)?,
                customer_name: row.get(1)?,
                date_of_birth: parse_date(2, row.get(2)?)?,
                customer_segment: parse_enum(3, row.get(3)?, CustomerSegment::parse)?,
                credit_score: row.get(4)?,
                registration_date: parse_date(5, row.get(5)?)?,
                city: row.get(6)?,
                country: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// customer_id → segment, for the segment risk breakdown.
    pub fn customer_segments(&self) -> AnalyticsResult<HashMap<i64, CustomerSegment>> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id, customer_segment FROM customers")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                parse_enum(1, row.get(1)?, CustomerSegment::parse)?,
            ))
        })?;
        rows.collect::<Result<HashMap<_, _>, _>>()
            .map_err(Into::into)
    }

    pub fn customer_count(&self) -> AnalyticsResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(count)
    }
}
