use super::{parse_date, AnalyticsStore};
use crate::{error::AnalyticsResult, model::CostEntry, ratio::Ratio};
use rusqlite::params;

impl AnalyticsStore {
    // ── Costs ─────────────────────────────────────────────────

    pub fn insert_costs(&self, costs: &[CostEntry]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO costs
                 (cost_id, cost_date, business_unit, cost_category, vendor,
                  budget_amount, actual_amount, variance_amount, variance_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for c in costs {
                stmt.execute(params![
                    c.cost_id,
                    c.cost_date.to_string(),
                    c.business_unit,
                    c.cost_category,
                    c.vendor,
                    c.budget_amount,
                    c.actual_amount,
                    c.variance_amount,
                    c.variance_pct.value(),
                ])?;
            }
            Ok(())
        })
    }

    pub fn costs(&self) -> AnalyticsResult<Vec<CostEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT cost_id, cost_date, business_unit, cost_category, vendor,
                    budget_amount, actual_amount, variance_amount, variance_pct
             FROM costs ORDER BY cost_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CostEntry {
                cost_id: row.get(0)?,
                cost_date: parse_date(1, row.get(1)?)?,
                business_unit: row.get(2)?,
                cost_category: row.get(3)?,
                vendor: row.get(4)?,
                budget_amount: row.get(5)?,
                actual_amount: row.get(6)?,
                variance_amount: row.get(7)?,
                variance_pct: Ratio::from(row.get::<_, Option<f64>>(8)?),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn cost_count(&self) -> AnalyticsResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM costs", [], |row| row.get(0))?;
        Ok(count)
    }
}
