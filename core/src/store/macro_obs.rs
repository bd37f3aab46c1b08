use super::{parse_date, AnalyticsStore};
use crate::{error::AnalyticsResult, model::MacroObservation};
use rusqlite::params;

impl AnalyticsStore {
    // ── Macro observations ────────────────────────────────────

    pub fn insert_macro_observations(&self, rows: &[MacroObservation]) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            let mut stmt = store.conn.prepare(
                "INSERT INTO macro
                 (date, gdp_growth_rate, unemployment_rate, interest_rate,
                  inflation_rate, consumer_confidence_index)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for m in rows {
                stmt.execute(params![
                    m.date.to_string(),
                    m.gdp_growth_rate,
                    m.unemployment_rate,
                    m.interest_rate,
                    m.inflation_rate,
                    m.consumer_confidence_index,
                ])?;
            }
            Ok(())
        })
    }

    pub fn macro_observations(&self) -> AnalyticsResult<Vec<MacroObservation>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, gdp_growth_rate, unemployment_rate, interest_rate,
                    inflation_rate, consumer_confidence_index
             FROM macro ORDER BY date",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MacroObservation {
                date: parse_date(0, row.get(0)?)?,
                gdp_growth_rate: row.get(1)?,
                unemployment_rate: row.get(2)?,
                interest_rate: row.get(3)?,
                inflation_rate: row.get(4)?,
                consumer_confidence_index: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
