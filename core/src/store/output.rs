//! Run output publication. A run's rows land in one transaction keyed
//! by run_id, so readers either see the whole run or none of it.

use super::AnalyticsStore;
use crate::{
    error::AnalyticsResult,
    model::{AnomalyRecord, LeakageFlag, MonthlyKpi, PortfolioRiskSummary, ScenarioResult},
    ratio::Ratio,
};
use rusqlite::params;

impl AnalyticsStore {
    // ── Output publication ────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn publish_outputs(
        &self,
        run_id: &str,
        seed: Option<u64>,
        started_at: &str,
        kpis: &[MonthlyKpi],
        portfolio: &PortfolioRiskSummary,
        flags: &[LeakageFlag],
        scenarios: &[ScenarioResult],
        anomalies: &[AnomalyRecord],
    ) -> AnalyticsResult<()> {
        self.in_transaction(|store| {
            store.conn.execute(
                "INSERT INTO analytics_run (run_id, seed, version, started_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    run_id,
                    seed.map(|s| s as i64),
                    env!("CARGO_PKG_VERSION"),
                    started_at,
                ],
            )?;

            let mut kpi_stmt = store.conn.prepare(
                "INSERT INTO monthly_kpis
                 (run_id, month, total_revenue, fee_revenue, loan_interest,
                  budget_amount, actual_amount, variance_amount, variance_pct,
                  profit, profit_margin, budgeted_profit, profit_variance,
                  profit_variance_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for k in kpis {
                kpi_stmt.execute(params![
                    run_id,
                    k.month,
                    k.total_revenue,
                    k.fee_revenue,
                    k.loan_interest,
                    k.budget_amount,
                    k.actual_amount,
                    k.variance_amount,
                    k.variance_pct.value(),
                    k.profit,
                    k.profit_margin.value(),
                    k.budgeted_profit,
                    k.profit_variance,
                    k.profit_variance_pct.value(),
                ])?;
            }

            let mut metric_stmt = store.conn.prepare(
                "INSERT INTO portfolio_risk_summary (run_id, metric, value)
                 VALUES (?1, ?2, ?3)",
            )?;
            let metrics: [(&str, Option<f64>); 9] = [
                ("total_loans", Some(portfolio.total_loans as f64)),
                ("total_ead", Some(portfolio.total_ead)),
                ("weighted_avg_pd", portfolio.weighted_avg_pd.value()),
                ("weighted_avg_lgd", portfolio.weighted_avg_lgd.value()),
                ("total_ecl", Some(portfolio.total_ecl)),
                ("ecl_to_ead", portfolio.ecl_to_ead.value()),
                ("delinquency_rate", portfolio.delinquency_rate.value()),
                ("default_rate", portfolio.default_rate.value()),
                ("rejected_loans", Some(portfolio.rejected_loans as f64)),
            ];
            for (metric, value) in metrics {
                metric_stmt.execute(params![run_id, metric, value])?;
            }

            let mut flag_stmt = store.conn.prepare(
                "INSERT INTO cost_leakage_flags
                 (run_id, cost_id, business_unit, cost_category, budget_amount,
                  actual_amount, variance_amount, variance_pct, severity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for f in flags {
                flag_stmt.execute(params![
                    run_id,
                    f.cost_id,
                    f.business_unit,
                    f.cost_category,
                    f.budget_amount,
                    f.actual_amount,
                    f.variance_amount,
                    f.variance_pct,
                    f.severity.as_str(),
                ])?;
            }

            let mut scenario_stmt = store.conn.prepare(
                "INSERT INTO scenario_results
                 (run_id, scenario, stress_factor, base_ecl, stressed_ecl,
                  ecl_change, ecl_change_pct, base_weighted_pd,
                  stressed_weighted_pd, base_profit, stressed_profit,
                  profit_change, profit_change_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for s in scenarios {
                scenario_stmt.execute(params![
                    run_id,
                    s.scenario,
                    s.stress_factor,
                    s.base_ecl,
                    s.stressed_ecl,
                    s.ecl_change,
                    s.ecl_change_pct.value(),
                    s.base_weighted_pd.value(),
                    s.stressed_weighted_pd.value(),
                    s.base_profit,
                    s.stressed_profit,
                    s.profit_change,
                    s.profit_change_pct.value(),
                ])?;
            }

            let mut anomaly_stmt = store.conn.prepare(
                "INSERT INTO anomalies
                 (run_id, category, source_id, metric, anomaly_type, severity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for a in anomalies {
                anomaly_stmt.execute(params![
                    run_id,
                    a.category.as_str(),
                    a.source_id,
                    a.metric,
                    a.anomaly_type,
                    a.severity,
                ])?;
            }

            Ok(())
        })
    }

    // ── Output read-back ──────────────────────────────────────

    pub fn monthly_kpis(&self, run_id: &str) -> AnalyticsResult<Vec<MonthlyKpi>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, total_revenue, fee_revenue, loan_interest,
                    budget_amount, actual_amount, variance_amount, variance_pct,
                    profit, profit_margin, budgeted_profit, profit_variance,
                    profit_variance_pct
             FROM monthly_kpis WHERE run_id = ?1 ORDER BY month",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(MonthlyKpi {
                month: row.get(0)?,
                total_revenue: row.get(1)?,
                fee_revenue: row.get(2)?,
                loan_interest: row.get(3)?,
                budget_amount: row.get(4)?,
                actual_amount: row.get(5)?,
                variance_amount: row.get(6)?,
                variance_pct: Ratio::from(row.get::<_, Option<f64>>(7)?),
                profit: row.get(8)?,
                profit_margin: Ratio::from(row.get::<_, Option<f64>>(9)?),
                budgeted_profit: row.get(10)?,
                profit_variance: row.get(11)?,
                profit_variance_pct: Ratio::from(row.get::<_, Option<f64>>(12)?),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn scenario_results(&self, run_id: &str) -> AnalyticsResult<Vec<ScenarioResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT scenario, stress_factor, base_ecl, stressed_ecl, ecl_change,
                    ecl_change_pct, base_weighted_pd, stressed_weighted_pd,
                    base_profit, stressed_profit, profit_change, profit_change_pct
             FROM scenario_results WHERE run_id = ?1 ORDER BY stress_factor",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(ScenarioResult {
                scenario: row.get(0)?,
                stress_factor: row.get(1)?,
                base_ecl: row.get(2)?,
                stressed_ecl: row.get(3)?,
                ecl_change: row.get(4)?,
                ecl_change_pct: Ratio::from(row.get::<_, Option<f64>>(5)?),
                base_weighted_pd: Ratio::from(row.get::<_, Option<f64>>(6)?),
                stressed_weighted_pd: Ratio::from(row.get::<_, Option<f64>>(7)?),
                base_profit: row.get(8)?,
                stressed_profit: row.get(9)?,
                profit_change: row.get(10)?,
                profit_change_pct: Ratio::from(row.get::<_, Option<f64>>(11)?),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Metric/value pairs for one run's portfolio summary.
    pub fn portfolio_summary_rows(
        &self,
        run_id: &str,
    ) -> AnalyticsResult<Vec<(String, Option<f64>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT metric, value FROM portfolio_risk_summary
             WHERE run_id = ?1 ORDER BY metric",
        )?;
        let rows = stmt.query_map([run_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn leakage_flag_count(&self, run_id: &str) -> AnalyticsResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM cost_leakage_flags WHERE run_id = ?1",
            [run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn anomaly_count(&self, run_id: &str) -> AnalyticsResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM anomalies WHERE run_id = ?1",
            [run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
