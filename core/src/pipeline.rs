//! Batch orchestration: load inputs, derive every output, publish.
//!
//! The pipeline itself holds no state between runs. Each run reads the
//! full input set, recomputes all derived entities from scratch, and
//! publishes them under a fresh run id in one transaction.

use crate::{
    anomaly::AnomalyDetector,
    config::AnalyticsConfig,
    error::AnalyticsResult,
    metrics::MetricCalculator,
    model::{
        AnomalyRecord, AnomalySummaryRow, LeakageFlag, MonthlyKpi, PortfolioRiskSummary,
        RiskBreakdownRow, ScenarioResult, SegmentSensitivityRow, VarianceBreakdownRow,
    },
    scenario::ScenarioSimulator,
    store::AnalyticsStore,
    types::RunId,
};

/// Everything one run produces, before or after publication.
pub struct RunOutputs {
    pub monthly_kpis: Vec<MonthlyKpi>,
    pub portfolio: PortfolioRiskSummary,
    pub leakage_flags: Vec<LeakageFlag>,
    pub scenario_results: Vec<ScenarioResult>,
    pub segment_sensitivity: Vec<SegmentSensitivityRow>,
    pub anomalies: Vec<AnomalyRecord>,
    pub anomaly_summary: Vec<AnomalySummaryRow>,
    pub risk_by_segment: Vec<RiskBreakdownRow>,
    pub risk_by_loan_type: Vec<RiskBreakdownRow>,
    pub risk_by_vintage: Vec<RiskBreakdownRow>,
    pub variance_by_unit: Vec<VarianceBreakdownRow>,
    pub variance_by_category: Vec<VarianceBreakdownRow>,
    pub variance_by_vendor: Vec<VarianceBreakdownRow>,
}

pub struct AnalyticsPipeline {
    config: AnalyticsConfig,
}

impl AnalyticsPipeline {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Run the full analytics pass over the store's input tables.
    /// Nothing is written; see [`run_and_publish`](Self::run_and_publish).
    pub fn run(&self, store: &AnalyticsStore) -> AnalyticsResult<RunOutputs> {
        store.require_input_tables()?;

        log::info!("── loading inputs ──");
        let loans = store.loans()?;
        let transactions = store.transactions()?;
        let costs = store.costs()?;
        let segments = store.customer_segments()?;
        log::info!(
            "loaded {} loans, {} transactions, {} costs",
            loans.len(),
            transactions.len(),
            costs.len()
        );

        let metrics = MetricCalculator::new(&self.config);

        log::info!("── monthly KPIs ──");
        let monthly_kpis = metrics.monthly_kpis(&transactions, &costs);
        log::info!("{} KPI months", monthly_kpis.len());

        log::info!("── portfolio risk ──");
        let portfolio = metrics.portfolio_risk(&loans);
        if portfolio.rejected_loans > 0 {
            log::warn!("{} loans rejected by validation", portfolio.rejected_loans);
        }

        log::info!("── cost variance and leakage ──");
        let leakage_flags = metrics.leakage_flags(&costs);
        log::info!("{} leakage flags", leakage_flags.len());

        log::info!("── stress scenarios ──");
        // Profit baseline for stress: the most recent KPI month.
        let base_profit = monthly_kpis.last().map(|k| k.profit).unwrap_or(0.0);
        let scenario_results = ScenarioSimulator::run_all(&self.config, &loans, base_profit);
        let segment_sensitivity =
            ScenarioSimulator::segment_sensitivity(&self.config, &loans, &segments);

        log::info!("── anomaly detection ──");
        let detector = AnomalyDetector::new(&self.config);
        let mut anomalies = detector.cost_anomalies(&costs);
        anomalies.extend(detector.loan_anomalies(&loans));
        anomalies.extend(detector.kpi_anomalies(&monthly_kpis));
        let anomaly_summary = AnomalyDetector::summarize(&anomalies);
        log::info!("{} anomalies", anomalies.len());

        log::info!("── breakdowns ──");
        Ok(RunOutputs {
            risk_by_segment: metrics.risk_by_segment(&loans, &segments),
            risk_by_loan_type: metrics.risk_by_loan_type(&loans),
            risk_by_vintage: metrics.risk_by_vintage(&loans),
            variance_by_unit: metrics.variance_by_business_unit(&costs),
            variance_by_category: metrics.variance_by_category(&costs),
            variance_by_vendor: metrics.variance_by_vendor(&costs),
            monthly_kpis,
            portfolio,
            leakage_flags,
            scenario_results,
            segment_sensitivity,
            anomalies,
            anomaly_summary,
        })
    }

    /// Run and publish under a fresh run id. The publish is atomic:
    /// a failed run leaves no partial rows behind.
    pub fn run_and_publish(
        &self,
        store: &AnalyticsStore,
        seed: Option<u64>,
    ) -> AnalyticsResult<(RunId, RunOutputs)> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let outputs = self.run(store)?;

        let run_id = uuid::Uuid::new_v4().to_string();
        store.publish_outputs(
            &run_id,
            seed,
            &started_at,
            &outputs.monthly_kpis,
            &outputs.portfolio,
            &outputs.leakage_flags,
            &outputs.scenario_results,
            &outputs.anomalies,
        )?;
        log::info!("published run {run_id}");
        Ok((run_id, outputs))
    }
}
