//! Anomaly detector — Z-score outlier flagging over cost, loan, and
//! monthly-KPI populations.
//!
//! Z = (x − μ) / σ with sample standard deviation over the full set
//! being evaluated. A constant series (σ = 0) flags nothing: no
//! division by zero, no false positives. Output order follows input
//! order; callers sort if they need severity ranking.

use crate::{
    config::AnalyticsConfig,
    model::{AnomalyCategory, AnomalyRecord, AnomalySummaryRow, CostEntry, Loan, MonthlyKpi},
};
use std::collections::{BTreeMap, HashMap};

pub struct AnomalyDetector {
    threshold: f64,
    rolling_window: usize,
}

impl AnomalyDetector {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            threshold: config.z_score_threshold,
            rolling_window: config.rolling_window,
        }
    }

    // ── Core scoring ───────────────────────────────────────────

    /// Z-scores for a series, or None when the series is degenerate
    /// (fewer than two values, or all values identical).
    pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = var.sqrt();
        if std_dev == 0.0 {
            return None;
        }
        Some(values.iter().map(|v| (v - mean) / std_dev).collect())
    }

    /// Z-score every record for which `field` yields a value. Returns
    /// (input index, z) pairs in input order. Records with no defined
    /// value are excluded from both the population and the output.
    pub fn score<T, F>(&self, records: &[T], field: F) -> Vec<(usize, f64)>
    where
        F: Fn(&T) -> Option<f64>,
    {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(v) = field(record) {
                indices.push(i);
                values.push(v);
            }
        }
        match Self::z_scores(&values) {
            Some(zs) => indices.into_iter().zip(zs).collect(),
            None => Vec::new(),
        }
    }

    /// Records whose |Z| exceeds the configured threshold, in input
    /// order. Deterministic for fixed input.
    pub fn detect<T, F>(&self, records: &[T], field: F) -> Vec<(usize, f64)>
    where
        F: Fn(&T) -> Option<f64>,
    {
        self.score(records, field)
            .into_iter()
            .filter(|(_, z)| z.abs() > self.threshold)
            .collect()
    }

    // ── Population scans ───────────────────────────────────────

    /// Scan costs over variance_pct and actual_amount. A record
    /// flagged on either field yields one AnomalyRecord whose severity
    /// is the larger |Z| of the two.
    pub fn cost_anomalies(&self, costs: &[CostEntry]) -> Vec<AnomalyRecord> {
        let scans: [(&str, &str, Vec<(usize, f64)>); 2] = [
            (
                "variance_pct",
                "High Variance",
                self.score(costs, |c| c.variance_pct.value()),
            ),
            (
                "actual_amount",
                "High Amount",
                self.score(costs, |c| Some(c.actual_amount)),
            ),
        ];
        self.merge_scans(costs.len(), &scans, |i| {
            (AnomalyCategory::Cost, costs[i].cost_id.to_string())
        })
    }

    /// Scan loans over pd, ecl, and ead.
    pub fn loan_anomalies(&self, loans: &[Loan]) -> Vec<AnomalyRecord> {
        let scans: [(&str, &str, Vec<(usize, f64)>); 3] = [
            ("pd", "High PD", self.score(loans, |l| Some(l.pd))),
            (
                "ecl",
                "High ECL",
                self.score(loans, |l| Some(l.pd * l.lgd * l.ead)),
            ),
            ("ead", "High EAD", self.score(loans, |l| Some(l.ead))),
        ];
        self.merge_scans(loans.len(), &scans, |i| {
            (AnomalyCategory::Loan, loans[i].loan_id.to_string())
        })
    }

    /// One record per flagged input row. The first scan whose |Z|
    /// exceeds the threshold names the anomaly type; severity is the
    /// maximum |Z| across all scans.
    fn merge_scans<G>(
        &self,
        record_count: usize,
        scans: &[(&str, &str, Vec<(usize, f64)>)],
        identity: G,
    ) -> Vec<AnomalyRecord>
    where
        G: Fn(usize) -> (AnomalyCategory, String),
    {
        let by_index: Vec<HashMap<usize, f64>> = scans
            .iter()
            .map(|(_, _, pairs)| pairs.iter().copied().collect())
            .collect();

        let mut out = Vec::new();
        for i in 0..record_count {
            let mut severity = 0.0f64;
            let mut label: Option<(&str, &str)> = None;
            for (scan, zs) in scans.iter().zip(&by_index) {
                if let Some(z) = zs.get(&i) {
                    severity = severity.max(z.abs());
                    if label.is_none() && z.abs() > self.threshold {
                        label = Some((scan.0, scan.1));
                    }
                }
            }
            if let Some((metric, anomaly_type)) = label {
                let (category, source_id) = identity(i);
                out.push(AnomalyRecord {
                    category,
                    source_id,
                    metric: metric.to_string(),
                    anomaly_type: anomaly_type.to_string(),
                    severity,
                });
            }
        }
        out
    }

    /// Rollup of a run's anomalies per (category, anomaly type), for
    /// the summary report.
    pub fn summarize(anomalies: &[AnomalyRecord]) -> Vec<AnomalySummaryRow> {
        #[derive(Default)]
        struct Acc {
            count: i64,
            max: f64,
            sum: f64,
        }

        let mut groups: BTreeMap<(AnomalyCategory, String), Acc> = BTreeMap::new();
        for a in anomalies {
            let acc = groups
                .entry((a.category, a.anomaly_type.clone()))
                .or_default();
            acc.count += 1;
            acc.max = acc.max.max(a.severity);
            acc.sum += a.severity;
        }

        groups
            .into_iter()
            .map(|((category, anomaly_type), acc)| AnomalySummaryRow {
                category,
                anomaly_type,
                count: acc.count,
                max_severity: acc.max,
                avg_severity: acc.sum / acc.count as f64,
            })
            .collect()
    }

    // ── Rolling KPI anomalies ──────────────────────────────────

    /// Time-series scan of the monthly KPI series. Each month is
    /// scored against the mean/std of the trailing window of months
    /// before it, so the score measures a shift from recent baseline.
    /// Series no longer than the window (and baselines with σ = 0)
    /// flag nothing.
    pub fn kpi_anomalies(&self, kpis: &[MonthlyKpi]) -> Vec<AnomalyRecord> {
        let metrics: [(&str, fn(&MonthlyKpi) -> Option<f64>); 4] = [
            ("total_revenue", |k| Some(k.total_revenue)),
            ("actual_amount", |k| Some(k.actual_amount)),
            ("profit", |k| Some(k.profit)),
            ("variance_pct", |k| k.variance_pct.value()),
        ];

        let mut out = Vec::new();
        for (metric, field) in metrics {
            for (i, z) in self.rolling_z(kpis, field) {
                if z.abs() > self.threshold {
                    out.push(AnomalyRecord {
                        category: AnomalyCategory::Kpi,
                        source_id: kpis[i].month.clone(),
                        metric: metric.to_string(),
                        anomaly_type: "KPI Shift".to_string(),
                        severity: z.abs(),
                    });
                }
            }
        }
        out
    }

    /// Rolling Z-score per point against the window of points before
    /// it. The first `window` points have no full baseline and are
    /// never scored.
    fn rolling_z(
        &self,
        kpis: &[MonthlyKpi],
        field: fn(&MonthlyKpi) -> Option<f64>,
    ) -> Vec<(usize, f64)> {
        let window = self.rolling_window;
        if window < 2 || kpis.len() <= window {
            return Vec::new();
        }

        let values: Vec<Option<f64>> = kpis.iter().map(field).collect();
        let mut out = Vec::new();
        for i in window..kpis.len() {
            let Some(x) = values[i] else { continue };
            let baseline: Vec<f64> = values[i - window..i].iter().flatten().copied().collect();
            if baseline.len() < window {
                continue; // undefined value inside the window
            }
            let n = baseline.len() as f64;
            let mean = baseline.iter().sum::<f64>() / n;
            let var = baseline.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let std_dev = var.sqrt();
            if std_dev == 0.0 {
                continue;
            }
            out.push((i, (x - mean) / std_dev));
        }
        out
    }
}
