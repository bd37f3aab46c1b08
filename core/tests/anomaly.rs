//! Anomaly detector tests: Z-score math, degenerate populations, and
//! the per-category scans.

use chrono::NaiveDate;
use finrisk_core::{
    anomaly::AnomalyDetector,
    config::AnalyticsConfig,
    model::{AnomalyCategory, AnomalyRecord, CostEntry, Loan, LoanStatus, LoanType, MonthlyKpi},
    ratio::Ratio,
};

fn detector(threshold: f64) -> AnomalyDetector {
    AnomalyDetector::new(&AnalyticsConfig {
        z_score_threshold: threshold,
        ..AnalyticsConfig::default()
    })
}

fn loan(loan_id: i64, pd: f64, ead: f64) -> Loan {
    Loan {
        loan_id,
        customer_id: 1,
        loan_type: LoanType::Personal,
        origination_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
        maturity_date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
        original_amount: ead,
        outstanding_balance: ead,
        interest_rate: 0.08,
        loan_status: LoanStatus::Current,
        days_past_due: 0,
        pd,
        lgd: 0.45,
        ead,
        ecl: pd * 0.45 * ead,
    }
}

fn cost(cost_id: i64, budget: f64, actual: f64) -> CostEntry {
    CostEntry {
        cost_id,
        cost_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
        business_unit: "Operations".into(),
        cost_category: "Personnel".into(),
        vendor: None,
        budget_amount: budget,
        actual_amount: actual,
        variance_amount: actual - budget,
        variance_pct: Ratio::of(actual - budget, budget),
    }
}

fn kpi(month: &str, revenue: f64, actual: f64) -> MonthlyKpi {
    let profit = revenue - actual;
    MonthlyKpi {
        month: month.to_string(),
        total_revenue: revenue,
        fee_revenue: revenue,
        loan_interest: 0.0,
        budget_amount: actual,
        actual_amount: actual,
        variance_amount: 0.0,
        variance_pct: Ratio::of(0.0, actual),
        profit,
        profit_margin: Ratio::of(profit, revenue),
        budgeted_profit: profit,
        profit_variance: 0.0,
        profit_variance_pct: Ratio::Undefined,
    }
}

/// A constant series has zero variance: nothing to flag, no division
/// by zero.
#[test]
fn constant_series_flags_nothing() {
    assert!(AnomalyDetector::z_scores(&[5.0, 5.0, 5.0, 5.0]).is_none());
}

/// Fewer than two values cannot have a standard deviation.
#[test]
fn short_series_flags_nothing() {
    assert!(AnomalyDetector::z_scores(&[5.0]).is_none());
    assert!(AnomalyDetector::z_scores(&[]).is_none());
}

/// Z-scores of a full series sum to (numerically) zero.
#[test]
fn z_scores_are_centered() {
    let zs = AnomalyDetector::z_scores(&[1.0, 2.0, 3.0, 4.0, 10.0]).unwrap();
    let sum: f64 = zs.iter().sum();
    assert!(sum.abs() < 1e-9, "z sum {sum}");
}

/// One extreme value in a tight cluster gets the largest |Z| and is
/// the only record past a 1.5 threshold. (With five values the
/// largest possible |Z| under sample std is (n−1)/√n ≈ 1.79.)
#[test]
fn single_outlier_detected() {
    let values = [0.05, 0.06, 0.05, 0.07, 0.50];
    let zs = AnomalyDetector::z_scores(&values).unwrap();
    let max = zs.iter().cloned().fold(f64::MIN, f64::max);
    assert_eq!(zs[4], max, "outlier should carry the largest z");

    let d = detector(1.5);
    let flagged = d.detect(&values.map(Some), |v| *v);
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].0, 4);
}

/// Flags come back in input order, not severity order.
#[test]
fn output_follows_input_order() {
    let values: Vec<Option<f64>> = vec![
        Some(100.0),
        Some(1.0),
        Some(1.0),
        Some(1.0),
        Some(1.0),
        Some(1.0),
        Some(1.0),
        Some(80.0),
    ];
    let d = detector(1.0);
    let flagged = d.detect(&values, |v| *v);
    let indices: Vec<usize> = flagged.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 7]);
}

/// Records with no defined value are excluded from the population.
#[test]
fn undefined_values_excluded() {
    let values = [Some(1.0), None, Some(1.0), Some(1.0)];
    let d = detector(3.0);
    // Remaining population is constant, so nothing scores at all.
    assert!(d.score(&values, |v| *v).is_empty());
}

/// Cost scan flags the overrun row and labels the triggering metric.
#[test]
fn cost_scan_flags_outlier() {
    let mut costs: Vec<CostEntry> = (1..=12)
        .map(|i| cost(i, 1_000.0, 1_000.0 + (i as f64) * 3.0))
        .collect();
    costs.push(cost(13, 1_000.0, 9_000.0));

    let anomalies = detector(3.0).cost_anomalies(&costs);
    assert_eq!(anomalies.len(), 1);
    let a = &anomalies[0];
    assert_eq!(a.category, AnomalyCategory::Cost);
    assert_eq!(a.source_id, "13");
    assert!(a.severity > 3.0);
}

/// Loan scan reports the loan id and the metric that tripped first.
#[test]
fn loan_scan_flags_extreme_pd() {
    let mut loans: Vec<Loan> = (1..=20)
        .map(|i| loan(i, 0.02 + (i as f64) * 0.001, 10_000.0))
        .collect();
    loans.push(loan(21, 0.95, 10_000.0));

    let anomalies = detector(3.0).loan_anomalies(&loans);
    assert!(!anomalies.is_empty());
    let a = anomalies.iter().find(|a| a.source_id == "21").unwrap();
    assert_eq!(a.category, AnomalyCategory::Loan);
    assert_eq!(a.metric, "pd");
    assert_eq!(a.anomaly_type, "High PD");
}

/// A spike after a steady run trips the rolling KPI scan; the source
/// id names the month.
#[test]
fn kpi_spike_detected() {
    let mut kpis: Vec<MonthlyKpi> = vec![
        kpi("2025-01", 1_000.0, 800.0),
        kpi("2025-02", 1_010.0, 805.0),
        kpi("2025-03", 990.0, 795.0),
        kpi("2025-04", 1_005.0, 802.0),
    ];
    kpis.push(kpi("2025-05", 12_000.0, 800.0));

    let anomalies = detector(2.0).kpi_anomalies(&kpis);
    let hit = anomalies
        .iter()
        .find(|a| a.metric == "total_revenue")
        .expect("revenue spike not flagged");
    assert_eq!(hit.category, AnomalyCategory::Kpi);
    assert_eq!(hit.source_id, "2025-05");
    assert_eq!(hit.anomaly_type, "KPI Shift");
}

/// A series shorter than the window flags nothing.
#[test]
fn kpi_short_series_flags_nothing() {
    let kpis = vec![kpi("2025-01", 1_000.0, 800.0), kpi("2025-02", 9_000.0, 800.0)];
    assert!(detector(2.0).kpi_anomalies(&kpis).is_empty());
}

/// A record flagged only by the second scan still carries that scan's
/// label. Here every cost has the same 10% overrun (the variance scan
/// sees a constant series) but one absolute amount is extreme.
#[test]
fn amount_only_outlier_labeled_high_amount() {
    let mut costs: Vec<CostEntry> = (1..=12).map(|i| cost(i, 1_000.0, 1_100.0)).collect();
    costs.push(cost(13, 50_000.0, 55_000.0));

    let anomalies = detector(3.0).cost_anomalies(&costs);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].source_id, "13");
    assert_eq!(anomalies[0].metric, "actual_amount");
    assert_eq!(anomalies[0].anomaly_type, "High Amount");
}

fn record(category: AnomalyCategory, anomaly_type: &str, severity: f64) -> AnomalyRecord {
    AnomalyRecord {
        category,
        source_id: "1".into(),
        metric: "x".into(),
        anomaly_type: anomaly_type.into(),
        severity,
    }
}

/// The summary rolls anomalies up per (category, type) with count,
/// max, and mean severity.
#[test]
fn summary_rolls_up_by_category_and_type() {
    let records = vec![
        record(AnomalyCategory::Cost, "High Variance", 3.2),
        record(AnomalyCategory::Cost, "High Variance", 4.0),
        record(AnomalyCategory::Loan, "High PD", 5.5),
    ];
    let summary = AnomalyDetector::summarize(&records);
    assert_eq!(summary.len(), 2);

    let cost = summary
        .iter()
        .find(|s| s.category == AnomalyCategory::Cost)
        .unwrap();
    assert_eq!(cost.anomaly_type, "High Variance");
    assert_eq!(cost.count, 2);
    assert!((cost.max_severity - 4.0).abs() < 1e-12);
    assert!((cost.avg_severity - 3.6).abs() < 1e-12);

    let loan = summary
        .iter()
        .find(|s| s.category == AnomalyCategory::Loan)
        .unwrap();
    assert_eq!(loan.count, 1);
    assert!((loan.max_severity - 5.5).abs() < 1e-12);
}

/// No anomalies, no summary rows.
#[test]
fn empty_summary_for_no_anomalies() {
    assert!(AnomalyDetector::summarize(&[]).is_empty());
}
