//! Metric calculator tests: ECL, cost variance, monthly KPIs, and
//! portfolio aggregates.

use chrono::NaiveDate;
use finrisk_core::{
    config::AnalyticsConfig,
    error::AnalyticsError,
    metrics::MetricCalculator,
    model::{
        CostEntry, Loan, LoanStatus, LoanType, TransactionRecord, TransactionType,
    },
    ratio::Ratio,
};

fn calc() -> MetricCalculator {
    MetricCalculator::new(&AnalyticsConfig::default())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn loan(loan_id: i64, pd: f64, lgd: f64, ead: f64) -> Loan {
    Loan {
        loan_id,
        customer_id: 1,
        loan_type: LoanType::Personal,
        origination_date: date(2022, 3, 1),
        maturity_date: date(2027, 3, 1),
        original_amount: ead,
        outstanding_balance: ead,
        interest_rate: 0.08,
        loan_status: LoanStatus::Current,
        days_past_due: 0,
        pd,
        lgd,
        ead,
        ecl: pd * lgd * ead,
    }
}

fn cost(cost_id: i64, month: u32, budget: f64, actual: f64) -> CostEntry {
    CostEntry {
        cost_id,
        cost_date: date(2025, month, 5),
        business_unit: "Operations".into(),
        cost_category: "Software".into(),
        vendor: Some("Hargrove Cloud LLC".into()),
        budget_amount: budget,
        actual_amount: actual,
        variance_amount: actual - budget,
        variance_pct: Ratio::of(actual - budget, budget),
    }
}

fn txn(id: i64, month: u32, kind: TransactionType, amount: f64) -> TransactionRecord {
    TransactionRecord {
        transaction_id: id,
        account_id: 1,
        customer_id: 1,
        transaction_date: date(2025, month, 12),
        transaction_type: kind,
        amount,
        category: "Transfer".into(),
        description: "test".into(),
    }
}

/// ECL is exactly PD × LGD × EAD.
#[test]
fn ecl_formula() {
    let ecl = calc().loan_ecl(&loan(1, 0.025, 0.40, 235_000.0)).unwrap();
    assert!((ecl - 2_350.0).abs() < 1e-9, "ECL was {ecl}");
}

/// Out-of-range PD fails validation instead of producing a number.
#[test]
fn ecl_rejects_invalid_pd() {
    let err = calc().loan_ecl(&loan(7, 1.5, 0.40, 1_000.0)).unwrap_err();
    match err {
        AnalyticsError::Validation { table, id, .. } => {
            assert_eq!(table, "loans");
            assert_eq!(id, 7);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_ead_rejected() {
    assert!(calc().loan_ecl(&loan(2, 0.05, 0.40, -1.0)).is_err());
}

/// Variance percentage is relative to budget.
#[test]
fn cost_variance_pct() {
    let (amount, pct) = MetricCalculator::cost_variance(&cost(1, 6, 50_000.0, 62_000.0));
    assert!((amount - 12_000.0).abs() < 1e-9);
    assert!((pct.value().unwrap() - 0.24).abs() < 1e-9);
}

/// Zero budget: the absolute variance exists, the percentage does not.
#[test]
fn zero_budget_has_undefined_pct() {
    let (amount, pct) = MetricCalculator::cost_variance(&cost(1, 6, 0.0, 500.0));
    assert!((amount - 500.0).abs() < 1e-9);
    assert!(!pct.is_defined());
}

/// Only Fee and Interest transactions count as revenue.
#[test]
fn monthly_kpi_revenue_composition() {
    let txns = vec![
        txn(1, 6, TransactionType::Fee, 100.0),
        txn(2, 6, TransactionType::Interest, 300.0),
        txn(3, 6, TransactionType::Debit, 9_999.0),
        txn(4, 6, TransactionType::Credit, 9_999.0),
    ];
    let costs = vec![cost(1, 6, 150.0, 180.0)];
    let kpis = calc().monthly_kpis(&txns, &costs);

    assert_eq!(kpis.len(), 1);
    let k = &kpis[0];
    assert_eq!(k.month, "2025-06");
    assert!((k.fee_revenue - 100.0).abs() < 1e-9);
    assert!((k.loan_interest - 300.0).abs() < 1e-9);
    assert!((k.total_revenue - 400.0).abs() < 1e-9);
    assert!((k.profit - 220.0).abs() < 1e-9);
    assert!((k.budgeted_profit - 250.0).abs() < 1e-9);
    assert!((k.profit_variance + 30.0).abs() < 1e-9);
    assert!((k.profit_margin.value().unwrap() - 0.55).abs() < 1e-9);
}

/// Months come out in ascending order, one row per month seen in
/// either source.
#[test]
fn monthly_kpi_month_ordering() {
    let txns = vec![txn(1, 9, TransactionType::Fee, 10.0)];
    let costs = vec![cost(1, 3, 100.0, 90.0), cost(2, 7, 100.0, 90.0)];
    let months: Vec<String> = calc()
        .monthly_kpis(&txns, &costs)
        .into_iter()
        .map(|k| k.month)
        .collect();
    assert_eq!(months, vec!["2025-03", "2025-07", "2025-09"]);
}

/// A month with costs but no revenue has an undefined profit margin,
/// not a margin of zero or infinity.
#[test]
fn zero_revenue_month_margin_undefined() {
    let costs = vec![cost(1, 2, 100.0, 120.0)];
    let kpis = calc().monthly_kpis(&[], &costs);
    assert_eq!(kpis.len(), 1);
    assert!(!kpis[0].profit_margin.is_defined());
    assert!((kpis[0].profit + 120.0).abs() < 1e-9);
}

/// With equal EADs the weighted average PD equals the plain mean.
#[test]
fn equal_ead_weighted_pd_is_mean() {
    let loans = vec![loan(1, 0.02, 0.5, 1_000.0), loan(2, 0.06, 0.5, 1_000.0)];
    let summary = calc().portfolio_risk(&loans);
    assert!((summary.weighted_avg_pd.value().unwrap() - 0.04).abs() < 1e-12);
    assert!((summary.total_ecl - (0.02 * 0.5 * 1_000.0 + 0.06 * 0.5 * 1_000.0)).abs() < 1e-9);
}

/// Larger exposures pull the weighted PD toward their own PD.
#[test]
fn weighted_pd_follows_exposure() {
    let loans = vec![loan(1, 0.01, 0.5, 9_000.0), loan(2, 0.10, 0.5, 1_000.0)];
    let pd = calc().portfolio_risk(&loans).weighted_avg_pd.value().unwrap();
    assert!((pd - 0.019).abs() < 1e-12, "weighted pd {pd}");
}

/// DPD_30 and DPD_90 both count as delinquent; Default also counts
/// toward the default rate.
#[test]
fn delinquency_and_default_rates() {
    let mut l30 = loan(1, 0.05, 0.5, 1_000.0);
    l30.loan_status = LoanStatus::Dpd30;
    l30.days_past_due = 30;
    let mut l90 = loan(2, 0.05, 0.5, 1_000.0);
    l90.loan_status = LoanStatus::Dpd90;
    l90.days_past_due = 90;
    let mut ldef = loan(3, 0.05, 0.5, 1_000.0);
    ldef.loan_status = LoanStatus::Default;
    ldef.days_past_due = 120;
    let loans = vec![loan(4, 0.05, 0.5, 1_000.0), l30, l90, ldef];

    let summary = calc().portfolio_risk(&loans);
    assert!((summary.delinquency_rate.value().unwrap() - 0.75).abs() < 1e-12);
    assert!((summary.default_rate.value().unwrap() - 0.25).abs() < 1e-12);
}

/// Empty portfolio: zero totals, undefined ratios, no panic.
#[test]
fn empty_portfolio_is_undefined_not_zero() {
    let summary = calc().portfolio_risk(&[]);
    assert_eq!(summary.total_loans, 0);
    assert!(!summary.weighted_avg_pd.is_defined());
    assert!(!summary.delinquency_rate.is_defined());
}

/// Invalid loans are excluded from the aggregates and counted.
#[test]
fn invalid_loans_rejected_from_portfolio() {
    let loans = vec![loan(1, 0.02, 0.5, 1_000.0), loan(2, 2.0, 0.5, 1_000.0)];
    let summary = calc().portfolio_risk(&loans);
    assert_eq!(summary.total_loans, 1);
    assert_eq!(summary.rejected_loans, 1);
    assert!((summary.total_ead - 1_000.0).abs() < 1e-9);
}

/// Same inputs, same outputs; the calculator holds no run state.
#[test]
fn portfolio_risk_is_idempotent() {
    let loans = vec![loan(1, 0.02, 0.4, 5_000.0), loan(2, 0.07, 0.6, 2_000.0)];
    let c = calc();
    let a = c.portfolio_risk(&loans);
    let b = c.portfolio_risk(&loans);
    assert_eq!(a.total_ecl.to_bits(), b.total_ecl.to_bits());
    assert_eq!(
        a.weighted_avg_pd.value().unwrap().to_bits(),
        b.weighted_avg_pd.value().unwrap().to_bits()
    );
}

/// Breakdown by loan type groups and sums correctly.
#[test]
fn risk_breakdown_by_loan_type() {
    let mut auto = loan(1, 0.02, 0.5, 1_000.0);
    auto.loan_type = LoanType::Auto;
    let personal_a = loan(2, 0.04, 0.5, 2_000.0);
    let personal_b = loan(3, 0.06, 0.5, 2_000.0);

    let rows = calc().risk_by_loan_type(&[auto, personal_a, personal_b]);
    assert_eq!(rows.len(), 2);
    let personal = rows.iter().find(|r| r.group == "Personal").unwrap();
    assert_eq!(personal.loan_count, 2);
    assert!((personal.total_ead - 4_000.0).abs() < 1e-9);
    assert!((personal.avg_pd.value().unwrap() - 0.05).abs() < 1e-12);
}
