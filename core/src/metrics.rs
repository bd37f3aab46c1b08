//! Metric calculator — per-record derived fields and monthly/portfolio
//! aggregates.
//!
//! This component is pure: it reads immutable input records and
//! produces fresh derived entities. Invalid records are rejected from
//! aggregates (key logged), never fatal to the batch.

use crate::{
    config::AnalyticsConfig,
    error::{AnalyticsError, AnalyticsResult},
    model::{
        CostEntry, CustomerSegment, LeakageFlag, Loan, MonthlyKpi, PortfolioRiskSummary,
        RiskBreakdownRow, Severity, TransactionRecord, VarianceBreakdownRow,
    },
    ratio::Ratio,
    types::month_key,
};
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

pub struct MetricCalculator {
    config: AnalyticsConfig,
}

impl MetricCalculator {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    // ── Per-loan risk ──────────────────────────────────────────

    /// Check the declared domain constraints on a loan's risk inputs.
    pub fn validate_loan(loan: &Loan) -> AnalyticsResult<()> {
        let reason = if !(0.0..=1.0).contains(&loan.pd) {
            Some(format!("pd {} outside [0, 1]", loan.pd))
        } else if !(0.0..=1.0).contains(&loan.lgd) {
            Some(format!("lgd {} outside [0, 1]", loan.lgd))
        } else if loan.ead < 0.0 {
            Some(format!("ead {} is negative", loan.ead))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(AnalyticsError::Validation {
                table: "loans",
                id: loan.loan_id,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// ECL = PD × LGD × EAD. Fails validation rather than producing a
    /// figure from out-of-range inputs.
    pub fn loan_ecl(&self, loan: &Loan) -> AnalyticsResult<f64> {
        Self::validate_loan(loan)?;
        Ok(loan.pd * loan.lgd * loan.ead)
    }

    // ── Cost variance ──────────────────────────────────────────

    /// (variance_amount, variance_pct). The percentage is undefined
    /// when the budget is zero; the absolute amount always exists.
    pub fn cost_variance(entry: &CostEntry) -> (f64, Ratio) {
        let amount = entry.actual_amount - entry.budget_amount;
        (amount, Ratio::of(amount, entry.budget_amount))
    }

    // ── Monthly KPIs ───────────────────────────────────────────

    /// One KPI row per month seen in either transactions or costs,
    /// in ascending month order.
    pub fn monthly_kpis(
        &self,
        transactions: &[TransactionRecord],
        costs: &[CostEntry],
    ) -> Vec<MonthlyKpi> {
        #[derive(Default)]
        struct Bucket {
            fee: f64,
            interest: f64,
            budget: f64,
            actual: f64,
        }

        let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

        for txn in transactions {
            let bucket = buckets.entry(month_key(txn.transaction_date)).or_default();
            match txn.transaction_type {
                crate::model::TransactionType::Fee => bucket.fee += txn.amount,
                crate::model::TransactionType::Interest => bucket.interest += txn.amount,
                _ => {}
            }
        }

        for cost in costs {
            let bucket = buckets.entry(month_key(cost.cost_date)).or_default();
            bucket.budget += cost.budget_amount;
            bucket.actual += cost.actual_amount;
        }

        buckets
            .into_iter()
            .map(|(month, b)| {
                let total_revenue = b.fee + b.interest;
                let variance_amount = b.actual - b.budget;
                let profit = total_revenue - b.actual;
                let budgeted_profit = total_revenue - b.budget;
                let profit_variance = profit - budgeted_profit;
                MonthlyKpi {
                    month,
                    total_revenue,
                    fee_revenue: b.fee,
                    loan_interest: b.interest,
                    budget_amount: b.budget,
                    actual_amount: b.actual,
                    variance_amount,
                    variance_pct: Ratio::of(variance_amount, b.budget),
                    profit,
                    profit_margin: Ratio::of(profit, total_revenue),
                    budgeted_profit,
                    profit_variance,
                    profit_variance_pct: Ratio::of(profit_variance, budgeted_profit),
                }
            })
            .collect()
    }

    // ── Portfolio risk ─────────────────────────────────────────

    /// EAD-weighted portfolio aggregates. Empty input yields the empty
    /// summary, not an error. Invalid loans are rejected and counted.
    pub fn portfolio_risk(&self, loans: &[Loan]) -> PortfolioRiskSummary {
        let mut total_ead = 0.0;
        let mut pd_weighted = 0.0;
        let mut lgd_weighted = 0.0;
        let mut total_ecl = 0.0;
        let mut delinquent = 0i64;
        let mut defaulted = 0i64;
        let mut accepted = 0i64;
        let mut rejected = 0i64;

        for loan in loans {
            match self.loan_ecl(loan) {
                Ok(ecl) => {
                    accepted += 1;
                    total_ead += loan.ead;
                    pd_weighted += loan.pd * loan.ead;
                    lgd_weighted += loan.lgd * loan.ead;
                    total_ecl += ecl;
                    // Delinquency counts DPD_30 and DPD_90 together.
                    if loan.days_past_due >= 30 {
                        delinquent += 1;
                    }
                    if loan.loan_status == crate::model::LoanStatus::Default {
                        defaulted += 1;
                    }
                }
                Err(e) => {
                    rejected += 1;
                    log::warn!("{e}");
                }
            }
        }

        if accepted == 0 {
            let mut summary = PortfolioRiskSummary::empty();
            summary.rejected_loans = rejected;
            return summary;
        }

        PortfolioRiskSummary {
            total_loans: accepted,
            total_ead,
            weighted_avg_pd: Ratio::of(pd_weighted, total_ead),
            weighted_avg_lgd: Ratio::of(lgd_weighted, total_ead),
            total_ecl,
            ecl_to_ead: Ratio::of(total_ecl, total_ead),
            delinquency_rate: Ratio::of(delinquent as f64, accepted as f64),
            default_rate: Ratio::of(defaulted as f64, accepted as f64),
            rejected_loans: rejected,
        }
    }

    // ── Leakage ────────────────────────────────────────────────

    /// Severity bucket for a budget overrun fraction. Boundary values
    /// belong to the higher bucket: exactly 30% is High, not Moderate.
    pub fn classify_severity(&self, overrun_pct: f64) -> Option<Severity> {
        let b = &self.config.severity_buckets;
        if overrun_pct > b.critical {
            Some(Severity::Critical)
        } else if overrun_pct >= b.high {
            Some(Severity::High)
        } else if overrun_pct >= b.moderate {
            Some(Severity::Moderate)
        } else {
            None
        }
    }

    /// Cost entries whose recomputed overrun meets the leakage
    /// threshold. Zero-budget entries have no defined percentage and
    /// are never flagged here.
    pub fn leakage_flags(&self, costs: &[CostEntry]) -> Vec<LeakageFlag> {
        costs
            .iter()
            .filter_map(|entry| {
                let (variance_amount, variance_pct) = Self::cost_variance(entry);
                let pct = variance_pct.value()?;
                if pct < self.config.leakage_threshold {
                    return None;
                }
                let severity = self.classify_severity(pct)?;
                Some(LeakageFlag {
                    cost_id: entry.cost_id,
                    business_unit: entry.business_unit.clone(),
                    cost_category: entry.cost_category.clone(),
                    budget_amount: entry.budget_amount,
                    actual_amount: entry.actual_amount,
                    variance_amount,
                    variance_pct: pct,
                    severity,
                })
            })
            .collect()
    }

    // ── Breakdowns ─────────────────────────────────────────────

    fn risk_breakdown<F>(&self, loans: &[Loan], group_of: F) -> Vec<RiskBreakdownRow>
    where
        F: Fn(&Loan) -> Option<String>,
    {
        #[derive(Default)]
        struct Acc {
            count: i64,
            ead: f64,
            ecl: f64,
            pd_sum: f64,
            defaults: i64,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
        for loan in loans {
            if Self::validate_loan(loan).is_err() {
                continue;
            }
            let Some(key) = group_of(loan) else { continue };
            let acc = groups.entry(key).or_default();
            acc.count += 1;
            acc.ead += loan.ead;
            acc.ecl += loan.pd * loan.lgd * loan.ead;
            acc.pd_sum += loan.pd;
            if loan.loan_status == crate::model::LoanStatus::Default {
                acc.defaults += 1;
            }
        }

        groups
            .into_iter()
            .map(|(group, acc)| RiskBreakdownRow {
                group,
                loan_count: acc.count,
                total_ead: acc.ead,
                total_ecl: acc.ecl,
                avg_pd: Ratio::of(acc.pd_sum, acc.count as f64),
                default_rate: Ratio::of(acc.defaults as f64, acc.count as f64),
            })
            .collect()
    }

    pub fn risk_by_segment(
        &self,
        loans: &[Loan],
        segments: &HashMap<i64, CustomerSegment>,
    ) -> Vec<RiskBreakdownRow> {
        self.risk_breakdown(loans, |loan| {
            segments
                .get(&loan.customer_id)
                .map(|s| s.as_str().to_string())
        })
    }

    pub fn risk_by_loan_type(&self, loans: &[Loan]) -> Vec<RiskBreakdownRow> {
        self.risk_breakdown(loans, |loan| Some(loan.loan_type.as_str().to_string()))
    }

    /// Vintage analysis: loans grouped by origination year.
    pub fn risk_by_vintage(&self, loans: &[Loan]) -> Vec<RiskBreakdownRow> {
        self.risk_breakdown(loans, |loan| Some(loan.origination_date.year().to_string()))
    }

    fn variance_breakdown<F>(&self, costs: &[CostEntry], group_of: F) -> Vec<VarianceBreakdownRow>
    where
        F: Fn(&CostEntry) -> Option<String>,
    {
        #[derive(Default)]
        struct Acc {
            count: i64,
            budget: f64,
            actual: f64,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
        for cost in costs {
            let Some(key) = group_of(cost) else { continue };
            let acc = groups.entry(key).or_default();
            acc.count += 1;
            acc.budget += cost.budget_amount;
            acc.actual += cost.actual_amount;
        }

        groups
            .into_iter()
            .map(|(group, acc)| {
                let variance_amount = acc.actual - acc.budget;
                VarianceBreakdownRow {
                    group,
                    entry_count: acc.count,
                    budget_amount: acc.budget,
                    actual_amount: acc.actual,
                    variance_amount,
                    variance_pct: Ratio::of(variance_amount, acc.budget),
                }
            })
            .collect()
    }

    pub fn variance_by_business_unit(&self, costs: &[CostEntry]) -> Vec<VarianceBreakdownRow> {
        self.variance_breakdown(costs, |c| Some(c.business_unit.clone()))
    }

    pub fn variance_by_category(&self, costs: &[CostEntry]) -> Vec<VarianceBreakdownRow> {
        self.variance_breakdown(costs, |c| Some(c.cost_category.clone()))
    }

    pub fn variance_by_vendor(&self, costs: &[CostEntry]) -> Vec<VarianceBreakdownRow> {
        self.variance_breakdown(costs, |c| c.vendor.clone())
    }
}
