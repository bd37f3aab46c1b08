//! Domain records for the analytics pipeline.
//!
//! Input entities are immutable once loaded. Derived entities are owned
//! by the computation that produces them and recomputed fully per run.

use crate::ratio::Ratio;
use crate::types::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Enumerations ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerSegment {
    Retail,
    SME,
    Corporate,
}

impl CustomerSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "Retail",
            Self::SME => "SME",
            Self::Corporate => "Corporate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Retail" => Some(Self::Retail),
            "SME" => Some(Self::SME),
            "Corporate" => Some(Self::Corporate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::Investment => "Investment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Checking" => Some(Self::Checking),
            "Savings" => Some(Self::Savings),
            "Investment" => Some(Self::Investment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Dormant,
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Dormant => "Dormant",
            Self::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Dormant" => Some(Self::Dormant),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Personal,
    Mortgage,
    Auto,
    Business,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Mortgage => "Mortgage",
            Self::Auto => "Auto",
            Self::Business => "Business",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Personal" => Some(Self::Personal),
            "Mortgage" => Some(Self::Mortgage),
            "Auto" => Some(Self::Auto),
            "Business" => Some(Self::Business),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Current,
    #[serde(rename = "DPD_30")]
    Dpd30,
    #[serde(rename = "DPD_90")]
    Dpd90,
    Default,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Dpd30 => "DPD_30",
            Self::Dpd90 => "DPD_90",
            Self::Default => "Default",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Current" => Some(Self::Current),
            "DPD_30" => Some(Self::Dpd30),
            "DPD_90" => Some(Self::Dpd90),
            "Default" => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Debit,
    Credit,
    Fee,
    Interest,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
            Self::Fee => "Fee",
            Self::Interest => "Interest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Debit" => Some(Self::Debit),
            "Credit" => Some(Self::Credit),
            "Fee" => Some(Self::Fee),
            "Interest" => Some(Self::Interest),
            _ => None,
        }
    }
}

/// Leakage severity, classified from the budget overrun percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Moderate" => Some(Self::Moderate),
            "High" => Some(Self::High),
            "Critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnomalyCategory {
    Cost,
    Loan,
    #[serde(rename = "KPI")]
    Kpi,
}

impl AnomalyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::Loan => "Loan",
            Self::Kpi => "KPI",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Cost" => Some(Self::Cost),
            "Loan" => Some(Self::Loan),
            "KPI" => Some(Self::Kpi),
            _ => None,
        }
    }
}

// ── Input entities ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
    pub date_of_birth: NaiveDate,
    pub customer_segment: CustomerSegment,
    pub credit_score: i64,
    pub registration_date: NaiveDate,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_type: AccountType,
    pub account_status: AccountStatus,
    pub opening_date: NaiveDate,
    pub current_balance: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: i64,
    pub customer_id: i64,
    pub loan_type: LoanType,
    pub origination_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub original_amount: f64,
    pub outstanding_balance: f64,
    pub interest_rate: f64,
    pub loan_status: LoanStatus,
    pub days_past_due: i64,
    pub pd: f64,
    pub lgd: f64,
    pub ead: f64,
    pub ecl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: i64,
    pub account_id: i64,
    pub customer_id: i64,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
    pub cost_id: i64,
    pub cost_date: NaiveDate,
    pub business_unit: String,
    pub cost_category: String,
    pub vendor: Option<String>,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance_amount: f64,
    pub variance_pct: Ratio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroObservation {
    pub date: NaiveDate,
    pub gdp_growth_rate: f64,
    pub unemployment_rate: f64,
    pub interest_rate: f64,
    pub inflation_rate: f64,
    pub consumer_confidence_index: f64,
}

// ── Derived entities ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyKpi {
    pub month: Month,
    pub total_revenue: f64,
    pub fee_revenue: f64,
    pub loan_interest: f64,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance_amount: f64,
    pub variance_pct: Ratio,
    pub profit: f64,
    pub profit_margin: Ratio,
    pub budgeted_profit: f64,
    pub profit_variance: f64,
    pub profit_variance_pct: Ratio,
}

/// Portfolio-level risk figures. Zeroed totals with undefined ratios
/// mean "no data", which is distinct from a portfolio that genuinely
/// sums to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRiskSummary {
    pub total_loans: i64,
    pub total_ead: f64,
    pub weighted_avg_pd: Ratio,
    pub weighted_avg_lgd: Ratio,
    pub total_ecl: f64,
    pub ecl_to_ead: Ratio,
    pub delinquency_rate: Ratio,
    pub default_rate: Ratio,
    pub rejected_loans: i64,
}

impl PortfolioRiskSummary {
    pub fn empty() -> Self {
        Self {
            total_loans: 0,
            total_ead: 0.0,
            weighted_avg_pd: Ratio::Undefined,
            weighted_avg_lgd: Ratio::Undefined,
            total_ecl: 0.0,
            ecl_to_ead: Ratio::Undefined,
            delinquency_rate: Ratio::Undefined,
            default_rate: Ratio::Undefined,
            rejected_loans: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeakageFlag {
    pub cost_id: i64,
    pub business_unit: String,
    pub cost_category: String,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance_amount: f64,
    pub variance_pct: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub stress_factor: f64,
    pub base_ecl: f64,
    pub stressed_ecl: f64,
    pub ecl_change: f64,
    pub ecl_change_pct: Ratio,
    pub base_weighted_pd: Ratio,
    pub stressed_weighted_pd: Ratio,
    pub base_profit: f64,
    pub stressed_profit: f64,
    pub profit_change: f64,
    pub profit_change_pct: Ratio,
}

/// Stress impact on one customer segment under one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSensitivityRow {
    pub scenario: String,
    pub segment: String,
    pub loan_count: i64,
    pub base_ecl: f64,
    pub stressed_ecl: f64,
    pub ecl_change: f64,
    pub ecl_change_pct: Ratio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub category: AnomalyCategory,
    /// Cost id, loan id, or month key, depending on category.
    pub source_id: String,
    /// The numeric field the Z-score was computed over.
    pub metric: String,
    pub anomaly_type: String,
    /// Z-score magnitude. Continuous, not bucketed.
    pub severity: f64,
}

/// Count and severity rollup of anomalies sharing a category and type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalySummaryRow {
    pub category: AnomalyCategory,
    pub anomaly_type: String,
    pub count: i64,
    pub max_severity: f64,
    pub avg_severity: f64,
}

// ── Breakdown rows (report supplements) ────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdownRow {
    pub group: String,
    pub loan_count: i64,
    pub total_ead: f64,
    pub total_ecl: f64,
    pub avg_pd: Ratio,
    pub default_rate: Ratio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceBreakdownRow {
    pub group: String,
    pub entry_count: i64,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance_amount: f64,
    pub variance_pct: Ratio,
}
