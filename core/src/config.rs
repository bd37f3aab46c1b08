//! Analytics and generator configuration.
//!
//! Threshold values are never ambient globals: every component takes an
//! explicit config object at construction, so behavior is fully
//! determined by inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    /// PD stress factor f: stressed_pd = min(pd * (1 + f), 1.0).
    pub factor: f64,
}

/// Budget-overrun severity bucket boundaries, as fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityBuckets {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Overrun fraction at which a cost entry is flagged as leakage.
    pub leakage_threshold: f64,
    /// |Z| above which a record is an anomaly.
    pub z_score_threshold: f64,
    pub severity_buckets: SeverityBuckets,
    pub scenarios: Vec<StressScenario>,
    /// Window (months) for rolling KPI anomaly detection.
    pub rolling_window: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            leakage_threshold: 0.20,
            z_score_threshold: 3.0,
            severity_buckets: SeverityBuckets {
                moderate: 0.20,
                high: 0.30,
                critical: 0.50,
            },
            scenarios: vec![
                StressScenario {
                    name: "Base".into(),
                    factor: 0.0,
                },
                StressScenario {
                    name: "Mild Stress".into(),
                    factor: 0.25,
                },
                StressScenario {
                    name: "Severe Stress".into(),
                    factor: 0.50,
                },
            ],
            rolling_window: 3,
        }
    }
}

impl AnalyticsConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// Sizing and seed for the synthetic dataset generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Anchor date all generated dates are relative to. Fixed rather
    /// than "today" so a seed always yields the same dataset.
    pub as_of: NaiveDate,
    pub num_customers: usize,
    pub num_accounts: usize,
    pub num_loans: usize,
    pub num_transactions: usize,
    pub num_costs: usize,
    pub macro_months: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            as_of: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            num_customers: 10_000,
            num_accounts: 15_000,
            num_loans: 5_000,
            num_transactions: 100_000,
            num_costs: 1_000,
            macro_months: 24,
        }
    }
}

impl GeneratorConfig {
    /// Small dataset for tests and quick demos.
    pub fn small(seed: u64) -> Self {
        Self {
            seed,
            num_customers: 200,
            num_accounts: 300,
            num_loans: 120,
            num_transactions: 3_000,
            num_costs: 96,
            macro_months: 24,
            ..Self::default()
        }
    }
}
