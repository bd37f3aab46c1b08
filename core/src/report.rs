//! CSV report export. One file per output table, written under a
//! single output directory. Undefined ratios serialize as empty fields.

use crate::{error::AnalyticsResult, pipeline::RunOutputs};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Write every report file, returning the paths written.
    pub fn write_all(&self, outputs: &RunOutputs) -> AnalyticsResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.out_dir)?;

        let mut written = vec![
            self.write_rows("monthly_kpis.csv", &outputs.monthly_kpis)?,
            self.write_portfolio_summary(outputs)?,
            self.write_rows("cost_leakage_flags.csv", &outputs.leakage_flags)?,
            self.write_rows("scenario_results.csv", &outputs.scenario_results)?,
            self.write_rows("segment_sensitivity.csv", &outputs.segment_sensitivity)?,
            self.write_rows("anomalies.csv", &outputs.anomalies)?,
            self.write_rows("anomalies_summary.csv", &outputs.anomaly_summary)?,
        ];
        written.push(self.write_rows("risk_by_segment.csv", &outputs.risk_by_segment)?);
        written.push(self.write_rows("risk_by_loan_type.csv", &outputs.risk_by_loan_type)?);
        written.push(self.write_rows("risk_by_vintage.csv", &outputs.risk_by_vintage)?);
        written.push(self.write_rows("variance_by_business_unit.csv", &outputs.variance_by_unit)?);
        written.push(self.write_rows("variance_by_category.csv", &outputs.variance_by_category)?);
        written.push(self.write_rows("variance_by_vendor.csv", &outputs.variance_by_vendor)?);

        log::info!("wrote {} report files to {}", written.len(), self.out_dir.display());
        Ok(written)
    }

    fn write_rows<T: Serialize>(&self, name: &str, rows: &[T]) -> AnalyticsResult<PathBuf> {
        let path = self.out_dir.join(name);
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// The portfolio summary is a single record; it exports as
    /// metric/value rows to match its database table.
    fn write_portfolio_summary(&self, outputs: &RunOutputs) -> AnalyticsResult<PathBuf> {
        let path = self.out_dir.join("portfolio_risk_summary.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["metric", "value"])?;

        let p = &outputs.portfolio;
        let rows: [(&str, Option<f64>); 9] = [
            ("total_loans", Some(p.total_loans as f64)),
            ("total_ead", Some(p.total_ead)),
            ("weighted_avg_pd", p.weighted_avg_pd.value()),
            ("weighted_avg_lgd", p.weighted_avg_lgd.value()),
            ("total_ecl", Some(p.total_ecl)),
            ("ecl_to_ead", p.ecl_to_ead.value()),
            ("delinquency_rate", p.delinquency_rate.value()),
            ("default_rate", p.default_rate.value()),
            ("rejected_loans", Some(p.rejected_loans as f64)),
        ];
        for (metric, value) in rows {
            let rendered = value.map(|v| v.to_string()).unwrap_or_default();
            writer.write_record([metric, rendered.as_str()])?;
        }
        writer.flush()?;
        Ok(path)
    }
}
