//! CSV ingest. One file per input table, headers matching the struct
//! field names, loaded wholesale into the database.

use super::AnalyticsStore;
use crate::{
    error::AnalyticsResult,
    model::{Account, CostEntry, Customer, Loan, MacroObservation, TransactionRecord},
};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Row counts per table after a directory ingest.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    pub customers: usize,
    pub accounts: usize,
    pub loans: usize,
    pub transactions: usize,
    pub costs: usize,
    pub macro_observations: usize,
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> AnalyticsResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

impl AnalyticsStore {
    // ── CSV ingest ────────────────────────────────────────────

    /// Load all six input files from `dir` (customers.csv, accounts.csv,
    /// loans.csv, transactions.csv, costs.csv, macro.csv). All files are
    /// parsed before any row is inserted, so a bad file aborts the
    /// ingest with the database untouched.
    pub fn ingest_csv_dir(&self, dir: &Path) -> AnalyticsResult<IngestSummary> {
        let customers: Vec<Customer> = read_csv(&dir.join("customers.csv"))?;
        let accounts: Vec<Account> = read_csv(&dir.join("accounts.csv"))?;
        let loans: Vec<Loan> = read_csv(&dir.join("loans.csv"))?;
        let transactions: Vec<TransactionRecord> = read_csv(&dir.join("transactions.csv"))?;
        let costs: Vec<CostEntry> = read_csv(&dir.join("costs.csv"))?;
        let macro_observations: Vec<MacroObservation> = read_csv(&dir.join("macro.csv"))?;

        self.insert_customers(&customers)?;
        self.insert_accounts(&accounts)?;
        self.insert_loans(&loans)?;
        self.insert_transactions(&transactions)?;
        self.insert_costs(&costs)?;
        self.insert_macro_observations(&macro_observations)?;

        let summary = IngestSummary {
            customers: customers.len(),
            accounts: accounts.len(),
            loans: loans.len(),
            transactions: transactions.len(),
            costs: costs.len(),
            macro_observations: macro_observations.len(),
        };
        log::info!(
            "ingested {} customers, {} accounts, {} loans, {} transactions, {} costs, {} macro rows",
            summary.customers,
            summary.accounts,
            summary.loans,
            summary.transactions,
            summary.costs,
            summary.macro_observations,
        );
        Ok(summary)
    }
}
