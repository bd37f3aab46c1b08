//! analytics-runner: batch runner for the risk & cost analytics pipeline.
//!
//! Usage:
//!   analytics-runner generate --seed 42 --db data.db [--small]
//!   analytics-runner ingest --dir ./input --db data.db
//!   analytics-runner run --db data.db [--config config.json] [--out ./reports]

use anyhow::{bail, Result};
use finrisk_core::{
    config::{AnalyticsConfig, GeneratorConfig},
    generator::DatasetGenerator,
    pipeline::AnalyticsPipeline,
    report::ReportWriter,
    store::AnalyticsStore,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        bail!("usage: analytics-runner <generate|ingest|run> [options]");
    };

    match command {
        "generate" => cmd_generate(&args),
        "ingest" => cmd_ingest(&args),
        "run" => cmd_run(&args),
        other => bail!("unknown command '{other}' (expected generate, ingest, or run)"),
    }
}

fn cmd_generate(args: &[String]) -> Result<()> {
    warn_unknown_flags(args, &["--seed", "--db", "--small"]);
    let seed = parse_arg(args, "--seed", 42u64);
    let db = str_arg(args, "--db", "data.db");
    let small = args.iter().any(|a| a == "--small");

    let config = if small {
        GeneratorConfig::small(seed)
    } else {
        GeneratorConfig {
            seed,
            ..GeneratorConfig::default()
        }
    };

    println!("finrisk — dataset generator");
    println!("  seed: {seed}");
    println!("  db:   {db}");
    println!();

    let store = AnalyticsStore::open(db)?;
    store.migrate()?;

    let dataset = DatasetGenerator::new(config).generate();
    dataset.persist(&store)?;

    println!("generated:");
    println!("  customers:    {}", dataset.customers.len());
    println!("  accounts:     {}", dataset.accounts.len());
    println!("  loans:        {}", dataset.loans.len());
    println!("  transactions: {}", dataset.transactions.len());
    println!("  costs:        {}", dataset.costs.len());
    println!("  macro rows:   {}", dataset.macro_observations.len());
    Ok(())
}

fn cmd_ingest(args: &[String]) -> Result<()> {
    warn_unknown_flags(args, &["--dir", "--db"]);
    let dir = str_arg(args, "--dir", "./input");
    let db = str_arg(args, "--db", "data.db");

    println!("finrisk — CSV ingest");
    println!("  dir: {dir}");
    println!("  db:  {db}");
    println!();

    let store = AnalyticsStore::open(db)?;
    store.migrate()?;
    let summary = store.ingest_csv_dir(Path::new(dir))?;

    println!("ingested:");
    println!("  customers:    {}", summary.customers);
    println!("  accounts:     {}", summary.accounts);
    println!("  loans:        {}", summary.loans);
    println!("  transactions: {}", summary.transactions);
    println!("  costs:        {}", summary.costs);
    println!("  macro rows:   {}", summary.macro_observations);
    Ok(())
}

fn cmd_run(args: &[String]) -> Result<()> {
    warn_unknown_flags(args, &["--db", "--out", "--config"]);
    let db = str_arg(args, "--db", "data.db");
    let out_dir = str_arg(args, "--out", "./reports");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => AnalyticsConfig::load(&w[1])?,
        None => AnalyticsConfig::default(),
    };

    println!("finrisk — analytics run");
    println!("  db:  {db}");
    println!("  out: {out_dir}");
    println!();

    let store = AnalyticsStore::open(db)?;
    store.migrate()?;

    let pipeline = AnalyticsPipeline::new(config);
    let (run_id, outputs) = pipeline.run_and_publish(&store, None)?;

    ReportWriter::new(Path::new(out_dir)).write_all(&outputs)?;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:        {run_id}");
    println!("  KPI months:    {}", outputs.monthly_kpis.len());
    println!("  loans:         {}", outputs.portfolio.total_loans);
    println!("  total EAD:     {:.2}", outputs.portfolio.total_ead);
    println!("  total ECL:     {:.2}", outputs.portfolio.total_ecl);
    println!("  weighted PD:   {}", outputs.portfolio.weighted_avg_pd);
    println!("  leakage flags: {}", outputs.leakage_flags.len());
    println!("  anomalies:     {}", outputs.anomalies.len());

    println!();
    println!("=== SCENARIOS ===");
    for s in &outputs.scenario_results {
        println!(
            "  {} (f={:.2}) | ECL: {:.0} -> {:.0} | profit: {:.0} -> {:.0}",
            s.scenario, s.stress_factor, s.base_ecl, s.stressed_ecl, s.base_profit,
            s.stressed_profit
        );
    }
    Ok(())
}

fn warn_unknown_flags(args: &[String], known: &[&str]) {
    for arg in args.iter().skip(2).filter(|a| a.starts_with("--")) {
        if !known.contains(&arg.as_str()) {
            log::warn!("Unknown flag: {arg}");
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}
