//! finrisk-core: batch risk & cost analytics over synthetic banking data.
//!
//! The pipeline is a single-pass, read-only batch computation:
//! dataset store → metric calculator → {anomaly detector, scenario
//! simulator} → report emitter. Derived output is recomputed fully on
//! each run and published all-or-nothing.

pub mod anomaly;
pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod model;
pub mod names;
pub mod pipeline;
pub mod ratio;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod store;
pub mod types;
