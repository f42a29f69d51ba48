//! nullsim runner: simulation orchestration, summaries, artifacts.
//!
//! This crate builds on `nullsim-core` to provide:
//! - TOML run configuration with inline or file-based weights
//! - A runner choosing the shared-stream or parallel driver
//! - Summary statistics and the uniform-weights reference expectation
//! - JSON/CSV artifact export

pub mod config;
pub mod export;
pub mod runner;
pub mod summary;

pub use config::{ConfigError, SimConfig, SimulationSection, WeightSource};
pub use export::{export_json, export_samples_csv, import_json, save_artifacts};
pub use runner::{run_id, run_simulation, run_with_weights, RunError, SimulationResult};
pub use summary::{expected_excess_uniform, harmonic, percentile_sorted, DistributionSummary};
