//! Simulation runner: config in, summarized null distribution out.
//!
//! Driver choice follows `simulation.parallel`:
//! - `true`: one RNG per trial derived from the seed, trials spread over rayon.
//! - `false`: a single `StdRng` stream seeded once and consumed trial by trial.
//!
//! Both are reproducible under a fixed seed, but they consume randomness
//! differently, so the two modes produce different (equally valid) samples.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nullsim_core::{
    InvalidArgument, NullSampler, Realizer, RngHierarchy, SimError, TrialProgress, Weights,
};

use crate::config::{ConfigError, SimConfig};
use crate::summary::{expected_excess_uniform, DistributionSummary};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),
    #[error("failed to fingerprint run: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Complete record of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub schema_version: u32,
    /// BLAKE3 hex of the resolved run parameters.
    pub run_id: String,
    pub target: usize,
    pub trials: usize,
    pub population: usize,
    /// Items with strictly positive weight.
    pub support: usize,
    pub seed: u64,
    pub parallel: bool,
    pub max_rounds: usize,
    /// Excess draws per trial, in trial order.
    pub samples: Vec<u64>,
    pub summary: DistributionSummary,
    /// Closed-form mean when every weight is equal.
    pub uniform_expectation: Option<f64>,
    pub duration_secs: f64,
}

/// Canonical, hashable view of everything that determines the samples.
#[derive(Serialize)]
struct RunKey<'a> {
    schema_version: u32,
    target: usize,
    trials: usize,
    seed: u64,
    parallel: bool,
    max_rounds: usize,
    weights: &'a [f64],
}

/// Deterministic identifier for a run: same parameters, same id.
pub fn run_id(config: &SimConfig, weights: &Weights) -> Result<String, serde_json::Error> {
    let sim = &config.simulation;
    let key = RunKey {
        schema_version: SCHEMA_VERSION,
        target: sim.target,
        trials: sim.trials,
        seed: sim.seed,
        parallel: sim.parallel,
        max_rounds: sim.max_rounds,
        weights: weights.as_slice(),
    };
    let json = serde_json::to_vec(&key)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}

/// Resolve weights, run the sampler and summarize.
pub fn run_simulation(
    config: &SimConfig,
    progress: &dyn TrialProgress,
) -> Result<SimulationResult, RunError> {
    config.validate()?;
    let weights = config.resolve_weights()?;
    run_with_weights(config, &weights, progress)
}

/// Like [`run_simulation`] with an already-resolved weight vector.
pub fn run_with_weights(
    config: &SimConfig,
    weights: &Weights,
    progress: &dyn TrialProgress,
) -> Result<SimulationResult, RunError> {
    let sim = &config.simulation;
    let realizer = Realizer::new(sim.target, weights)?.with_max_rounds(sim.max_rounds);
    let sampler = NullSampler::new(realizer, sim.trials)?;

    let start = Instant::now();
    let samples = if sim.parallel {
        sampler.sample_parallel(&RngHierarchy::new(sim.seed), progress)?
    } else {
        let mut rng = StdRng::seed_from_u64(sim.seed);
        sampler.sample(&mut rng, progress)?
    };
    let duration_secs = start.elapsed().as_secs_f64();

    // `NullSampler::new` rejects zero trials, so only that case yields no samples.
    let summary = DistributionSummary::from_samples(&samples)
        .ok_or(SimError::InvalidArgument(InvalidArgument::ZeroTrials))?;
    let uniform_expectation = if weights.is_uniform() {
        expected_excess_uniform(weights.len(), sim.target)
    } else {
        None
    };

    Ok(SimulationResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(config, weights)?,
        target: sim.target,
        trials: sim.trials,
        population: weights.len(),
        support: weights.support_size(),
        seed: sim.seed,
        parallel: sim.parallel,
        max_rounds: sim.max_rounds,
        samples,
        summary,
        uniform_expectation,
        duration_secs,
    })
}
