//! Error types for the realizer and the null distribution sampler.
//!
//! Invalid arguments are detected before any drawing happens. The only runtime
//! failure of the refill loop itself is `ExhaustedRetries`.

use std::path::PathBuf;

use rand::distributions::WeightedError;
use thiserror::Error;

/// A caller-supplied argument that makes the simulation ill-posed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("weight vector is empty")]
    EmptyWeights,
    #[error("weight at index {index} is negative ({value})")]
    NegativeWeight { index: usize, value: f64 },
    #[error("weight at index {index} is not finite")]
    NonFiniteWeight { index: usize },
    #[error("all weights are zero")]
    AllZeroWeights,
    #[error("sum of weights is not finite")]
    NonFiniteTotal,
    #[error("population of {population} items exceeds the maximum of {max}")]
    PopulationTooLarge { population: usize, max: usize },
    #[error("target must be at least 1")]
    ZeroTarget,
    #[error("target {target} exceeds population size {population}")]
    TargetExceedsPopulation { target: usize, population: usize },
    #[error("target {target} exceeds the {support} items with positive weight")]
    TargetExceedsSupport { target: usize, support: usize },
    #[error("number of trials must be at least 1")]
    ZeroTrials,
    #[error("line {line}: cannot parse weight '{value}'")]
    ParseWeight { line: usize, value: String },
}

/// Errors from realizing a statistic or sampling a null distribution.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    #[error("gave up after {rounds} refill rounds with {unique}/{target} unique items")]
    ExhaustedRetries {
        rounds: usize,
        unique: usize,
        target: usize,
    },
    #[error("weighted sampler rejected weights: {0}")]
    Sampler(#[from] WeightedError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SimError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SimError::InvalidArgument(_))
    }
}
