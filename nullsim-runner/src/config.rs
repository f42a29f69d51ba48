//! Serializable simulation configuration (TOML).
//!
//! ```toml
//! [simulation]
//! target = 5
//! trials = 1000
//! seed = 42
//!
//! [weights]
//! values = [0.2, 0.2, 0.2, 0.2, 0.2]
//! # or: file = "rates.txt"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nullsim_core::{InvalidArgument, SimError, Weights, DEFAULT_MAX_ROUNDS};

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("weights: {0}")]
    Weights(#[from] SimError),
}

impl From<InvalidArgument> for ConfigError {
    fn from(err: InvalidArgument) -> Self {
        ConfigError::Weights(err.into())
    }
}

/// Full configuration of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub simulation: SimulationSection,
    pub weights: WeightSource,
    /// Directory relative weight files resolve against. Set by `from_file`.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSection {
    /// Distinct items to collect (`m`).
    pub target: usize,
    /// Independent realizations (`n`).
    pub trials: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_true")]
    pub progress: bool,
}

/// Where the weight vector comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Inline weight values.
    Values(Vec<f64>),
    /// Text file with one weight per line.
    File(PathBuf),
}

fn default_seed() -> u64 {
    42
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

fn default_true() -> bool {
    true
}

impl SimConfig {
    pub fn new(target: usize, trials: usize, weights: WeightSource) -> Self {
        Self {
            simulation: SimulationSection {
                target,
                trials,
                seed: default_seed(),
                max_rounds: default_max_rounds(),
                parallel: true,
                progress: true,
            },
            weights,
            base_dir: None,
        }
    }

    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.target == 0 {
            return Err(ConfigError::Invalid("simulation.target must be >= 1".into()));
        }
        if sim.trials == 0 {
            return Err(ConfigError::Invalid("simulation.trials must be >= 1".into()));
        }
        if sim.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "simulation.max_rounds must be >= 1".into(),
            ));
        }
        if let WeightSource::Values(values) = &self.weights {
            if values.is_empty() {
                return Err(ConfigError::Invalid("weights.values is empty".into()));
            }
        }
        Ok(())
    }

    /// Path of the weights file after resolving against `base_dir`.
    pub fn weights_path(&self) -> Option<PathBuf> {
        match &self.weights {
            WeightSource::Values(_) => None,
            WeightSource::File(path) => Some(self.resolve_path(path)),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Load and validate the weight vector.
    pub fn resolve_weights(&self) -> Result<Weights, ConfigError> {
        match &self.weights {
            WeightSource::Values(values) => Ok(Weights::new(values.clone())?),
            WeightSource::File(path) => Ok(Weights::from_file(&self.resolve_path(path))?),
        }
    }
}
