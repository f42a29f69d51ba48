//! Validated categorical weight vectors.
//!
//! A `Weights` value describes a population of `M` items labelled `1..=M`
//! and the (possibly unnormalized) probability of drawing each one. All
//! entries are finite and non-negative and at least one is positive. The
//! number of strictly positive entries is the *support size*: the most
//! distinct items any number of draws can ever produce.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::Label;
use crate::error::{InvalidArgument, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Weights {
    values: Vec<f64>,
    total: f64,
    support: usize,
}

impl Weights {
    /// Validate a raw weight vector.
    pub fn new(values: Vec<f64>) -> Result<Self, InvalidArgument> {
        if values.is_empty() {
            return Err(InvalidArgument::EmptyWeights);
        }
        check_population(values.len())?;

        let mut total = 0.0;
        let mut support = 0;
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(InvalidArgument::NonFiniteWeight { index });
            }
            if value < 0.0 {
                return Err(InvalidArgument::NegativeWeight { index, value });
            }
            if value > 0.0 {
                support += 1;
            }
            total += value;
        }

        if support == 0 {
            return Err(InvalidArgument::AllZeroWeights);
        }
        if !total.is_finite() {
            return Err(InvalidArgument::NonFiniteTotal);
        }

        Ok(Self {
            values,
            total,
            support,
        })
    }

    /// Equal weight on every item of a population of `population` items.
    pub fn uniform(population: usize) -> Result<Self, InvalidArgument> {
        Self::new(vec![1.0; population])
    }

    /// Parse one weight per line. Blank lines and lines starting with `#` are skipped.
    pub fn from_lines(content: &str) -> Result<Self, InvalidArgument> {
        let mut values = Vec::new();
        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let value = line
                .parse::<f64>()
                .map_err(|_| InvalidArgument::ParseWeight {
                    line: i + 1,
                    value: line.to_string(),
                })?;
            values.push(value);
        }
        Self::new(values)
    }

    /// Load a weights file (see [`Weights::from_lines`]).
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(&content)?)
    }

    /// Population size `M`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of items with strictly positive weight.
    pub fn support_size(&self) -> usize {
        self.support
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Normalized draw probability of a 1-based label. The sentinel and
    /// out-of-range labels have probability zero.
    pub fn probability(&self, label: Label) -> f64 {
        match (label as usize).checked_sub(1).and_then(|i| self.values.get(i)) {
            Some(&w) => w / self.total,
            None => 0.0,
        }
    }

    /// True when every item carries the same positive weight.
    pub fn is_uniform(&self) -> bool {
        let first = self.values[0];
        first > 0.0 && self.values.iter().all(|&w| w == first)
    }
}

/// Labels are `1..=M` in a `Label`, so `M` can be at most `Label::MAX`.
fn check_population(population: usize) -> Result<(), InvalidArgument> {
    if population as u64 > Label::MAX as u64 {
        return Err(InvalidArgument::PopulationTooLarge {
            population,
            max: Label::MAX as usize,
        });
    }
    Ok(())
}

impl TryFrom<Vec<f64>> for Weights {
    type Error = InvalidArgument;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Weights> for Vec<f64> {
    fn from(weights: Weights) -> Self {
        weights.values
    }
}
