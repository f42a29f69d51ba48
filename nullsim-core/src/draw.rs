//! Weighted sampling with replacement.
//!
//! The realizer only needs "give me `count` independent labels drawn with
//! these probabilities". `DrawSource` is that seam; `WeightedDraws` is the
//! default implementation on top of `rand`'s `WeightedIndex`.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::SimError;
use crate::weights::Weights;

/// A 1-based population label. `SENTINEL` (0) marks an unset buffer slot.
pub type Label = u32;

pub const SENTINEL: Label = 0;

/// Source of independent weighted draws over a fixed population.
pub trait DrawSource: Send + Sync {
    /// Population size `M`; labels are `1..=M`.
    fn population(&self) -> usize;

    /// Number of labels that can actually be drawn (positive probability).
    fn support_size(&self) -> usize;

    /// Append exactly `count` labels drawn independently with replacement.
    fn draw_into<R: Rng + ?Sized>(&self, rng: &mut R, count: usize, out: &mut Vec<Label>);
}

/// Categorical draws backed by `WeightedIndex<f64>`.
#[derive(Debug, Clone)]
pub struct WeightedDraws {
    index: WeightedIndex<f64>,
    population: usize,
    support: usize,
}

impl WeightedDraws {
    pub fn new(weights: &Weights) -> Result<Self, SimError> {
        let index = WeightedIndex::new(weights.as_slice())?;
        Ok(Self {
            index,
            population: weights.len(),
            support: weights.support_size(),
        })
    }
}

impl DrawSource for WeightedDraws {
    fn population(&self) -> usize {
        self.population
    }

    fn support_size(&self) -> usize {
        self.support
    }

    fn draw_into<R: Rng + ?Sized>(&self, rng: &mut R, count: usize, out: &mut Vec<Label>) {
        out.reserve(count);
        // `Weights` caps the population at `Label::MAX`, so `index + 1` fits.
        for _ in 0..count {
            out.push(self.index.sample(rng) as Label + 1);
        }
    }
}

/// Draw `count` labels with replacement according to `weights`.
pub fn sample_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    weights: &Weights,
) -> Result<Vec<Label>, SimError> {
    let source = WeightedDraws::new(weights)?;
    let mut out = Vec::with_capacity(count);
    source.draw_into(rng, count, &mut out);
    Ok(out)
}
