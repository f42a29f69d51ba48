//! Null distribution sampler: repeated independent realizations.
//!
//! Three drivers share one contract (exactly `trials` results, in trial
//! order, fail fast on the first error):
//! - `sample`: one caller-owned RNG stream consumed trial after trial.
//! - `sample_seeded`: a fresh RNG per trial from an [`RngHierarchy`].
//! - `sample_parallel`: same per-trial RNGs as `sample_seeded`, spread over
//!   the rayon pool. Output equals `sample_seeded` for any thread count.

use rand::Rng;
use rayon::prelude::*;

use crate::draw::{DrawSource, WeightedDraws};
use crate::error::{InvalidArgument, SimError};
use crate::progress::TrialProgress;
use crate::realize::Realizer;
use crate::rng::RngHierarchy;
use crate::weights::Weights;

#[derive(Debug, Clone)]
pub struct NullSampler<S = WeightedDraws> {
    realizer: Realizer<S>,
    trials: usize,
}

impl<S: DrawSource> NullSampler<S> {
    pub fn new(realizer: Realizer<S>, trials: usize) -> Result<Self, SimError> {
        if trials == 0 {
            return Err(InvalidArgument::ZeroTrials.into());
        }
        Ok(Self { realizer, trials })
    }

    pub fn realizer(&self) -> &Realizer<S> {
        &self.realizer
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Run every trial on one shared RNG stream.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        progress: &dyn TrialProgress,
    ) -> Result<Vec<u64>, SimError> {
        let total = self.trials as u64;
        let mut results = Vec::with_capacity(self.trials);
        for i in 0..total {
            results.push(self.realizer.realize(rng)?);
            progress.on_trial(i, total);
        }
        progress.on_finish(total);
        Ok(results)
    }

    /// Run every trial on its own RNG derived from `seeds`, in order.
    pub fn sample_seeded(
        &self,
        seeds: &RngHierarchy,
        progress: &dyn TrialProgress,
    ) -> Result<Vec<u64>, SimError> {
        let total = self.trials as u64;
        let mut results = Vec::with_capacity(self.trials);
        for i in 0..total {
            let mut rng = seeds.rng_for(i);
            results.push(self.realizer.realize(&mut rng)?);
            progress.on_trial(i, total);
        }
        progress.on_finish(total);
        Ok(results)
    }

    /// Run trials in parallel, one derived RNG per trial.
    pub fn sample_parallel(
        &self,
        seeds: &RngHierarchy,
        progress: &dyn TrialProgress,
    ) -> Result<Vec<u64>, SimError> {
        let total = self.trials as u64;
        let results = (0..total)
            .into_par_iter()
            .map(|i| {
                let mut rng = seeds.rng_for(i);
                let excess = self.realizer.realize(&mut rng)?;
                progress.on_trial(i, total);
                Ok(excess)
            })
            .collect::<Result<Vec<u64>, SimError>>()?;
        progress.on_finish(total);
        Ok(results)
    }
}

/// `trials` realizations for `(m, P)` on one RNG stream.
pub fn sample_null_distribution<R: Rng + ?Sized>(
    target: usize,
    trials: usize,
    weights: &Weights,
    rng: &mut R,
    progress: &dyn TrialProgress,
) -> Result<Vec<u64>, SimError> {
    NullSampler::new(Realizer::new(target, weights)?, trials)?.sample(rng, progress)
}
