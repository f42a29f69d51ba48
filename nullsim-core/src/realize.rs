//! Weighted unique-draw realizer.
//!
//! One realization draws `m` labels with replacement, then keeps topping up
//! the draw buffer with `m - unique` fresh draws until `m` distinct labels
//! have been seen. The statistic is the number of draws beyond the first `m`.
//!
//! A refill batch is exactly as large as the number of missing labels, so the
//! unique count can never overshoot `m` and the write cursor always advances
//! by the full batch. Random-number consumption per round is fixed by the
//! unique count alone.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::draw::{DrawSource, Label, WeightedDraws, SENTINEL};
use crate::error::{InvalidArgument, SimError};
use crate::weights::Weights;

/// Refill rounds allowed before a realization gives up.
pub const DEFAULT_MAX_ROUNDS: usize = 1_000_000;

/// Full trace of one realization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realization {
    /// Draws beyond the initial `m`.
    pub excess: u64,
    /// Refill rounds after the initial batch.
    pub rounds: usize,
    /// Every label drawn, in draw order.
    pub draws: Vec<Label>,
}

/// Produces realizations of the excess-draws statistic for a fixed `(m, P)`.
///
/// Construction validates the target against the population and against the
/// number of positive-weight items, so `realize` cannot spin on an
/// unreachable target.
#[derive(Debug, Clone)]
pub struct Realizer<S = WeightedDraws> {
    source: S,
    target: usize,
    max_rounds: usize,
}

impl Realizer<WeightedDraws> {
    pub fn new(target: usize, weights: &Weights) -> Result<Self, SimError> {
        Self::with_source(target, WeightedDraws::new(weights)?)
    }
}

impl<S: DrawSource> Realizer<S> {
    pub fn with_source(target: usize, source: S) -> Result<Self, SimError> {
        if target == 0 {
            return Err(InvalidArgument::ZeroTarget.into());
        }
        let population = source.population();
        if target > population {
            return Err(InvalidArgument::TargetExceedsPopulation { target, population }.into());
        }
        let support = source.support_size();
        if target > support {
            return Err(InvalidArgument::TargetExceedsSupport { target, support }.into());
        }
        Ok(Self {
            source,
            target,
            max_rounds: DEFAULT_MAX_ROUNDS,
        })
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn population(&self) -> usize {
        self.source.population()
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Draw one realization and return its excess draws.
    pub fn realize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u64, SimError> {
        self.realize_traced(rng).map(|r| r.excess)
    }

    /// Draw one realization, keeping the draw buffer and round count.
    pub fn realize_traced<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Realization, SimError> {
        let m = self.target;
        let mut draws: Vec<Label> = Vec::with_capacity(2 * m);
        // Sized by the target, not the population: M can be genome-scale.
        let mut seen: HashSet<Label> = HashSet::with_capacity(m);

        self.source.draw_into(rng, m, &mut draws);
        let mut unique = mark_new(&draws, &mut seen);
        let mut cursor = m;
        let mut rounds = 0;

        while unique < m {
            if rounds == self.max_rounds {
                return Err(SimError::ExhaustedRetries {
                    rounds,
                    unique,
                    target: m,
                });
            }
            let batch = m - unique;
            self.source.draw_into(rng, batch, &mut draws);
            unique += mark_new(&draws[cursor..], &mut seen);
            cursor += batch;
            rounds += 1;
        }

        Ok(Realization {
            excess: (cursor - m) as u64,
            rounds,
            draws,
        })
    }
}

/// Mark labels as seen, returning how many were not seen before.
fn mark_new(labels: &[Label], seen: &mut HashSet<Label>) -> usize {
    labels
        .iter()
        .filter(|&&label| label != SENTINEL && seen.insert(label))
        .count()
}

/// One realization for `(m, P)`.
pub fn realize<R: Rng + ?Sized>(
    target: usize,
    weights: &Weights,
    rng: &mut R,
) -> Result<u64, SimError> {
    Realizer::new(target, weights)?.realize(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Claims a support of two labels but only ever yields label 1.
    struct StuckSource;

    impl DrawSource for StuckSource {
        fn population(&self) -> usize {
            2
        }

        fn support_size(&self) -> usize {
            2
        }

        fn draw_into<R: Rng + ?Sized>(&self, _rng: &mut R, count: usize, out: &mut Vec<Label>) {
            out.extend(std::iter::repeat(1).take(count));
        }
    }

    /// Replays a fixed label sequence.
    struct Scripted(Vec<Label>, std::sync::Mutex<usize>);

    impl DrawSource for Scripted {
        fn population(&self) -> usize {
            4
        }

        fn support_size(&self) -> usize {
            4
        }

        fn draw_into<R: Rng + ?Sized>(&self, _rng: &mut R, count: usize, out: &mut Vec<Label>) {
            let mut pos = self.1.lock().unwrap();
            out.extend_from_slice(&self.0[*pos..*pos + count]);
            *pos += count;
        }
    }

    #[test]
    fn target_of_one_needs_no_extra_draws() {
        let weights = Weights::new(vec![0.9, 0.05, 0.05]).unwrap();
        let realizer = Realizer::new(1, &weights).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(realizer.realize(&mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn refill_batches_follow_missing_count() {
        // m = 3. Initial [1,1,2] -> 2 unique, refill 1: [2] -> still 2,
        // refill 1: [4] -> 3 unique. Excess = 2.
        let source = Scripted(vec![1, 1, 2, 2, 4], Default::default());
        let realizer = Realizer::with_source(3, source).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let trace = realizer.realize_traced(&mut rng).unwrap();
        assert_eq!(trace.excess, 2);
        assert_eq!(trace.rounds, 2);
        assert_eq!(trace.draws, vec![1, 1, 2, 2, 4]);
    }

    #[test]
    fn refill_batch_shrinks_with_unique_count() {
        // m = 4. Initial [1,1,1,2] -> 2 unique, refill 2: [3,4] -> done.
        // Same start with refill [3,3] -> 3 unique, refill 1: [4].
        let source = Scripted(vec![1, 1, 1, 2, 3, 4], Default::default());
        let realizer = Realizer::with_source(4, source).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(realizer.realize(&mut rng).unwrap(), 2);

        let source = Scripted(vec![1, 1, 1, 2, 3, 3, 4], Default::default());
        let realizer = Realizer::with_source(4, source).unwrap();
        let trace = realizer.realize_traced(&mut rng).unwrap();
        assert_eq!(trace.excess, 3);
        assert_eq!(trace.rounds, 2);
    }

    #[test]
    fn trace_is_consistent() {
        let weights = Weights::new(vec![5.0, 1.0, 1.0, 0.5, 0.25, 3.0]).unwrap();
        let realizer = Realizer::new(5, &weights).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let trace = realizer.realize_traced(&mut rng).unwrap();
            assert_eq!(trace.draws.len() as u64, 5 + trace.excess);
            let distinct: HashSet<_> = trace.draws.iter().copied().collect();
            assert_eq!(distinct.len(), 5);
            assert_eq!(trace.rounds == 0, trace.excess == 0);
        }
    }

    #[test]
    fn zero_weight_item_is_never_collected() {
        let weights = Weights::new(vec![1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let realizer = Realizer::new(4, &weights).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..200 {
            let trace = realizer.realize_traced(&mut rng).unwrap();
            assert!(!trace.draws.contains(&3));
        }
    }

    #[test]
    fn same_seed_same_result() {
        let weights = Weights::new(vec![0.4, 0.3, 0.2, 0.1]).unwrap();
        let realizer = Realizer::new(4, &weights).unwrap();
        let a: Vec<u64> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..50).map(|_| realizer.realize(&mut rng).unwrap()).collect()
        };
        let b: Vec<u64> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..50).map(|_| realizer.realize(&mut rng).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_target() {
        let weights = Weights::uniform(3).unwrap();
        let err = Realizer::new(0, &weights).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidArgument(InvalidArgument::ZeroTarget)
        ));
    }

    #[test]
    fn rejects_target_above_population() {
        let weights = Weights::uniform(3).unwrap();
        let err = Realizer::new(4, &weights).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidArgument(InvalidArgument::TargetExceedsPopulation {
                target: 4,
                population: 3
            })
        ));
    }

    #[test]
    fn rejects_target_above_support() {
        let weights = Weights::new(vec![1.0, 0.0, 1.0]).unwrap();
        let err = Realizer::new(3, &weights).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidArgument(InvalidArgument::TargetExceedsSupport {
                target: 3,
                support: 2
            })
        ));
        assert!(Realizer::new(2, &weights).is_ok());
    }

    #[test]
    fn round_cap_surfaces_as_exhausted_retries() {
        let realizer = Realizer::with_source(2, StuckSource)
            .unwrap()
            .with_max_rounds(50);
        let mut rng = StdRng::seed_from_u64(0);
        let err = realizer.realize(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimError::ExhaustedRetries {
                rounds: 50,
                unique: 1,
                target: 2
            }
        ));
    }

    #[test]
    fn free_function_validates() {
        let weights = Weights::uniform(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(realize(3, &weights, &mut rng).unwrap_err().is_invalid_argument());
        assert!(realize(2, &weights, &mut rng).is_ok());
    }

    #[test]
    fn huge_weights_realize_without_panicking() {
        let overflowing = Weights::new(vec![f64::MAX, f64::MAX]).unwrap_err();
        assert_eq!(overflowing, InvalidArgument::NonFiniteTotal);

        let weights = Weights::new(vec![f64::MAX / 2.0, f64::MAX / 2.0]).unwrap();
        assert!(weights.total().is_finite());
        let realizer = Realizer::new(2, &weights).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let trace = realizer.realize_traced(&mut rng).unwrap();
            assert!(trace.draws.iter().all(|&l| l == 1 || l == 2));
        }
    }

    #[test]
    fn mark_new_skips_sentinel_and_repeats() {
        let mut seen = HashSet::new();
        assert_eq!(mark_new(&[0, 1, 1, 3, 0], &mut seen), 2);
        assert_eq!(mark_new(&[3, 2], &mut seen), 1);
        assert!(!seen.contains(&SENTINEL));
    }
}
