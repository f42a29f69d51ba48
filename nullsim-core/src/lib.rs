//! nullsim core: weighted coupon-collector null distributions.
//!
//! This crate contains the simulation itself:
//! - Validated weight vectors over a population labelled `1..=M`
//! - Weighted sampling with replacement behind the `DrawSource` seam
//! - The unique-draw realizer (excess draws until `m` distinct items)
//! - Sequential, per-trial-seeded and parallel null distribution drivers
//! - Deterministic per-trial RNG hierarchy
//! - Progress reporting

pub mod distribution;
pub mod draw;
pub mod error;
pub mod progress;
pub mod realize;
pub mod rng;
pub mod weights;

pub use distribution::{sample_null_distribution, NullSampler};
pub use draw::{sample_weighted, DrawSource, Label, WeightedDraws, SENTINEL};
pub use error::{InvalidArgument, SimError};
pub use progress::{HashMarks, NoProgress, TrialProgress};
pub use realize::{realize, Realization, Realizer, DEFAULT_MAX_ROUNDS};
pub use rng::RngHierarchy;
pub use weights::Weights;
