//! Deterministic per-trial RNG hierarchy.
//!
//! A master seed generates a sub-seed for every trial index. Sub-seeds are
//! derived via BLAKE3 hashing, independently of thread scheduling order, so a
//! parallel null distribution is identical regardless of thread count.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for a trial index.
    pub fn sub_seed(&self, trial: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"nullsim/trial");
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&trial.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded StdRng for a trial index.
    pub fn rng_for(&self, trial: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(trial))
    }
}
