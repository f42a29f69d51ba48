//! Summary statistics of an empirical null distribution.
//!
//! Also carries the closed-form reference for uniform weights: collecting `m`
//! of `M` equally likely items takes `sum_{k<m} M / (M - k)` draws on average
//! (the coupon-collector expectation), so the expected excess is that minus `m`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub trials: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
    pub median: f64,
    /// 5th percentile.
    pub p05: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl DistributionSummary {
    /// Summarize samples. Returns `None` for an empty slice.
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        let n = samples.len();
        if n == 0 {
            return None;
        }

        let mut sorted: Vec<f64> = samples.iter().map(|&x| x as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let variance =
                sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            trials: n,
            mean,
            std_dev,
            min: sorted[0] as u64,
            max: sorted[n - 1] as u64,
            median: percentile_sorted(&sorted, 50.0),
            p05: percentile_sorted(&sorted, 5.0),
            p95: percentile_sorted(&sorted, 95.0),
        })
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> f64 {
        self.std_dev / (self.trials as f64).sqrt()
    }
}

/// Linear-interpolated percentile (`p` in 0..=100) of sorted data.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// `H(k) = 1 + 1/2 + ... + 1/k`.
pub fn harmonic(k: usize) -> f64 {
    (1..=k).map(|i| 1.0 / i as f64).sum()
}

/// Expected excess draws to collect `target` of `population` equally likely items.
///
/// Returns `None` when `target` is 0 or exceeds `population`.
pub fn expected_excess_uniform(population: usize, target: usize) -> Option<f64> {
    if target == 0 || target > population {
        return None;
    }
    let m = population as f64;
    let draws: f64 = (0..target).map(|k| m / (m - k as f64)).sum();
    Some(draws - target as f64)
}
