//! Statistical checks of the excess-draws statistic against known results.
//!
//! With uniform weights and `m = M` the statistic is the classic
//! coupon-collector waiting time minus `M`, whose mean is `M * H(M) - M`.

use nullsim_core::{
    sample_null_distribution, NoProgress, NullSampler, Realizer, RngHierarchy, Weights,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mean(values: &[u64]) -> f64 {
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

fn harmonic(k: usize) -> f64 {
    (1..=k).map(|i| 1.0 / i as f64).sum()
}

#[test]
fn uniform_five_matches_coupon_collector_mean() {
    // 5 * H(5) - 5 = 6.4167; sd of the waiting time is ~5.0, so the standard
    // error at n = 1000 is ~0.16.
    let weights = Weights::new(vec![0.2; 5]).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let samples = sample_null_distribution(5, 1000, &weights, &mut rng, &NoProgress).unwrap();

    assert_eq!(samples.len(), 1000);
    let expected = 5.0 * harmonic(5) - 5.0;
    let observed = mean(&samples);
    assert!(
        (observed - expected).abs() < 0.75,
        "mean {observed:.3} too far from {expected:.3}"
    );
}

#[test]
fn uniform_full_collection_mean_for_larger_population() {
    let population = 20;
    let weights = Weights::uniform(population).unwrap();
    let sampler = NullSampler::new(Realizer::new(population, &weights).unwrap(), 10_000).unwrap();
    let samples = sampler
        .sample_parallel(&RngHierarchy::new(99), &NoProgress)
        .unwrap();

    let expected = population as f64 * harmonic(population) - population as f64;
    let observed = mean(&samples);
    // sd of the waiting time for M = 20 is ~24; standard error ~0.24.
    assert!(
        (observed - expected).abs() < 1.0,
        "mean {observed:.3} too far from {expected:.3}"
    );
}

#[test]
fn partial_collection_matches_uniform_expectation() {
    // Collecting m of M uniformly: sum_{k<m} M/(M-k) - m.
    let (population, target) = (10usize, 6usize);
    let weights = Weights::uniform(population).unwrap();
    let sampler = NullSampler::new(Realizer::new(target, &weights).unwrap(), 5_000).unwrap();
    let samples = sampler
        .sample_seeded(&RngHierarchy::new(5), &NoProgress)
        .unwrap();

    let expected: f64 = (0..target)
        .map(|k| population as f64 / (population - k) as f64)
        .sum::<f64>()
        - target as f64;
    let observed = mean(&samples);
    assert!(
        (observed - expected).abs() < 0.15,
        "mean {observed:.3} too far from {expected:.3}"
    );
}

#[test]
fn mean_is_non_decreasing_in_target() {
    let weights = Weights::new(vec![0.4, 0.25, 0.15, 0.1, 0.1]).unwrap();
    let seeds = RngHierarchy::new(7);

    let means: Vec<f64> = (1..=5)
        .map(|m| {
            let sampler = NullSampler::new(Realizer::new(m, &weights).unwrap(), 4_000).unwrap();
            mean(&sampler.sample_parallel(&seeds, &NoProgress).unwrap())
        })
        .collect();

    assert_eq!(means[0], 0.0);
    for pair in means.windows(2) {
        assert!(pair[1] + 0.05 >= pair[0], "means not monotone: {means:?}");
    }
    assert!(means[4] > means[1]);
}

#[test]
fn zero_weight_population_collects_remaining_items() {
    let weights = Weights::new(vec![0.3, 0.3, 0.0, 0.2, 0.2]).unwrap();
    let realizer = Realizer::new(4, &weights).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
        let trace = realizer.realize_traced(&mut rng).unwrap();
        assert!(!trace.draws.contains(&3));
        assert_eq!(trace.draws.len() as u64, 4 + trace.excess);
    }
}

#[test]
fn single_target_is_always_zero() {
    let weights = Weights::new(vec![1.0, 2.0, 3.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let samples = sample_null_distribution(1, 500, &weights, &mut rng, &NoProgress).unwrap();
    assert!(samples.iter().all(|&x| x == 0));
}

#[test]
fn skewed_weights_need_more_draws_than_uniform() {
    let uniform = Weights::uniform(6).unwrap();
    let skewed = Weights::new(vec![10.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
    let seeds = RngHierarchy::new(11);

    let run = |w: &Weights| {
        let sampler = NullSampler::new(Realizer::new(6, w).unwrap(), 3_000).unwrap();
        mean(&sampler.sample_parallel(&seeds, &NoProgress).unwrap())
    };

    assert!(run(&skewed) > run(&uniform));
}
