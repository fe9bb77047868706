//! Rating labels for each rank position within a group.
//!
//! A group of `n` individuals rated against an assumed distribution should
//! receive the labels a sample of size `n` would show if its members sat
//! at evenly spaced quantiles of that distribution. Both estimators build
//! an ascending label sequence of length `n` from those quantiles:
//!
//! - [`LabelEstimator::Oversample`] draws one very large population, sorts
//!   it, and picks the order statistic at the middle of each of the `n`
//!   equal-width chunks.
//! - [`LabelEstimator::MonteCarlo`] repeats that pick on many smaller
//!   populations and rounds the averaged label at each position.
//!
//! [`SampleLabelCalculator`] binds an estimator to a rating distribution
//! and a real population size, and memoizes one sequence per group size.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use rand::Rng;
use serde::Deserialize;
use stackrank_types::Label;
use tracing::debug;

use crate::distribution::Distribution;

/// Errors that can occur when computing sample labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleLabelError {
    /// A group of zero individuals has no rank positions.
    #[error("sample size must be positive")]
    ZeroSampleSize,

    /// The synthetic population used for order statistics is empty.
    #[error("oversampled population must contain at least one individual")]
    EmptyOversample,

    /// The Monte Carlo estimator was configured with no trials.
    #[error("monte carlo estimator needs at least one trial")]
    NoTrials,
}

/// How the ascending label sequence for a group size is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LabelEstimator {
    /// Pick evenly spaced order statistics from one large population of
    /// `max(oversample_floor, population_size * oversample_factor)`.
    Oversample {
        /// Minimum size of the synthetic population.
        #[serde(default = "default_oversample_floor")]
        oversample_floor: usize,
        /// Multiple of the real population size used when it exceeds the floor.
        #[serde(default = "default_oversample_factor")]
        oversample_factor: usize,
    },

    /// Average evenly spaced order statistics across many populations and
    /// round each position to the nearest label.
    MonteCarlo {
        /// Number of independent populations to average over.
        #[serde(default = "default_trials")]
        trials: usize,
        /// Size of each trial population.
        #[serde(default = "default_trial_population")]
        trial_population: usize,
    },
}

impl Default for LabelEstimator {
    fn default() -> Self {
        Self::Oversample {
            oversample_floor: default_oversample_floor(),
            oversample_factor: default_oversample_factor(),
        }
    }
}

impl LabelEstimator {
    /// The Monte Carlo estimator with its default trial count and size.
    pub const fn default_monte_carlo() -> Self {
        Self::MonteCarlo {
            trials: default_trials(),
            trial_population: default_trial_population(),
        }
    }

    /// Short name used in logs and on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Oversample { .. } => "oversample",
            Self::MonteCarlo { .. } => "monte-carlo",
        }
    }
}

const fn default_oversample_floor() -> usize {
    100_000
}

const fn default_oversample_factor() -> usize {
    100
}

const fn default_trials() -> usize {
    100
}

const fn default_trial_population() -> usize {
    1000
}

/// Position of the `index`-th evenly spaced order statistic.
///
/// The population is split into `sample_size` chunks of equal (fractional)
/// width and the middle of each chunk is taken, rounding down.
fn order_statistic_position(index: usize, sample_size: usize, population_len: usize) -> usize {
    // Counts stay far below 2^52, so the f64 conversions are exact and the
    // floored position is non-negative and below `population_len`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::suboptimal_flops
    )]
    let position = {
        let chunk = population_len as f64 / sample_size as f64;
        (index as f64 * chunk + chunk / 2.0).floor() as usize
    };
    position.min(population_len.saturating_sub(1))
}

/// Pick `sample_size` evenly spaced order statistics from a sorted population.
fn pick_order_statistics(sorted: &[Label], sample_size: usize) -> Vec<Label> {
    (0..sample_size)
        .filter_map(|i| {
            sorted
                .get(order_statistic_position(i, sample_size, sorted.len()))
                .copied()
        })
        .collect()
}

/// Estimate the ascending label sequence for a group of `sample_size` by
/// oversampling a population of `oversample_size` from `distribution`.
///
/// # Errors
///
/// Returns [`SampleLabelError::ZeroSampleSize`] if `sample_size` is zero or
/// [`SampleLabelError::EmptyOversample`] if `oversample_size` is zero.
pub fn oversample_labels(
    distribution: &Distribution,
    sample_size: usize,
    oversample_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Label>, SampleLabelError> {
    if sample_size == 0 {
        return Err(SampleLabelError::ZeroSampleSize);
    }
    if oversample_size == 0 {
        return Err(SampleLabelError::EmptyOversample);
    }

    let mut population = distribution.generate_population(oversample_size, rng);
    population.sort_unstable();
    Ok(pick_order_statistics(&population, sample_size))
}

/// Estimate the ascending label sequence for a group of `sample_size` by
/// averaging order statistics over `trials` populations of
/// `trial_population` individuals each.
///
/// Each averaged position is rounded to the nearest label, ties to even.
///
/// # Errors
///
/// Returns [`SampleLabelError::ZeroSampleSize`],
/// [`SampleLabelError::EmptyOversample`], or [`SampleLabelError::NoTrials`]
/// when the corresponding argument is zero.
pub fn monte_carlo_labels(
    distribution: &Distribution,
    sample_size: usize,
    trials: usize,
    trial_population: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Label>, SampleLabelError> {
    if sample_size == 0 {
        return Err(SampleLabelError::ZeroSampleSize);
    }
    if trial_population == 0 {
        return Err(SampleLabelError::EmptyOversample);
    }
    if trials == 0 {
        return Err(SampleLabelError::NoTrials);
    }

    let mut sums = vec![0_usize; sample_size];
    for _ in 0..trials {
        let mut population = distribution.generate_population(trial_population, rng);
        population.sort_unstable();
        let picks = pick_order_statistics(&population, sample_size);
        for (sum, label) in sums.iter_mut().zip(picks) {
            *sum = sum.saturating_add(label);
        }
    }

    // Sums are bounded by trials * max_label, well inside f64's exact range.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let labels = sums
        .into_iter()
        .map(|sum| (sum as f64 / trials as f64).round_ties_even() as Label)
        .collect();
    Ok(labels)
}

/// Memoizing source of per-group-size label sequences.
///
/// Bound to one rating distribution and one real population size for its
/// whole lifetime. The first request for a group size computes and caches
/// the sequence; later requests return the cached sequence without drawing
/// from the random source again.
#[derive(Debug, Clone)]
pub struct SampleLabelCalculator {
    distribution: Distribution,
    population_size: usize,
    estimator: LabelEstimator,
    cache: BTreeMap<usize, Vec<Label>>,
}

impl SampleLabelCalculator {
    /// Create a calculator using the default oversampling estimator.
    pub fn new(distribution: Distribution, population_size: usize) -> Self {
        Self::with_estimator(distribution, population_size, LabelEstimator::default())
    }

    /// Create a calculator using an explicit estimator.
    pub const fn with_estimator(
        distribution: Distribution,
        population_size: usize,
        estimator: LabelEstimator,
    ) -> Self {
        Self {
            distribution,
            population_size,
            estimator,
            cache: BTreeMap::new(),
        }
    }

    /// The rating distribution labels are drawn from.
    pub const fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The real population size this calculator is bound to.
    pub const fn population_size(&self) -> usize {
        self.population_size
    }

    /// The estimator used to fill the cache.
    pub const fn estimator(&self) -> LabelEstimator {
        self.estimator
    }

    /// Number of group sizes cached so far.
    pub fn cached_sizes(&self) -> usize {
        self.cache.len()
    }

    /// Size of the synthetic population used by the oversampling estimator.
    pub fn oversample_size(&self) -> usize {
        match self.estimator {
            LabelEstimator::Oversample {
                oversample_floor,
                oversample_factor,
            } => oversample_floor.max(self.population_size.saturating_mul(oversample_factor)),
            LabelEstimator::MonteCarlo {
                trial_population, ..
            } => trial_population,
        }
    }

    /// The ascending label sequence for a group of `sample_size`.
    ///
    /// Order-statistic spacing uses `min(sample_size, population_size)`
    /// positions, so a group size larger than the real population yields a
    /// sequence as long as the population.
    ///
    /// # Errors
    ///
    /// Returns [`SampleLabelError::ZeroSampleSize`] if `sample_size` is zero,
    /// or the estimator's error if its configuration is degenerate.
    pub fn labels(
        &mut self,
        sample_size: usize,
        rng: &mut impl Rng,
    ) -> Result<&[Label], SampleLabelError> {
        if sample_size == 0 {
            return Err(SampleLabelError::ZeroSampleSize);
        }

        let oversample_size = self.oversample_size();
        match self.cache.entry(sample_size) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_slice()),
            Entry::Vacant(entry) => {
                let effective = sample_size.min(self.population_size).max(1);
                let labels = match self.estimator {
                    LabelEstimator::Oversample { .. } => {
                        oversample_labels(&self.distribution, effective, oversample_size, rng)?
                    }
                    LabelEstimator::MonteCarlo {
                        trials,
                        trial_population,
                    } => monte_carlo_labels(
                        &self.distribution,
                        effective,
                        trials,
                        trial_population,
                        rng,
                    )?,
                };
                debug!(
                    sample_size,
                    effective_size = effective,
                    estimator = self.estimator.name(),
                    "Sample labels computed"
                );
                Ok(entry.insert(labels).as_slice())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn mean(labels: &[Label]) -> f64 {
        labels.iter().sum::<usize>() as f64 / labels.len() as f64
    }

    fn distribution(bins: &[u32]) -> Distribution {
        Distribution::new(bins).unwrap()
    }

    #[test]
    fn oversample_matches_bin_quantiles() {
        let mut rng = SmallRng::seed_from_u64(42);
        let labels = oversample_labels(&distribution(&[10, 20]), 10, 10_000, &mut rng).unwrap();
        assert_eq!(labels, vec![0, 1, 1, 2, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn oversample_mean_tracks_distribution_mean() {
        let mut rng = SmallRng::seed_from_u64(42);
        let low = oversample_labels(&distribution(&[5, 20]), 10, 10_000, &mut rng).unwrap();
        let expected_low = (0.0 * 5.0 + 1.0 * 20.0 + 2.0 * 75.0) / 100.0;
        assert!((mean(&low) - expected_low).abs() <= expected_low * 0.1);

        let high = oversample_labels(&distribution(&[15, 20]), 10, 10_000, &mut rng).unwrap();
        let expected_high = (0.0 * 15.0 + 1.0 * 20.0 + 2.0 * 65.0) / 100.0;
        assert!((mean(&high) - expected_high).abs() <= expected_high * 0.1);
    }

    #[test]
    fn output_has_requested_length_and_is_ascending() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dist = distribution(&[5, 10, 50, 25, 10]);
        for sample_size in [1, 2, 3, 5, 7, 16, 64, 200] {
            let labels = oversample_labels(&dist, sample_size, 20_000, &mut rng).unwrap();
            assert_eq!(labels.len(), sample_size);
            assert!(labels.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn sample_larger_than_oversample_still_fills_every_position() {
        let mut rng = SmallRng::seed_from_u64(42);
        let labels = oversample_labels(&distribution(&[50]), 8, 3, &mut rng).unwrap();
        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dist = distribution(&[50]);
        assert_eq!(
            oversample_labels(&dist, 0, 100, &mut rng),
            Err(SampleLabelError::ZeroSampleSize)
        );
        assert_eq!(
            oversample_labels(&dist, 5, 0, &mut rng),
            Err(SampleLabelError::EmptyOversample)
        );
        assert_eq!(
            monte_carlo_labels(&dist, 5, 0, 100, &mut rng),
            Err(SampleLabelError::NoTrials)
        );
    }

    #[test]
    fn monte_carlo_matches_bin_quantiles() {
        let mut rng = SmallRng::seed_from_u64(42);
        let labels = monte_carlo_labels(&distribution(&[10, 20]), 10, 100, 1000, &mut rng).unwrap();
        assert_eq!(labels, vec![0, 1, 1, 2, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn monte_carlo_output_is_ascending() {
        let mut rng = SmallRng::seed_from_u64(3);
        let labels =
            monte_carlo_labels(&distribution(&[5, 10, 50, 25, 10]), 16, 20, 500, &mut rng).unwrap();
        assert_eq!(labels.len(), 16);
        assert!(labels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn calculator_memoizes_per_sample_size() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator = SampleLabelCalculator::new(distribution(&[5, 10, 50, 25, 10]), 200);
        let first = calculator.labels(7, &mut rng).unwrap().to_vec();

        // A cache hit must not consume randomness.
        let mut probe = rng.clone();
        let second = calculator.labels(7, &mut rng).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(rng.random::<u64>(), probe.random::<u64>());
        assert_eq!(calculator.cached_sizes(), 1);

        calculator.labels(3, &mut rng).unwrap();
        assert_eq!(calculator.cached_sizes(), 2);
    }

    #[test]
    fn calculator_caps_spacing_at_population_size() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator = SampleLabelCalculator::new(distribution(&[15, 20]), 2);
        assert_eq!(calculator.labels(5, &mut rng).unwrap().len(), 2);
        assert_eq!(calculator.labels(2, &mut rng).unwrap(), &[1, 2]);
    }

    #[test]
    fn calculator_oversample_size_scales_with_population() {
        let small = SampleLabelCalculator::new(distribution(&[50]), 200);
        assert_eq!(small.oversample_size(), 100_000);
        let large = SampleLabelCalculator::new(distribution(&[50]), 5000);
        assert_eq!(large.oversample_size(), 500_000);
    }

    #[test]
    fn calculator_rejects_zero_sample_size() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator = SampleLabelCalculator::new(distribution(&[50]), 10);
        assert_eq!(
            calculator.labels(0, &mut rng).unwrap_err(),
            SampleLabelError::ZeroSampleSize
        );
    }

    #[test]
    fn estimator_deserializes_from_yaml() {
        let estimator: LabelEstimator =
            serde_yml::from_str("method: monte_carlo\ntrials: 10\n").unwrap();
        assert_eq!(
            estimator,
            LabelEstimator::MonteCarlo {
                trials: 10,
                trial_population: 1000,
            }
        );
        let default: LabelEstimator = serde_yml::from_str("method: oversample\n").unwrap();
        assert_eq!(default, LabelEstimator::default());
    }
}
