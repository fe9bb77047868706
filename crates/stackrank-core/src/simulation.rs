//! Monte Carlo orchestration across group sizes and payoff functions.
//!
//! Each repetition draws one population from the performance distribution.
//! The population is rated once per group size (ratings do not depend on
//! the payoff), and every payoff function then scores that rating. Total
//! scores and accuracy tallies accumulate under a [`RunConfiguration`] key,
//! one entry per repetition.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use stackrank_types::{AccuracyCounts, Payoff, RunConfiguration};
use tracing::{debug, info, warn};

use crate::distribution::Distribution;
use crate::production::ProductionTable;
use crate::rating::{RatingError, rate_population};
use crate::sample_labels::{LabelEstimator, SampleLabelCalculator, SampleLabelError};
use crate::scoring::{ScoringError, rating_accuracy, score_ratings};

/// Smallest group size in the default geometric series.
pub const DEFAULT_FIRST_SAMPLE_SIZE: usize = 5;

/// Errors that can occur while running the simulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The organization must have at least one individual.
    #[error("population size must be positive")]
    ZeroPopulation,

    /// At least one repetition is needed to average over.
    #[error("repetition count must be positive")]
    ZeroRepetitions,

    /// A requested group size was zero.
    #[error("sample sizes must be positive")]
    ZeroSampleSize,

    /// No group sizes were requested.
    #[error("at least one sample size is required")]
    NoSampleSizes,

    /// No payoff functions were requested.
    #[error("at least one payoff is required")]
    NoPayoffs,

    /// Precomputing a label sequence failed.
    #[error("sample label error: {source}")]
    SampleLabels {
        /// The underlying sample label error.
        #[from]
        source: SampleLabelError,
    },

    /// Rating a population failed.
    #[error("rating error: {source}")]
    Rating {
        /// The underlying rating error.
        #[from]
        source: RatingError,
    },

    /// Scoring a rating failed.
    #[error("scoring error: {source}")]
    Scoring {
        /// The underlying scoring error.
        #[from]
        source: ScoringError,
    },
}

/// Everything one orchestration run needs.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// True distribution of performance in the organization.
    pub performance: Distribution,
    /// Distribution the stack ranking policy assumes.
    pub rating: Distribution,
    /// Number of individuals in the organization.
    pub population_size: usize,
    /// Rating group sizes to compare.
    pub sample_sizes: Vec<usize>,
    /// Payoff functions to score each rating with.
    pub payoffs: Vec<Payoff>,
    /// Production of each true performance label.
    pub production: ProductionTable,
    /// Number of Monte Carlo repetitions.
    pub repetitions: usize,
    /// How rating labels per group size are estimated.
    pub estimator: LabelEstimator,
}

impl SimulationParams {
    /// Check the run is well-formed.
    ///
    /// # Errors
    ///
    /// Returns the [`SimulationError`] variant naming the first degenerate
    /// parameter found.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.population_size == 0 {
            return Err(SimulationError::ZeroPopulation);
        }
        if self.repetitions == 0 {
            return Err(SimulationError::ZeroRepetitions);
        }
        if self.sample_sizes.is_empty() {
            return Err(SimulationError::NoSampleSizes);
        }
        if self.sample_sizes.contains(&0) {
            return Err(SimulationError::ZeroSampleSize);
        }
        if self.payoffs.is_empty() {
            return Err(SimulationError::NoPayoffs);
        }
        Ok(())
    }
}

/// Raw per-trial results keyed by configuration.
///
/// Both maps share the same key set, and every list holds one entry per
/// repetition in trial order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOutcome {
    /// Total score of the whole population for each trial.
    pub scores: BTreeMap<RunConfiguration, Vec<f64>>,
    /// Accuracy tally for each trial.
    pub accuracy: BTreeMap<RunConfiguration, Vec<AccuracyCounts>>,
}

/// The default group sizes for an organization of `population_size`.
///
/// Doubles from [`DEFAULT_FIRST_SAMPLE_SIZE`] while the next size stays
/// below half the population, then adds half the population and the whole
/// population. Duplicates and zero sizes are dropped.
pub fn default_sample_sizes(population_size: usize) -> Vec<usize> {
    let half = population_size / 2;
    let mut sizes = vec![DEFAULT_FIRST_SAMPLE_SIZE];
    let mut last = DEFAULT_FIRST_SAMPLE_SIZE;
    while let Some(next) = last.checked_mul(2).filter(|&next| next < half) {
        sizes.push(next);
        last = next;
    }
    sizes.push(half);
    sizes.push(population_size);
    sizes.retain(|&size| size > 0);
    dedup_preserving_order(sizes)
}

/// Drop repeated items, keeping the first occurrence of each.
fn dedup_preserving_order<T: Ord + Copy>(items: Vec<T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

/// Run every configuration `params.repetitions` times and collect the raw
/// per-trial results.
///
/// Duplicate group sizes and payoffs are dropped with a warning, so the
/// outcome holds exactly one key per distinct (group size, payoff) pair.
///
/// # Errors
///
/// Returns [`SimulationError`] if the parameters are degenerate or a
/// rating step fails.
pub fn simulate_ratings(
    params: &SimulationParams,
    rng: &mut impl Rng,
) -> Result<SimulationOutcome, SimulationError> {
    params.validate()?;

    let sample_sizes = dedup_preserving_order(params.sample_sizes.clone());
    if sample_sizes.len() != params.sample_sizes.len() {
        warn!(
            requested = params.sample_sizes.len(),
            distinct = sample_sizes.len(),
            "Duplicate sample sizes dropped"
        );
    }
    let payoffs = dedup_preserving_order(params.payoffs.clone());
    if payoffs.len() != params.payoffs.len() {
        warn!(
            requested = params.payoffs.len(),
            distinct = payoffs.len(),
            "Duplicate payoffs dropped"
        );
    }
    if !params.production.covers(params.performance.max_label()) {
        warn!(
            max_label = params.performance.max_label(),
            production_entries = params.production.values().len(),
            "Production table does not cover every performance label; unit production used for the rest"
        );
    }

    info!(
        population_size = params.population_size,
        repetitions = params.repetitions,
        sample_sizes = ?sample_sizes,
        payoffs = payoffs.len(),
        estimator = params.estimator.name(),
        "Simulation starting"
    );

    // Precompute label sequences so every repetition hits the cache.
    let mut calculator = SampleLabelCalculator::with_estimator(
        params.rating.clone(),
        params.population_size,
        params.estimator,
    );
    for &sample_size in &sample_sizes {
        calculator.labels(sample_size, rng)?;
    }
    info!(
        cached_sizes = calculator.cached_sizes(),
        oversample_size = calculator.oversample_size(),
        "Sample labels precomputed"
    );

    let mut outcome = SimulationOutcome::default();
    for repetition in 0..params.repetitions {
        let population = params
            .performance
            .generate_population(params.population_size, rng);

        for &sample_size in &sample_sizes {
            let ratings = rate_population(&population, sample_size, &mut calculator, rng)?;
            let accuracy = rating_accuracy(&population, &ratings)?;

            for payoff in &payoffs {
                let key = RunConfiguration::new(sample_size, *payoff);
                let total: f64 =
                    score_ratings(&population, &ratings, &params.production, payoff)?
                        .iter()
                        .sum();
                outcome.scores.entry(key).or_default().push(total);
                outcome.accuracy.entry(key).or_default().push(accuracy);
            }
        }

        debug!(repetition, "Repetition complete");
    }

    info!(
        configurations = outcome.scores.len(),
        repetitions = params.repetitions,
        "Simulation complete"
    );
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn params() -> SimulationParams {
        SimulationParams {
            performance: Distribution::new(&[20, 20]).unwrap(),
            rating: Distribution::new(&[20, 20]).unwrap(),
            population_size: 5,
            sample_sizes: vec![3, 5],
            payoffs: vec![Payoff::new(-1.0, 1.0, 0.0), Payoff::new(0.0, 1.0, 0.0)],
            production: ProductionTable::from(vec![1.05, 1.1, 1.15, 1.2, 1.25]),
            repetitions: 1,
            estimator: LabelEstimator::default(),
        }
    }

    #[test]
    fn default_sizes_for_typical_population() {
        assert_eq!(default_sample_sizes(200), vec![5, 10, 20, 40, 80, 100, 200]);
    }

    #[test]
    fn default_sizes_drop_duplicates() {
        assert_eq!(default_sample_sizes(10), vec![5, 10]);
        assert_eq!(default_sample_sizes(1), vec![5, 1]);
    }

    #[test]
    fn outcome_has_every_configuration() {
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = simulate_ratings(&params(), &mut rng).unwrap();
        let keys: Vec<_> = outcome.scores.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                RunConfiguration::new(3, Payoff::new(-1.0, 1.0, 0.0)),
                RunConfiguration::new(3, Payoff::new(0.0, 1.0, 0.0)),
                RunConfiguration::new(5, Payoff::new(-1.0, 1.0, 0.0)),
                RunConfiguration::new(5, Payoff::new(0.0, 1.0, 0.0)),
            ]
        );
        assert!(outcome.accuracy.keys().eq(outcome.scores.keys()));
    }

    #[test]
    fn every_key_has_one_entry_per_repetition() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut p = params();
        p.population_size = 40;
        p.sample_sizes = vec![5, 10, 20, 40];
        p.repetitions = 7;
        let outcome = simulate_ratings(&p, &mut rng).unwrap();
        assert_eq!(outcome.scores.len(), 4 * 2);
        assert_eq!(outcome.accuracy.len(), 4 * 2);
        for (key, trials) in &outcome.scores {
            assert_eq!(trials.len(), 7, "{key:?}");
            assert_eq!(outcome.accuracy[key].len(), 7);
            assert!(outcome.accuracy[key].iter().all(|c| c.total() == 40));
        }
    }

    #[test]
    fn accuracy_is_shared_across_payoffs() {
        let mut rng = SmallRng::seed_from_u64(5);
        let outcome = simulate_ratings(&params(), &mut rng).unwrap();
        for sample_size in [3, 5] {
            let a = &outcome.accuracy[&RunConfiguration::new(sample_size, Payoff::new(-1.0, 1.0, 0.0))];
            let b = &outcome.accuracy[&RunConfiguration::new(sample_size, Payoff::new(0.0, 1.0, 0.0))];
            assert_eq!(a, b);
        }
    }

    #[test]
    fn duplicate_inputs_do_not_inflate_trials() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut p = params();
        p.sample_sizes = vec![3, 5, 3];
        p.payoffs.push(Payoff::new(0.0, 1.0, 0.0));
        p.repetitions = 3;
        let outcome = simulate_ratings(&p, &mut rng).unwrap();
        assert_eq!(outcome.scores.len(), 4);
        assert!(outcome.scores.values().all(|trials| trials.len() == 3));
    }

    #[test]
    fn same_seed_reproduces_outcome() {
        let a = simulate_ratings(&params(), &mut SmallRng::seed_from_u64(1)).unwrap();
        let b = simulate_ratings(&params(), &mut SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);

        let mut p = params();
        p.population_size = 0;
        assert_eq!(simulate_ratings(&p, &mut rng), Err(SimulationError::ZeroPopulation));

        let mut p = params();
        p.repetitions = 0;
        assert_eq!(simulate_ratings(&p, &mut rng), Err(SimulationError::ZeroRepetitions));

        let mut p = params();
        p.sample_sizes = vec![3, 0];
        assert_eq!(simulate_ratings(&p, &mut rng), Err(SimulationError::ZeroSampleSize));

        let mut p = params();
        p.sample_sizes.clear();
        assert_eq!(simulate_ratings(&p, &mut rng), Err(SimulationError::NoSampleSizes));

        let mut p = params();
        p.payoffs.clear();
        assert_eq!(simulate_ratings(&p, &mut rng), Err(SimulationError::NoPayoffs));
    }
}
