//! Scoring of ratings against the true population.
//!
//! Each individual scores their production multiplied by the payoff
//! coefficient for their estimate: underestimated, correct, or
//! overestimated. The accuracy analyzer tallies the same estimates.

use stackrank_types::{AccuracyCounts, Estimate, Label, Payoff};

use crate::production::ProductionTable;

/// Errors that can occur while scoring ratings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// The ratings are not parallel to the population.
    #[error("population has {population} individuals but {ratings} ratings were given")]
    LengthMismatch {
        /// Number of individuals in the population.
        population: usize,
        /// Number of ratings supplied.
        ratings: usize,
    },
}

fn check_parallel(population: &[Label], ratings: &[Label]) -> Result<(), ScoringError> {
    if population.len() == ratings.len() {
        Ok(())
    } else {
        Err(ScoringError::LengthMismatch {
            population: population.len(),
            ratings: ratings.len(),
        })
    }
}

/// Per-individual payoff scores for a rated population.
///
/// # Errors
///
/// Returns [`ScoringError::LengthMismatch`] if `population` and `ratings`
/// differ in length.
pub fn score_ratings(
    population: &[Label],
    ratings: &[Label],
    production: &ProductionTable,
    payoff: &Payoff,
) -> Result<Vec<f64>, ScoringError> {
    check_parallel(population, ratings)?;
    Ok(population
        .iter()
        .zip(ratings)
        .map(|(&true_label, &rating)| {
            let estimate = Estimate::classify(true_label, rating);
            production.value_for(true_label) * payoff.coefficient(estimate)
        })
        .collect())
}

/// Count underestimates, exact matches, and overestimates.
///
/// # Errors
///
/// Returns [`ScoringError::LengthMismatch`] if `population` and `ratings`
/// differ in length.
pub fn rating_accuracy(
    population: &[Label],
    ratings: &[Label],
) -> Result<AccuracyCounts, ScoringError> {
    check_parallel(population, ratings)?;
    let mut counts = AccuracyCounts::default();
    for (&true_label, &rating) in population.iter().zip(ratings) {
        counts.record(Estimate::classify(true_label, rating));
    }
    Ok(counts)
}
