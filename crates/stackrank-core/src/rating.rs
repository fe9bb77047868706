//! Stack rating of a population in fixed-size groups.
//!
//! The population is split into consecutive groups of `sample_size`
//! individuals (the final group may be shorter). Within each group,
//! members are ranked by their true label and handed the group's rating
//! labels from the top down: the highest-ranked member gets the highest
//! label in the sequence, the next member the next label, and so on.
//!
//! Ranking uses a stable ascending sort that is then reversed, so among
//! members with equal true labels the later one in the population ranks
//! higher.

use rand::Rng;
use stackrank_types::Label;

use crate::sample_labels::{SampleLabelCalculator, SampleLabelError};

/// Errors that can occur while rating a population.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    /// Groups of zero individuals cannot partition a population.
    #[error("rating group size must be positive")]
    ZeroSampleSize,

    /// The label sequence for a group could not be computed.
    #[error("sample label error: {source}")]
    SampleLabels {
        /// The underlying sample label error.
        #[from]
        source: SampleLabelError,
    },
}

/// Descending label sequence for a group of `group_size`.
fn labels_high_to_low(
    calculator: &mut SampleLabelCalculator,
    group_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Label>, SampleLabelError> {
    Ok(calculator
        .labels(group_size, rng)?
        .iter()
        .rev()
        .copied()
        .collect())
}

/// Assign a rating label to every individual in `population`.
///
/// Returns a ratings vector parallel to `population`. A final group
/// shorter than `sample_size` fetches its own label sequence for its exact
/// length from the calculator rather than reusing part of the full-size
/// sequence.
///
/// # Errors
///
/// Returns [`RatingError::ZeroSampleSize`] if `sample_size` is zero, or
/// [`RatingError::SampleLabels`] if a label sequence cannot be computed.
pub fn rate_population(
    population: &[Label],
    sample_size: usize,
    calculator: &mut SampleLabelCalculator,
    rng: &mut impl Rng,
) -> Result<Vec<Label>, RatingError> {
    if sample_size == 0 {
        return Err(RatingError::ZeroSampleSize);
    }

    let mut ratings = vec![0; population.len()];
    if population.is_empty() {
        return Ok(ratings);
    }

    let full_labels = labels_high_to_low(calculator, sample_size, rng)?;

    for (group, rated) in population
        .chunks(sample_size)
        .zip(ratings.chunks_mut(sample_size))
    {
        let short_labels;
        let labels = if group.len() == sample_size {
            &full_labels
        } else {
            short_labels = labels_high_to_low(calculator, group.len(), rng)?;
            &short_labels
        };

        let mut ranked: Vec<usize> = (0..group.len()).collect();
        ranked.sort_by_key(|&i| group.get(i).copied());
        ranked.reverse();

        for (&label, &member) in labels.iter().zip(&ranked) {
            if let Some(slot) = rated.get_mut(member) {
                *slot = label;
            }
        }
    }

    Ok(ratings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::distribution::Distribution;

    fn rate(population: &[Label], sample_size: usize, bins: &[u32]) -> Vec<Label> {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator =
            SampleLabelCalculator::new(Distribution::new(bins).unwrap(), population.len());
        rate_population(population, sample_size, &mut calculator, &mut rng).unwrap()
    }

    const POPULATION: [Label; 12] = [2, 0, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2];

    #[test]
    fn rates_groups_against_skewed_distribution() {
        assert_eq!(
            rate(&POPULATION, 5, &[0, 20]),
            vec![2, 1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2]
        );
    }

    #[test]
    fn rates_groups_against_three_label_distribution() {
        assert_eq!(
            rate(&POPULATION, 5, &[20, 20]),
            vec![2, 0, 1, 2, 2, 0, 1, 2, 2, 2, 1, 2]
        );
    }

    #[test]
    fn population_smaller_than_group_uses_its_own_size() {
        assert_eq!(rate(&[2, 0], 5, &[15, 20]), vec![2, 1]);
    }

    #[test]
    fn short_final_group_fetches_exact_size_labels() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator =
            SampleLabelCalculator::new(Distribution::new(&[20, 20]).unwrap(), POPULATION.len());
        rate_population(&POPULATION, 5, &mut calculator, &mut rng).unwrap();
        // One sequence for the full groups and one for the trailing pair.
        assert_eq!(calculator.cached_sizes(), 2);
        assert_eq!(calculator.labels(2, &mut rng).unwrap(), &[1, 2]);
    }

    #[test]
    fn ratings_align_with_population() {
        let mut rng = SmallRng::seed_from_u64(9);
        let distribution = Distribution::new(&[5, 10, 50, 25, 10]).unwrap();
        let population = distribution.generate_population(203, &mut rng);
        let mut calculator = SampleLabelCalculator::new(distribution, population.len());
        for sample_size in [1, 5, 10, 50, 101, 203, 500] {
            let ratings =
                rate_population(&population, sample_size, &mut calculator, &mut rng).unwrap();
            assert_eq!(ratings.len(), population.len());
            assert!(ratings.iter().all(|&r| r <= 4));
        }
    }

    #[test]
    fn ratings_follow_rank_within_each_group() {
        let mut rng = SmallRng::seed_from_u64(11);
        let distribution = Distribution::new(&[5, 10, 50, 25, 10]).unwrap();
        let population = distribution.generate_population(60, &mut rng);
        let mut calculator = SampleLabelCalculator::new(distribution, population.len());
        let ratings = rate_population(&population, 20, &mut calculator, &mut rng).unwrap();
        for (group, rated) in population.chunks(20).zip(ratings.chunks(20)) {
            for a in 0..group.len() {
                for b in 0..group.len() {
                    if group[a] < group[b] {
                        assert!(rated[a] <= rated[b]);
                    }
                }
            }
        }
    }

    #[test]
    fn empty_population_has_no_ratings() {
        assert!(rate(&[], 5, &[50]).is_empty());
    }

    #[test]
    fn zero_group_size_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut calculator = SampleLabelCalculator::new(Distribution::new(&[50]).unwrap(), 4);
        assert_eq!(
            rate_population(&[1, 0, 1, 0], 0, &mut calculator, &mut rng),
            Err(RatingError::ZeroSampleSize)
        );
    }
}
