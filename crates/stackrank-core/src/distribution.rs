//! Categorical distributions over integer labels.
//!
//! A distribution is written as a list of bin sizes on a 0--100 scale. Bin
//! `k` covers `bins[k]` percent of the range and produces label `k`; any
//! percentage left over after the explicit bins belongs to an implicit
//! trailing label equal to `bins.len()`.
//!
//! ```text
//! bins = [10, 20]  =>  [0] * 10 + [1] * 20 + [2] * 70
//! ```
//!
//! [`Distribution`] validates the bins once, lays them out into a dense
//! 100-entry lookup table, and draws populations by sampling uniform
//! positions in that table.

use rand::Rng;
use stackrank_types::Label;

/// Number of positions in the dense lookup table (the 0--100 scale).
pub const LABEL_POSITIONS: usize = 100;

/// Errors that can occur when building a distribution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistributionError {
    /// The bin sizes add up to more than the 100 available positions.
    #[error("distribution bins sum to {sum}, which exceeds 100")]
    ExceedsRange {
        /// The (saturated) sum of the bins.
        sum: u32,
    },
}

/// A validated categorical distribution with its dense label lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    bins: Vec<u32>,
    table: Vec<Label>,
}

impl Distribution {
    /// Validate `bins` and build the dense lookup table.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::ExceedsRange`] if the bins sum above
    /// [`LABEL_POSITIONS`].
    pub fn new(bins: &[u32]) -> Result<Self, DistributionError> {
        let table = map_bins_to_labels(bins)?;
        Ok(Self {
            bins: bins.to_vec(),
            table,
        })
    }

    /// The bin sizes this distribution was built from.
    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// The dense 100-entry lookup from position to label.
    pub fn labels(&self) -> &[Label] {
        &self.table
    }

    /// The implicit trailing label, which covers any unassigned positions.
    pub fn implicit_label(&self) -> Label {
        self.bins.len()
    }

    /// The largest label this distribution can produce.
    pub fn max_label(&self) -> Label {
        self.table
            .last()
            .copied()
            .unwrap_or_else(|| self.implicit_label())
    }

    /// The label at a position of the 0--100 scale.
    ///
    /// Positions past the table resolve to the implicit label.
    pub fn label_at(&self, position: usize) -> Label {
        self.table
            .get(position)
            .copied()
            .unwrap_or_else(|| self.implicit_label())
    }

    /// Draw one label by sampling a uniform position in `[0, 100)`.
    pub fn sample(&self, rng: &mut impl Rng) -> Label {
        let position: usize = rng.random_range(0..LABEL_POSITIONS);
        self.label_at(position)
    }

    /// Generate a population of `population_size` labels.
    ///
    /// Labels appear in draw order; the result is not sorted.
    pub fn generate_population(&self, population_size: usize, rng: &mut impl Rng) -> Vec<Label> {
        (0..population_size).map(|_| self.sample(rng)).collect()
    }
}

/// Lay `bins` out consecutively over the 100 positions of the scale.
///
/// The first `bins[0]` positions get label 0, the next `bins[1]` get
/// label 1, and so on. Trailing positions get label `bins.len()`. An empty
/// bin list maps every position to label 0.
///
/// # Errors
///
/// Returns [`DistributionError::ExceedsRange`] if the bins sum above
/// [`LABEL_POSITIONS`].
pub fn map_bins_to_labels(bins: &[u32]) -> Result<Vec<Label>, DistributionError> {
    let sum = bins.iter().fold(0_u32, |acc, &bin| acc.saturating_add(bin));
    let fits = usize::try_from(sum).is_ok_and(|total| total <= LABEL_POSITIONS);
    if !fits {
        return Err(DistributionError::ExceedsRange { sum });
    }

    let mut labels = Vec::with_capacity(LABEL_POSITIONS);
    for (label, &bin) in bins.iter().enumerate() {
        for _ in 0..bin {
            labels.push(label);
        }
    }
    labels.resize(LABEL_POSITIONS, bins.len());
    Ok(labels)
}
