//! Configuration keys and aggregated result rows.

use serde::{Deserialize, Serialize};

use crate::payoff::Payoff;

/// Identifies one scored scenario: a rating group size paired with a
/// payoff function.
///
/// Per-trial scores and accuracy tallies accumulate under this key, one
/// entry per repetition. Ordering sorts by sample size first, then by
/// payoff coefficients in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Number of individuals rated together in one group.
    pub sample_size: usize,
    /// Payoff coefficients used to score the ratings.
    #[serde(flatten)]
    pub payoff: Payoff,
}

impl RunConfiguration {
    /// Build a configuration key.
    pub const fn new(sample_size: usize, payoff: Payoff) -> Self {
        Self {
            sample_size,
            payoff,
        }
    }
}

/// Configuration-level averages across all repetitions of one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow<K> {
    /// The configuration these averages belong to.
    #[serde(flatten)]
    pub key: K,
    /// Mean of the per-trial total scores.
    pub average_score: f64,
    /// Mean number of underestimated individuals per trial.
    pub average_underestimates: f64,
    /// Mean number of correctly rated individuals per trial.
    pub average_correct: f64,
    /// Mean number of overestimated individuals per trial.
    pub average_overestimates: f64,
}

impl<K> AggregateRow<K> {
    /// The four averages in output column order.
    pub const fn averages(&self) -> [f64; 4] {
        [
            self.average_score,
            self.average_underestimates,
            self.average_correct,
            self.average_overestimates,
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn configurations_sort_by_sample_size_first() {
        let small = RunConfiguration::new(5, Payoff::new(1.0, 1.0, 1.0));
        let large = RunConfiguration::new(10, Payoff::new(-1.0, 0.0, 0.0));
        assert!(small < large);
    }

    #[test]
    fn row_serializes_flat_in_column_order() {
        let row = AggregateRow {
            key: RunConfiguration::new(5, Payoff::new(0.5, 1.2, 1.0)),
            average_score: 10.0,
            average_underestimates: 1.0,
            average_correct: 2.0,
            average_overestimates: 3.0,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"sample_size":5,"underestimate_coefficient":0.5,"correct_coefficient":1.2,"overestimate_coefficient":1.0,"average_score":10.0,"average_underestimates":1.0,"average_correct":2.0,"average_overestimates":3.0}"#
        );
    }
}
