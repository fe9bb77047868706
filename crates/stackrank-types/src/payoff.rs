//! Payoff coefficients applied to each rated individual.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::estimate::Estimate;

/// A payoff function expressed as three coefficients.
///
/// Each individual's score is their production multiplied by the
/// coefficient matching how their rating compares with their true label.
/// Field order (underestimate, correct, overestimate) is the column order
/// of the tabular output.
///
/// Equality and ordering use [`f64::total_cmp`] so payoffs can key an
/// ordered map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Payoff {
    /// Coefficient applied when the rating is below the true label.
    #[serde(rename = "underestimate_coefficient", alias = "underestimate")]
    pub underestimate: f64,
    /// Coefficient applied when the rating equals the true label.
    #[serde(rename = "correct_coefficient", alias = "correct")]
    pub correct: f64,
    /// Coefficient applied when the rating is above the true label.
    #[serde(rename = "overestimate_coefficient", alias = "overestimate")]
    pub overestimate: f64,
}

impl Payoff {
    /// Build a payoff from its three coefficients.
    pub const fn new(underestimate: f64, correct: f64, overestimate: f64) -> Self {
        Self {
            underestimate,
            correct,
            overestimate,
        }
    }

    /// The coefficient for a classified rating.
    pub const fn coefficient(&self, estimate: Estimate) -> f64 {
        match estimate {
            Estimate::Under => self.underestimate,
            Estimate::Correct => self.correct,
            Estimate::Over => self.overestimate,
        }
    }
}

impl PartialEq for Payoff {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Payoff {}

impl PartialOrd for Payoff {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Payoff {
    fn cmp(&self, other: &Self) -> Ordering {
        self.underestimate
            .total_cmp(&other.underestimate)
            .then_with(|| self.correct.total_cmp(&other.correct))
            .then_with(|| self.overestimate.total_cmp(&other.overestimate))
    }
}

impl Hash for Payoff {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.underestimate.to_bits().hash(state);
        self.correct.to_bits().hash(state);
        self.overestimate.to_bits().hash(state);
    }
}

impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.underestimate, self.correct, self.overestimate
        )
    }
}
