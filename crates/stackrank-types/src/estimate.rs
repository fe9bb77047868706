//! Classification of a rating against the individual's true label.
//!
//! The scorer and the accuracy analyzer share one comparison rule:
//! a rating below the true label is an underestimate, a rating above it
//! is an overestimate, and an equal rating is correct.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::Label;

/// Outcome of comparing an assigned rating with the true label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    /// The rating is lower than the true label.
    Under,
    /// The rating equals the true label.
    Correct,
    /// The rating is higher than the true label.
    Over,
}

impl Estimate {
    /// Classify `rating` against `true_label`.
    pub fn classify(true_label: Label, rating: Label) -> Self {
        match rating.cmp(&true_label) {
            Ordering::Less => Self::Under,
            Ordering::Equal => Self::Correct,
            Ordering::Greater => Self::Over,
        }
    }
}

/// Per-trial tally of underestimates, exact matches, and overestimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccuracyCounts {
    /// Individuals rated below their true label.
    pub underestimates: usize,
    /// Individuals rated exactly at their true label.
    pub correct: usize,
    /// Individuals rated above their true label.
    pub overestimates: usize,
}

impl AccuracyCounts {
    /// Build a tally from explicit counts.
    pub const fn new(underestimates: usize, correct: usize, overestimates: usize) -> Self {
        Self {
            underestimates,
            correct,
            overestimates,
        }
    }

    /// Add one classified individual to the tally.
    pub const fn record(&mut self, estimate: Estimate) {
        match estimate {
            Estimate::Under => self.underestimates = self.underestimates.saturating_add(1),
            Estimate::Correct => self.correct = self.correct.saturating_add(1),
            Estimate::Over => self.overestimates = self.overestimates.saturating_add(1),
        }
    }

    /// Total number of individuals tallied.
    pub const fn total(&self) -> usize {
        self.underestimates
            .saturating_add(self.correct)
            .saturating_add(self.overestimates)
    }
}
