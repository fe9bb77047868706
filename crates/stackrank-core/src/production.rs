//! Per-label production values.

use serde::Deserialize;
use stackrank_types::Label;

/// Production used for labels the table does not cover.
pub const UNIT_PRODUCTION: f64 = 1.0;

/// The true production of an individual in each performance label.
///
/// Index `k` holds the production of label `k`, including the implicit
/// trailing label. Labels past the end of the table produce
/// [`UNIT_PRODUCTION`], which makes the payoff coefficient the whole score.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProductionTable {
    values: Vec<f64>,
}

impl ProductionTable {
    /// Wrap a list of per-label production values.
    pub const fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Production of an individual whose true label is `label`.
    pub fn value_for(&self, label: Label) -> f64 {
        self.values.get(label).copied().unwrap_or(UNIT_PRODUCTION)
    }

    /// Whether every label up to and including `max_label` has an entry.
    pub fn covers(&self, max_label: Label) -> bool {
        max_label < self.values.len()
    }

    /// The raw per-label values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for ProductionTable {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
