//! Population generation, stack rating, scoring, and Monte Carlo
//! orchestration for the stack ranking simulation.
//!
//! The simulation asks how the size of a rating group changes the accuracy
//! and payoff of forced-distribution ("stack ranking") reviews. A synthetic
//! organization is drawn from a true performance distribution, split into
//! groups, and rated within each group against an assumed distribution.
//! The ratings are compared with the truth and scored, and the whole
//! process is repeated to average out the randomness.
//!
//! # Modules
//!
//! - [`distribution`] -- Bin specifications, the dense label lookup, and
//!   population generation.
//! - [`sample_labels`] -- Per-group-size rating label sequences and the
//!   memoizing [`SampleLabelCalculator`].
//! - [`rating`] -- Chunked, rank-based rating of a population.
//! - [`production`] -- Per-label production values.
//! - [`scoring`] -- Payoff scores and accuracy tallies.
//! - [`simulation`] -- Repeated trials across group sizes and payoffs.
//! - [`aggregate`] -- Configuration-level averages of trial results.
//! - [`config`] -- YAML configuration loading.
//!
//! All randomness comes from a caller-supplied [`rand::Rng`]; seed it to
//! reproduce a run.
//!
//! [`SampleLabelCalculator`]: sample_labels::SampleLabelCalculator

pub mod aggregate;
pub mod config;
pub mod distribution;
pub mod production;
pub mod rating;
pub mod sample_labels;
pub mod scoring;
pub mod simulation;

// Re-export primary types at crate root.
pub use aggregate::{AggregateError, aggregate};
pub use config::{ConfigError, DEFAULT_CONFIG_FILE, SimulationConfig};
pub use distribution::{Distribution, DistributionError, LABEL_POSITIONS, map_bins_to_labels};
pub use production::ProductionTable;
pub use rating::{RatingError, rate_population};
pub use sample_labels::{
    LabelEstimator, SampleLabelCalculator, SampleLabelError, monte_carlo_labels,
    oversample_labels,
};
pub use scoring::{ScoringError, rating_accuracy, score_ratings};
pub use simulation::{
    SimulationError, SimulationOutcome, SimulationParams, default_sample_sizes, simulate_ratings,
};
