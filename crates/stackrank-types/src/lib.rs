//! Shared type definitions for the stack ranking simulation.
//!
//! Every crate in the workspace exchanges data through the types defined
//! here: categorical labels, payoff coefficients, configuration keys, and
//! the accuracy tallies and aggregated rows produced by a run.
//!
//! # Modules
//!
//! - [`estimate`] -- Comparison of an assigned rating against the true
//!   label, and per-trial accuracy tallies.
//! - [`payoff`] -- Payoff coefficient triples used by the scorer.
//! - [`results`] -- Configuration keys and aggregated result rows.

pub mod estimate;
pub mod payoff;
pub mod results;

// Re-export all public types at crate root for convenience.
pub use estimate::{AccuracyCounts, Estimate};
pub use payoff::Payoff;
pub use results::{AggregateRow, RunConfiguration};

/// A categorical performance or rating label.
///
/// Labels are positions in a distribution's bin list; the implicit trailing
/// label equals the number of explicit bins.
pub type Label = usize;
