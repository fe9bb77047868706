//! Error types for the `stackrank` binary.
//!
//! [`CliError`] wraps every failure mode of a command so `main` can
//! propagate with `?`.

use stackrank_core::{AggregateError, ConfigError, DistributionError, SimulationError};

/// Top-level error for the `stackrank` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The simulation run failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },

    /// Trial results could not be aggregated.
    #[error("aggregate error: {source}")]
    Aggregate {
        /// The underlying aggregate error.
        #[from]
        source: AggregateError,
    },

    /// A distribution given on the command line was invalid.
    #[error("distribution error: {source}")]
    Distribution {
        /// The underlying distribution error.
        #[from]
        source: DistributionError,
    },

    /// Writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Drawing a chart failed.
    #[error("plot error: {message}")]
    Plot {
        /// Description of the drawing failure.
        message: String,
    },

    /// A command-line value was out of range.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },
}
