//! Configuration loading and typed config structures for the simulation.
//!
//! The configuration lives in a YAML file (by default `stackrank.yaml` in
//! the working directory). Every field has a default, so an empty file or
//! no file at all describes the standard experiment: an organization of
//! 200 rated 100 times against the same 5/10/50/25/10 distribution it
//! truly follows.

use std::path::Path;

use serde::Deserialize;
use stackrank_types::Payoff;

use crate::distribution::{Distribution, DistributionError};
use crate::production::ProductionTable;
use crate::sample_labels::LabelEstimator;
use crate::simulation::{SimulationParams, default_sample_sizes};

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stackrank.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A distribution field holds invalid bins.
    #[error("invalid {field}: {source}")]
    InvalidBins {
        /// Name of the offending field.
        field: &'static str,
        /// The underlying distribution error.
        source: DistributionError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility. When absent, a seed is drawn from
    /// the operating system and logged.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Number of individuals in the organization being stack ranked.
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Number of Monte Carlo repetitions.
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,

    /// True distribution of the population's performance.
    #[serde(default = "default_bins")]
    pub performance_bins: Vec<u32>,

    /// Distribution the stack ranking policy assumes.
    #[serde(default = "default_bins")]
    pub rating_bins: Vec<u32>,

    /// Rating group sizes to compare. Defaults to the geometric series
    /// from [`default_sample_sizes`].
    #[serde(default)]
    pub sample_sizes: Option<Vec<usize>>,

    /// True production of an individual in each performance label.
    #[serde(default = "default_production")]
    pub production: Vec<f64>,

    /// Payoff functions to score ratings with.
    #[serde(default = "default_payoffs")]
    pub payoffs: Vec<Payoff>,

    /// Estimator for per-group-size rating labels.
    #[serde(default)]
    pub estimator: LabelEstimator,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            population_size: default_population_size(),
            repetitions: default_repetitions(),
            performance_bins: default_bins(),
            rating_bins: default_bins(),
            sample_sizes: None,
            production: default_production(),
            payoffs: default_payoffs(),
            estimator: LabelEstimator::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The group sizes to simulate, falling back to the default series.
    pub fn resolved_sample_sizes(&self) -> Vec<usize> {
        self.sample_sizes
            .clone()
            .unwrap_or_else(|| default_sample_sizes(self.population_size))
    }

    /// Build validated simulation parameters from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBins`] if either distribution's bins
    /// sum above 100.
    pub fn to_params(&self) -> Result<SimulationParams, ConfigError> {
        let performance =
            Distribution::new(&self.performance_bins).map_err(|source| ConfigError::InvalidBins {
                field: "performance_bins",
                source,
            })?;
        let rating =
            Distribution::new(&self.rating_bins).map_err(|source| ConfigError::InvalidBins {
                field: "rating_bins",
                source,
            })?;
        Ok(SimulationParams {
            performance,
            rating,
            population_size: self.population_size,
            sample_sizes: self.resolved_sample_sizes(),
            payoffs: self.payoffs.clone(),
            production: ProductionTable::new(self.production.clone()),
            repetitions: self.repetitions,
            estimator: self.estimator,
        })
    }
}

const fn default_population_size() -> usize {
    200
}

const fn default_repetitions() -> usize {
    100
}

fn default_bins() -> Vec<u32> {
    vec![5, 10, 50, 25, 10]
}

fn default_production() -> Vec<f64> {
    vec![1.05, 1.1, 1.15, 1.2, 1.25]
}

fn default_payoffs() -> Vec<Payoff> {
    vec![Payoff::new(0.5, 1.2, 1.0)]
}
