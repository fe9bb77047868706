//! Command-line interface definition.
//!
//! Flags given on the command line override the matching fields of the
//! YAML configuration file; anything left unset keeps the file's value or
//! the built-in default.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stackrank_core::{LabelEstimator, SimulationConfig};
use stackrank_types::Payoff;

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(name = "stackrank")]
#[command(
    about = "Demonstrates how stack ranking group size affects rating accuracy and payoff",
    version
)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the Monte Carlo simulation and print one row per configuration
    Simulate(SimulateArgs),

    /// Render a grid of sorted sample bar charts as SVG
    Plot(PlotArgs),
}

/// Flags for `stackrank simulate`.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// YAML configuration file (defaults to `stackrank.yaml` if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// The total size of the organization being stack ranked
    #[arg(long)]
    pub population: Option<usize>,

    /// The number of Monte Carlo runs to use
    #[arg(long)]
    pub repetitions: Option<usize>,

    /// The true distribution of the population's performance
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub performance_bins: Option<Vec<u32>>,

    /// The distribution the stack ranking policy assumes
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub rating_bins: Option<Vec<u32>>,

    /// The sizes of stack ranking groups to test
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub sample_sizes: Option<Vec<usize>>,

    /// The true production of employees in each performance bin
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub production: Option<Vec<f64>>,

    /// A payoff as `UNDER,CORRECT,OVER` coefficients (repeatable)
    #[arg(long = "payoff", value_parser = parse_payoff, allow_hyphen_values = true)]
    pub payoffs: Vec<Payoff>,

    /// How rating labels per group size are estimated
    #[arg(long, value_enum)]
    pub estimator: Option<EstimatorKind>,

    /// Output format for the result table
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Omit the CSV header row
    #[arg(long)]
    pub no_header: bool,
}

/// Flags for `stackrank plot`.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// The distribution to draw the population from
    #[arg(long, num_args = 1.., value_delimiter = ',', default_values_t = [5, 10, 50, 25, 10])]
    pub bins: Vec<u32>,

    /// Individuals per chart
    #[arg(long, default_value_t = 8)]
    pub sample_size: usize,

    /// Rows of charts in the grid
    #[arg(long, default_value_t = 8)]
    pub rows: usize,

    /// Columns of charts in the grid
    #[arg(long, default_value_t = 8)]
    pub cols: usize,

    /// Random seed for a reproducible population
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the SVG
    #[arg(short, long, default_value = "population.svg")]
    pub output: PathBuf,
}

/// Estimator selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EstimatorKind {
    /// One large oversampled population
    Oversample,
    /// Averages over many smaller populations
    MonteCarlo,
}

/// Format of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values
    Csv,
    /// A pretty-printed JSON array
    Json,
}

/// Parse a payoff written as `UNDER,CORRECT,OVER`.
pub fn parse_payoff(value: &str) -> Result<Payoff, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coefficient {part:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [underestimate, correct, overestimate] => {
            Ok(Payoff::new(*underestimate, *correct, *overestimate))
        }
        _ => Err(format!(
            "expected three comma-separated coefficients, got {}",
            parts.len()
        )),
    }
}

impl SimulateArgs {
    /// Overlay the command-line flags onto a loaded configuration.
    pub fn apply_overrides(&self, config: &mut SimulationConfig) {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
        }
        if let Some(bins) = &self.performance_bins {
            config.performance_bins.clone_from(bins);
        }
        if let Some(bins) = &self.rating_bins {
            config.rating_bins.clone_from(bins);
        }
        if self.sample_sizes.is_some() {
            config.sample_sizes.clone_from(&self.sample_sizes);
        }
        if let Some(production) = &self.production {
            config.production.clone_from(production);
        }
        if !self.payoffs.is_empty() {
            config.payoffs.clone_from(&self.payoffs);
        }
        if let Some(kind) = self.estimator {
            config.estimator = select_estimator(kind, config.estimator);
        }
    }
}

/// Pick the estimator for `kind`, keeping the configured parameters when
/// the configuration already uses that kind.
fn select_estimator(kind: EstimatorKind, configured: LabelEstimator) -> LabelEstimator {
    match (kind, configured) {
        (EstimatorKind::Oversample, LabelEstimator::Oversample { .. })
        | (EstimatorKind::MonteCarlo, LabelEstimator::MonteCarlo { .. }) => configured,
        (EstimatorKind::Oversample, LabelEstimator::MonteCarlo { .. }) => {
            LabelEstimator::default()
        }
        (EstimatorKind::MonteCarlo, LabelEstimator::Oversample { .. }) => {
            LabelEstimator::default_monte_carlo()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn simulate_args(args: &[&str]) -> SimulateArgs {
        match parse(args).command {
            Command::Simulate(simulate) => simulate,
            Command::Plot(_) => panic!("expected simulate"),
        }
    }

    #[test]
    fn parses_payoff_triples() {
        assert_eq!(parse_payoff("0.5,1.2,1").unwrap(), Payoff::new(0.5, 1.2, 1.0));
        assert_eq!(parse_payoff("-1, 1, 0").unwrap(), Payoff::new(-1.0, 1.0, 0.0));
        assert!(parse_payoff("1,2").is_err());
        assert!(parse_payoff("a,b,c").is_err());
    }

    #[test]
    fn simulate_defaults_leave_config_untouched() {
        let args = simulate_args(&["stackrank", "simulate"]);
        let mut config = SimulationConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(args.format, OutputFormat::Csv);
        assert!(!args.no_header);
    }

    #[test]
    fn flags_override_config() {
        let args = simulate_args(&[
            "stackrank",
            "simulate",
            "--seed",
            "7",
            "--population",
            "50",
            "--repetitions",
            "3",
            "--performance-bins",
            "20",
            "20",
            "--rating-bins",
            "10,30",
            "--sample-sizes",
            "5",
            "25",
            "--payoff",
            "-1,1,0",
            "--payoff",
            "0,1,0",
            "--estimator",
            "monte-carlo",
            "--format",
            "json",
        ]);
        let mut config = SimulationConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.population_size, 50);
        assert_eq!(config.repetitions, 3);
        assert_eq!(config.performance_bins, vec![20, 20]);
        assert_eq!(config.rating_bins, vec![10, 30]);
        assert_eq!(config.sample_sizes, Some(vec![5, 25]));
        assert_eq!(
            config.payoffs,
            vec![Payoff::new(-1.0, 1.0, 0.0), Payoff::new(0.0, 1.0, 0.0)]
        );
        assert!(matches!(config.estimator, LabelEstimator::MonteCarlo { .. }));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn matching_estimator_keeps_configured_parameters() {
        let configured = LabelEstimator::MonteCarlo {
            trials: 5,
            trial_population: 50,
        };
        assert_eq!(
            select_estimator(EstimatorKind::MonteCarlo, configured),
            configured
        );
        assert_eq!(
            select_estimator(EstimatorKind::Oversample, configured),
            LabelEstimator::default()
        );
    }

    #[test]
    fn plot_defaults() {
        let Command::Plot(plot) = parse(&["stackrank", "plot"]).command else {
            panic!("expected plot");
        };
        assert_eq!(plot.bins, vec![5, 10, 50, 25, 10]);
        assert_eq!(plot.sample_size, 8);
        assert_eq!((plot.rows, plot.cols), (8, 8));
        assert_eq!(plot.output, PathBuf::from("population.svg"));
    }
}
