//! Command-line runner for the stack ranking simulation.
//!
//! `stackrank simulate` loads configuration, runs the Monte Carlo
//! simulation across every group size and payoff, and prints one row of
//! averages per configuration. `stackrank plot` draws a population and
//! renders a grid of sorted sample charts as SVG.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing, to stderr)
//! 2. Parse the command line
//! 3. Load configuration from `stackrank.yaml` and apply flag overrides
//! 4. Seed the random source (explicit or OS-drawn, always logged)
//! 5. Run the command and write its output

mod chart;
mod cli;
mod error;
mod output;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stackrank_core::{
    DEFAULT_CONFIG_FILE, Distribution, SimulationConfig, aggregate, simulate_ratings,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chart::{SampleGrid, render_sample_grid};
use crate::cli::{Cli, Command, OutputFormat, PlotArgs, SimulateArgs};
use crate::error::CliError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, simulation, or output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    // 2. Parse the command line.
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(args) => run_simulate(&args)?,
        Command::Plot(args) => run_plot(&args)?,
    }
    Ok(())
}

/// Run the simulation and print the aggregated table to stdout.
fn run_simulate(args: &SimulateArgs) -> Result<(), CliError> {
    // 3. Load configuration.
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    let params = config.to_params()?;
    info!(
        population_size = params.population_size,
        repetitions = params.repetitions,
        performance_bins = ?config.performance_bins,
        rating_bins = ?config.rating_bins,
        "Configuration loaded"
    );

    // 4. Seed the random source.
    let mut rng = seeded_rng(config.seed);

    // 5. Simulate, aggregate, and write.
    let outcome = simulate_ratings(&params, &mut rng)?;
    let rows = aggregate(&outcome.scores, &outcome.accuracy)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Csv => output::write_csv(&mut out, &rows, !args.no_header)?,
        OutputFormat::Json => output::write_json(&mut out, &rows)?,
    }
    out.flush()?;

    info!(rows = rows.len(), "Results written");
    Ok(())
}

/// Draw a population and write its sample chart grid as SVG.
fn run_plot(args: &PlotArgs) -> Result<(), CliError> {
    let distribution = Distribution::new(&args.bins)?;
    let grid = SampleGrid {
        sample_size: args.sample_size,
        rows: args.rows,
        cols: args.cols,
        y_max: distribution.max_label().saturating_add(1),
    };

    let mut rng = seeded_rng(args.seed);
    let population = distribution.generate_population(grid.population_size()?, &mut rng);
    let svg = render_sample_grid(&population, &grid)?;
    std::fs::write(&args.output, svg)?;

    info!(
        output = %args.output.display(),
        sample_size = grid.sample_size,
        charts = grid.rows.saturating_mul(grid.cols),
        "Sample chart written"
    );
    Ok(())
}

/// Load the simulation configuration.
///
/// An explicit path must exist. Without one, `stackrank.yaml` in the
/// working directory is used when present, and defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<SimulationConfig, CliError> {
    if let Some(path) = path {
        info!(path = %path.display(), "Loading config");
        return Ok(SimulationConfig::from_file(path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        info!(path = DEFAULT_CONFIG_FILE, "Loading config");
        Ok(SimulationConfig::from_file(default_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

/// Build the run's random source, drawing a seed from the OS when none is
/// given. The seed is logged so any run can be replayed.
fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "Random source seeded");
    StdRng::seed_from_u64(seed)
}
