mod config;
mod executors;
mod registry;
mod resolve;
mod runner;

use clap::Parser;
use config::{BenchConfig, ConfigErrors};
use executors::ShellExecutor;
use runner::PhaseRunner;
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Data warehouse benchmark harness driving psql, sqlplus or dbaccess
/// through a fixed init/load/index/query lifecycle.
#[derive(Parser, Debug)]
#[command(name = "benchw", version, about)]
struct Cli {
    /// path to the benchmark configuration
    #[arg(short, long, default_value = "benchw.yaml")]
    config: PathBuf,

    /// abort on the first failed command instead of running every phase
    #[arg(long)]
    strict: bool,

    /// resolve and print every command without executing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        error!("{error}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ConfigErrors> {
    let config = BenchConfig::load(&cli.config)?;

    if config.preflight_checks() {
        return Err(ConfigErrors::FailedPreflight);
    }

    let vendor = config.vendor()?;
    info!(
        "Starting benchw against {vendor} with config {}",
        cli.config.display()
    );

    let mut executor = ShellExecutor;
    let timings = PhaseRunner::new(vendor, config.params())
        .strict(cli.strict || config.executor.strict)
        .dry_run(cli.dry_run)
        .run(&mut executor)?;

    runner::report(&timings);

    Ok(())
}
