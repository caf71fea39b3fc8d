use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use drt_routing::routing::TracingSink;
use drt_routing::scenario::{Scenario, ScenarioError};
use drt_routing::validation::PlanChecker;

/// Routes trips for an on-demand ride service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Route every request in a scenario file
    Route {
        /// Scenario JSON file
        #[arg(long)]
        scenario: PathBuf,

        /// Where to write routed trips. Defaults to stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a JSON list of plans for activity/leg alternation
    Check {
        /// Plans JSON file: an array of plans, each an array of elements
        #[arg(long)]
        plans: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write trips: {0}")]
    Write(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} plans are malformed")]
    MalformedPlans { failed: usize, total: usize },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Route { scenario, output } => route(&scenario, output.as_deref()),
        Command::Check { plans } => check(&plans),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn route(scenario: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let scenario = Scenario::from_path(scenario)?;
    let routed = scenario.run(Arc::new(TracingSink))?;
    info!(trips = routed.len(), "routed scenario");

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).map_err(io_error(path))?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &routed)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn check(path: &Path) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    let plans: Vec<Vec<Value>> = serde_json::from_str(&contents)?;

    let checker = PlanChecker::new(Arc::new(TracingSink));
    let failed = plans
        .iter()
        .enumerate()
        .filter(|(index, plan)| {
            checker
                .check(&format!("plan {index}"), plan.as_slice())
                .is_err()
        })
        .count();

    info!(plans = plans.len(), failed, "checked plans");
    if failed > 0 {
        return Err(CliError::MalformedPlans {
            failed,
            total: plans.len(),
        });
    }
    Ok(())
}
