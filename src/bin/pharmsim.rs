//! Command-line host for the calculation service.
//!
//! Reads a request body from a file or stdin, runs it through the `/calculate` or
//! `/validate` handler and prints the response. Logs go to stderr.
//!
//! ```text
//! echo '{"compound":{"half_life":6},"dosingInfo":{"dose":500}}' | pharmsim --pretty
//! pharmsim --input request.json --format csv > trace.csv
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pharmsim::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Endpoint {
    Calculate,
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// The JSON response envelope
    Json,
    /// `time,concentration` rows (successful calculations only)
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Solver {
    Ode,
    Analytical,
}

/// Simulate a multi-dose concentration-time curve from a JSON request.
#[derive(Debug, Parser)]
#[command(name = "pharmsim", version, about, long_about = None)]
struct Cli {
    /// Request body file (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Endpoint to invoke
    #[arg(short, long, value_enum, default_value = "calculate")]
    endpoint: Endpoint,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Solver for extravascular routes
    #[arg(short, long, value_enum, default_value = "ode")]
    solver: Solver,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn read_body(input: Option<&PathBuf>) -> Result<String> {
    let mut body = String::new();
    match input {
        Some(path) => {
            body = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut body)
                .context("failed to read request from stdin")?;
        }
    }
    Ok(body)
}

fn run(cli: Cli) -> Result<bool> {
    let settings = SimulationSettings {
        solver: match cli.solver {
            Solver::Ode => ExtravascularSolver::Ode,
            Solver::Analytical => ExtravascularSolver::Analytical,
        },
        ..Default::default()
    };
    let service = Service::new(ResolverDefaults::default(), settings);
    let body = read_body(cli.input.as_ref())?;

    let response = match cli.endpoint {
        Endpoint::Calculate => service.calculate_json(&body),
        Endpoint::Validate => service.validate(&body),
    };

    let mut stdout = io::stdout().lock();
    match (cli.format, &response.body) {
        (Format::Csv, ResponseBody::Trace { data, .. }) => data.to_csv(&mut stdout)?,
        _ => {
            let text = if cli.pretty {
                serde_json::to_string_pretty(&response.body)?
            } else {
                response.to_json()?
            };
            writeln!(stdout, "{text}")?;
        }
    }
    tracing::debug!(status = response.status, "request handled");
    Ok(response.is_success())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
