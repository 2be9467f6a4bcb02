//! CLI for the histvar historical Value-at-Risk library.
//!
//! This binary reads P&L tables from CSV files and reports historical VaR and
//! expected shortfall per column, or evaluates a single empirical quantile.

use clap::{Parser, Subcommand};
use histvar::{ColumnReport, RiskConfig, VarError, frame_report, quantile, read_csv};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "histvar")]
#[command(about = "Historical-simulation Value-at-Risk from P&L samples", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter directive, e.g. `debug` (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report VaR for each column of a CSV file of P&L or returns
    Var {
        /// CSV file with a header row
        file: PathBuf,
        /// Column to evaluate (repeatable); every numeric column by default
        #[arg(long = "column")]
        columns: Vec<String>,
        /// Confidence level (repeatable), e.g. 0.95
        #[arg(short = 'c', long = "confidence")]
        confidence_levels: Vec<f64>,
        /// TOML configuration file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Skip expected shortfall
        #[arg(long)]
        no_es: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Empirical quantile of values given on the command line
    Quantile {
        /// Probability; values outside (0, 1) clamp to min/max
        #[arg(short, long, allow_negative_numbers = true)]
        q: f64,
        /// Observations
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Var(#[from] VarError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = level.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Var {
            file,
            columns,
            confidence_levels,
            config,
            no_es,
            json,
        } => {
            let config = resolve_config(config.as_deref(), columns, confidence_levels, no_es)?;
            let reports = compute_reports(&file, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", render_reports(&reports));
            }
        }
        Commands::Quantile { q, values } => {
            println!("{}", quantile(&values, q)?);
        }
    }
    Ok(())
}

/// Merge the optional config file with command-line overrides.
fn resolve_config(
    path: Option<&Path>,
    columns: Vec<String>,
    confidence_levels: Vec<f64>,
    no_es: bool,
) -> Result<RiskConfig, VarError> {
    let mut config = match path {
        Some(path) => RiskConfig::from_file(path)?,
        None => RiskConfig::default(),
    };

    if !columns.is_empty() {
        config.columns = Some(columns);
    }
    if !confidence_levels.is_empty() {
        config.confidence_levels = confidence_levels;
    }
    if no_es {
        config.expected_shortfall = false;
    }

    config.validate()?;
    tracing::debug!(
        levels = ?config.confidence_levels,
        expected_shortfall = config.expected_shortfall,
        columns = ?config.columns,
        "resolved risk config"
    );
    Ok(config)
}

fn compute_reports(file: &Path, config: &RiskConfig) -> Result<Vec<ColumnReport>, VarError> {
    let df = read_csv(file)?;
    frame_report(
        &df,
        config.columns.as_deref(),
        &config.confidence_levels,
        config.expected_shortfall,
    )
}

/// Render reports as indented text, one block per column.
fn render_reports(reports: &[ColumnReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let mut block = format!("{}:\n", report.column);
            for estimate in &report.estimates {
                block.push_str(&format!("  {estimate}\n"));
            }
            block
        })
        .collect()
}
