//! CLI: stdin JSON -> stdout JSON.
//!
//! Usage:
//!   echo '{"series":[60, 61, 100, 62, 61], "params":{"window_size":3}}' | spike-detect detect
//!   echo '{"series":[60, 61, 100, 62, 61]}' | spike-detect --threshold 5 analyze
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use spike_core::{analyze, detect, Detection, DetectorConfig, Padding, SampleDeviation};
use std::io;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "spike-detect", version, about = "Flag outliers against a sliding-median baseline")]
struct Cli {
    /// Median window width (overrides params.window_size)
    #[arg(long, global = true)]
    window_size: Option<usize>,

    /// Deviation threshold (overrides params.threshold)
    #[arg(long, global = true, allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Boundary policy for the median filter (overrides params.padding)
    #[arg(long, value_enum, global = true)]
    padding: Option<PaddingArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SPIKE_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "SPIKE_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report anomalous indices and values (default)
    Detect,
    /// Report baseline and deviation for every sample
    Analyze,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaddingArg {
    Zero,
    Edge,
}

impl From<PaddingArg> for Padding {
    fn from(arg: PaddingArg) -> Self {
        match arg {
            PaddingArg::Zero => Padding::Zero,
            PaddingArg::Edge => Padding::Edge,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesInput {
    series: Vec<f64>,
    #[serde(default)]
    params: DetectorConfig,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    samples: Vec<SampleDeviation<f64>>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{:#}", err);
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    init_logging(cli)?;

    let input: SeriesInput =
        serde_json::from_reader(io::stdin()).context("failed to parse series input")?;
    let config = resolve_config(input.params, cli);
    debug!(?config, samples = input.series.len(), "resolved detector config");

    match cli.command {
        Some(Command::Analyze) => {
            let samples = analyze(&input.series, &config)?;
            serde_json::to_writer(io::stdout(), &AnalyzeOutput { samples })?;
        }
        Some(Command::Detect) | None => {
            let detection: Detection<f64> = detect(&input.series, &config)?;
            serde_json::to_writer(io::stdout(), &detection)?;
        }
    }
    Ok(())
}

/// Defaults < JSON params < command-line flags.
fn resolve_config(mut config: DetectorConfig, cli: &Cli) -> DetectorConfig {
    if let Some(window_size) = cli.window_size {
        config.window_size = window_size;
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(padding) = cli.padding {
        config.padding = padding.into();
    }
    config
}

/// Logs go to stderr so stdout stays pure JSON.
fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .context("Invalid log level")?;
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
    }
    Ok(())
}
