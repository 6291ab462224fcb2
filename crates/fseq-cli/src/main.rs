// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fseq_cli::{DirectoryDataset, LogProgress, Settings, load_record};
use fseq_core::{Dataset, FseqError, extract};
use fseq_denoise::{LengthFilter, ModeFilter};
use fseq_events::{EventDetector, TargetLabel};
use fseq_health::{HealthCheckEngine, HealthReport, remove_problematic_records};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fseq")]
#[command(about = "Flight-telemetry run segmentation and dataset health checks")]
struct Cli {
    /// JSON settings file; missing sections keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON output here instead of stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe a dataset directory for unreadable records and run the check battery.
    Health {
        dir: PathBuf,
        /// Drop failing records from the dataset view and list what remains.
        #[arg(long)]
        remove: bool,
    },
    /// List records with more than one separated occurrence of the target phase.
    Events {
        dir: PathBuf,
        /// Fixed target label instead of sampling it from the first record.
        #[arg(long)]
        target: Option<i64>,
        #[arg(long)]
        column: Option<String>,
    },
    /// Print the run table of one record's label column.
    Runs {
        file: PathBuf,
        #[arg(long, default_value = "CL")]
        column: String,
        /// Merge runs not longer than this into their predecessor.
        #[arg(long)]
        minimum_duration: Option<usize>,
    },
    /// Denoise one record's label column.
    Denoise {
        file: PathBuf,
        #[arg(long, value_enum)]
        method: Method,
        #[arg(long, default_value = "CL")]
        column: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Mode,
    Length,
}

#[derive(Serialize)]
struct FilterOutput<'a> {
    report: &'a HealthReport,
    remaining: Vec<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

fn main() {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialize logging: {err:#}");
    }
    if let Err(err) = run(Cli::parse()) {
        emit_structured_error(&err);
        process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    let output = cli.output.as_deref();

    match cli.command {
        Command::Health { dir, remove } => handle_health(&settings, &dir, remove, output),
        Command::Events {
            dir,
            target,
            column,
        } => handle_events(settings, &dir, target, column, output),
        Command::Runs {
            file,
            column,
            minimum_duration,
        } => {
            let series = load_record(&file)?.labels(&column)?;
            write_json_output(&extract(&series, minimum_duration), output)
        }
        Command::Denoise {
            file,
            method,
            column,
        } => {
            let series = load_record(&file)?.labels(&column)?;
            let cleaned = match method {
                Method::Mode => ModeFilter::new(settings.mode_filter)?.denoise(&series)?,
                Method::Length => LengthFilter::new(settings.length_filter).denoise(&series)?,
            };
            write_json_output(&cleaned, output)
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings '{}'", path.display()))?;
    Settings::from_json(&raw)
        .with_context(|| format!("failed to load settings '{}'", path.display()))
}

fn open_dataset(dir: &Path) -> Result<DirectoryDataset> {
    DirectoryDataset::open(dir)
        .with_context(|| format!("failed to open dataset '{}'", dir.display()))
}

fn handle_health(
    settings: &Settings,
    dir: &Path,
    remove: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut dataset = open_dataset(dir)?;
    let progress = LogProgress::new("health");
    let engine = HealthCheckEngine::new(settings.health.clone())?.with_progress_sink(&progress);

    if !remove {
        let report = engine.run(&mut dataset)?;
        return write_json_output(&report, output);
    }

    let report = remove_problematic_records(&mut dataset, &engine)?;
    info!(remaining = dataset.len(), "failing records dropped");
    write_json_output(
        &FilterOutput {
            report: &report,
            remaining: dataset.record_names(),
        },
        output,
    )
}

fn handle_events(
    settings: Settings,
    dir: &Path,
    target: Option<i64>,
    column: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = settings.events;
    if let Some(target) = target {
        config.target = TargetLabel::Fixed(target);
    }
    if let Some(column) = column {
        config.column = column;
    }
    let mut dataset = open_dataset(dir)?;
    let found = EventDetector::new(config)?.detect_dataset(&mut dataset)?;
    write_json_output(&found, output)
}

fn write_json_output<T: Serialize>(payload: &T, output: Option<&Path>) -> Result<()> {
    let encoded =
        serde_json::to_string_pretty(payload).context("failed to serialize JSON output")?;
    if let Some(path) = output {
        fs::write(path, format!("{encoded}\n"))
            .with_context(|| format!("failed to write '{}'", path.display()))
    } else {
        println!("{encoded}");
        Ok(())
    }
}

fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<FseqError>())
        .map_or("runtime_error", FseqError::code)
}

fn emit_structured_error(err: &anyhow::Error) {
    let envelope = ErrorEnvelope {
        error: ErrorPayload {
            code: error_code(err).to_string(),
            message: format!("{err:#}"),
        },
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Method, error_code};
    use anyhow::Context;
    use clap::Parser;
    use fseq_core::FseqError;

    #[test]
    fn parses_denoise_subcommand() {
        let cli = Cli::try_parse_from(["fseq", "denoise", "f.json", "--method", "length"])
            .expect("arguments should parse");
        match cli.command {
            Command::Denoise { method, column, .. } => {
                assert!(matches!(method, Method::Length));
                assert_eq!(column, "CL");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_follows_subcommand() {
        let cli = Cli::try_parse_from(["fseq", "health", "data", "--remove", "--config", "s.json"])
            .expect("arguments should parse");
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("s.json")));
        assert!(matches!(cli.command, Command::Health { remove: true, .. }));
    }

    #[test]
    fn rejects_unknown_denoise_method() {
        let parsed = Cli::try_parse_from(["fseq", "denoise", "f.json", "--method", "median"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn error_code_looks_through_context() {
        let err = Err::<(), _>(FseqError::EmptyDataset)
            .context("health check failed")
            .expect_err("must be an error");
        assert_eq!(error_code(&err), "empty_dataset");
        assert_eq!(error_code(&anyhow::anyhow!("plain")), "runtime_error");
    }
}
