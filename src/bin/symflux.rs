//! symflux - Command-line interface for Symptom Flux
//!
//! Commands:
//! - summary: Load raw entries and print the dashboard report
//! - series: Load raw entries and print a single-symptom or overview chart
//! - phase: Resolve a cycle-day label to its phase
//! - validate: Check raw entry records without loading them
//! - cycle-days: List the cycle-day vocabulary with phases

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use symptom_flux::cycle::{cycle_day_options, resolve_phase};
use symptom_flux::encoder::ReportEncoder;
use symptom_flux::normalizer::{
    parse_array, parse_ndjson, validate_array, validate_ndjson, RawEntry, RecordIssue,
};
use symptom_flux::series::windowed_chart;
use symptom_flux::{SymptomKey, TrackerConfig, TrackerError, TrackerSession, TRACKER_VERSION};

/// symflux - Cycle-aware symptom averages and chart series
#[derive(Parser)]
#[command(name = "symflux")]
#[command(author = "Synheart AI Inc")]
#[command(version = TRACKER_VERSION)]
#[command(about = "Summarize and chart daily symptom logs by cycle phase", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard report for a set of raw entries
    Summary {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Date for entries that carry none (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Print chart points for one symptom, or for all symptoms when none is given
    Series {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Symptom to chart (acne, moonFace, bloating, stress, eczema, fatigue)
        #[arg(short, long)]
        symptom: Option<String>,

        /// Number of most-recent entries to include (overrides configuration)
        #[arg(long)]
        window: Option<usize>,

        /// Date for entries that carry none (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Resolve a cycle-day label such as "Day 9" or "Break Day 2"
    Phase {
        /// Cycle-day label
        label: String,
    },

    /// Validate raw entry records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the cycle-day vocabulary and the phase of each day
    CycleDays {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one entry per line)
    Ndjson,
    /// JSON array of entries
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SymfluxCliError> {
    let config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    init_logging(&config.log_level);
    debug!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Summary {
            input,
            input_format,
            date,
            pretty,
        } => cmd_summary(config, &input, input_format, date, pretty),

        Commands::Series {
            input,
            input_format,
            symptom,
            window,
            date,
            pretty,
        } => cmd_series(
            config,
            &input,
            input_format,
            symptom.as_deref(),
            window,
            date,
            pretty,
        ),

        Commands::Phase { label } => {
            println!("{}", resolve_phase(&label));
            Ok(())
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::CycleDays { json } => cmd_cycle_days(json),
    }
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over the
/// configured level.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn cmd_summary(
    config: TrackerConfig,
    input: &Path,
    input_format: InputFormat,
    date: Option<NaiveDate>,
    pretty: bool,
) -> Result<(), SymfluxCliError> {
    let session = load_session(config, input, input_format, date)?;
    let report = ReportEncoder::new().encode(session.dashboard());
    print_json(&report, pretty)
}

fn cmd_series(
    config: TrackerConfig,
    input: &Path,
    input_format: InputFormat,
    symptom: Option<&str>,
    window: Option<usize>,
    date: Option<NaiveDate>,
    pretty: bool,
) -> Result<(), SymfluxCliError> {
    let keys: Vec<SymptomKey> = match symptom {
        Some(name) => vec![name.parse()?],
        None => SymptomKey::ALL.to_vec(),
    };
    let window_size = window.unwrap_or(if symptom.is_some() {
        config.series.symptom_window
    } else {
        config.series.overview_window
    });

    let session = load_session(config, input, input_format, date)?;
    let chart = windowed_chart(session.store(), &keys, window_size);
    info!(points = chart.len(), window_size, "chart built");

    let report = ReportEncoder::new().encode(chart);
    print_json(&report, pretty)
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), SymfluxCliError> {
    let input_data = read_input(input)?;
    let report = validation_report(&input_data, &input_format);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}: {}", err.location, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(SymfluxCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_cycle_days(json: bool) -> Result<(), SymfluxCliError> {
    let days: Vec<CycleDayRow> = cycle_day_options()
        .into_iter()
        .map(|label| {
            let phase = resolve_phase(&label).to_string();
            CycleDayRow { label, phase }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        for day in &days {
            println!("{:<12} {}", day.label, day.phase);
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, SymfluxCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_records(data: &str, format: &InputFormat) -> Result<Vec<RawEntry>, TrackerError> {
    match format {
        InputFormat::Ndjson => parse_ndjson(data),
        InputFormat::Json => parse_array(data),
    }
}

fn validation_report(data: &str, format: &InputFormat) -> ValidationReport {
    let (total, issues) = match format {
        InputFormat::Ndjson => validate_ndjson(data),
        InputFormat::Json => validate_array(data),
    };

    ValidationReport {
        total_records: total,
        valid_records: total.saturating_sub(issues.len()),
        invalid_records: issues.len(),
        errors: issues,
    }
}

fn load_session(
    config: TrackerConfig,
    input: &Path,
    input_format: InputFormat,
    date: Option<NaiveDate>,
) -> Result<TrackerSession, SymfluxCliError> {
    let input_data = read_input(input)?;
    let raws = parse_records(&input_data, &input_format)?;

    if raws.is_empty() {
        warn!("input holds no entries");
    }

    let capture_date = date.unwrap_or_else(|| Local::now().date_naive());
    let mut session = TrackerSession::with_config(config);
    let logged = session.log_all(raws, capture_date);
    info!(entries = logged, "entries loaded");

    Ok(session)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), SymfluxCliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

// Error types

#[derive(Debug)]
enum SymfluxCliError {
    Io(io::Error),
    Tracker(TrackerError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for SymfluxCliError {
    fn from(e: io::Error) -> Self {
        SymfluxCliError::Io(e)
    }
}

impl From<TrackerError> for SymfluxCliError {
    fn from(e: TrackerError) -> Self {
        SymfluxCliError::Tracker(e)
    }
}

impl From<serde_json::Error> for SymfluxCliError {
    fn from(e: serde_json::Error) -> Self {
        SymfluxCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SymfluxCliError> for CliError {
    fn from(e: SymfluxCliError) -> Self {
        match e {
            SymfluxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SymfluxCliError::Tracker(e) => {
                let hint = match &e {
                    TrackerError::UnknownSymptom(_) => {
                        "Use one of: acne, moonFace, bloating, stress, eczema, fatigue"
                    }
                    TrackerError::ConfigError(_) => "Check the TOML configuration file",
                    _ => "Run 'symflux validate' for details",
                };
                CliError {
                    code: "TRACKER_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            SymfluxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SymfluxCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<RecordIssue>,
}

#[derive(serde::Serialize)]
struct CycleDayRow {
    label: String,
    phase: String,
}
