//! Balance CLI - Command-line interface for Synheart Balance
//!
//! Commands:
//! - compute: Derived stats for one day record
//! - range: Range summary for a document of day records
//! - run: Process streaming NDJSON day records from stdin
//! - constants: Print the resolved unit constants for a profile
//! - validate: Report malformed records and fields without computing

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use synheart_balance::pipeline::DayProcessor;
use synheart_balance::schema::{parse_json, split_day_documents, RecordAdapter, SchemaIssue};
use synheart_balance::types::Profile;
use synheart_balance::{BALANCE_VERSION, PRODUCER_NAME};

/// Balance - Deterministic energy-balance engine
#[derive(Parser)]
#[command(name = "balance")]
#[command(author = "Synheart AI Inc")]
#[command(version = BALANCE_VERSION)]
#[command(about = "Decompose daily energy expenditure and compute net calorie balance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute derived stats for one day record
    Compute {
        /// Day record file path (use - for stdin)
        #[arg(short, long)]
        day: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Summarize a range of day records (JSON array, store dump or NDJSON)
    Range {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Process streaming NDJSON day records from stdin (streaming mode)
    Run {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Print the unit constants resolved for a profile
    Constants {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Validate day records without computing
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Profile file plus per-run constant overrides
#[derive(Args)]
struct ProfileArgs {
    /// Profile JSON file
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Walking cost override (kcal per kg per km)
    #[arg(long)]
    walk_kcal_per_kg_per_km: Option<f64>,

    /// Running cost override (kcal per kg per km)
    #[arg(long)]
    run_kcal_per_kg_per_km: Option<f64>,

    /// Step cost override (kcal per step per kg)
    #[arg(long)]
    step_kcal_const: Option<f64>,

    /// Thermic effect of food ratio override
    #[arg(long)]
    tef_ratio: Option<f64>,
}

impl ProfileArgs {
    /// Load the profile file and layer the flag overrides on top
    fn load(&self) -> Result<Profile, BalanceCliError> {
        let mut profile = match &self.profile {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                synheart_balance::schema::parse_profile(&parse_json(&text)?)
            }
            None => Profile::default(),
        };

        if self.walk_kcal_per_kg_per_km.is_some() {
            profile.walk_kcal_per_kg_per_km = self.walk_kcal_per_kg_per_km;
        }
        if self.run_kcal_per_kg_per_km.is_some() {
            profile.run_kcal_per_kg_per_km = self.run_kcal_per_kg_per_km;
        }
        if self.step_kcal_const.is_some() {
            profile.step_kcal_const = self.step_kcal_const;
        }
        if self.tef_ratio.is_some() {
            profile.default_tef_ratio = self.tef_ratio;
        }

        if profile.bmr.is_none() {
            tracing::info!("profile has no BMR; expenditure will be reported as zero");
        }
        Ok(profile)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Single-line JSON
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("failed to initialize logging: {e}");
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Directive used when `RUST_LOG` is unset
const DEFAULT_LOG_DIRECTIVE: &str = "synheart_balance=info";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Log to stderr so stdout carries only JSON output
fn init_logging() -> Result<(), BoxError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref())?)
        .with_writer(io::stderr)
        .try_init()?;
    Ok(())
}

/// `RUST_LOG` when set, else the default directive
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter, BoxError> {
    let directives = match rust_log {
        Some(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_LOG_DIRECTIVE,
    };
    Ok(EnvFilter::try_new(directives)?)
}

fn run(cli: Cli) -> Result<(), BalanceCliError> {
    match cli.command {
        Commands::Compute {
            day,
            output,
            output_format,
            profile,
        } => cmd_compute(&day, &output, output_format, &profile),

        Commands::Range {
            input,
            output,
            output_format,
            profile,
        } => cmd_range(&input, &output, output_format, &profile),

        Commands::Run { profile, flush } => cmd_run(&profile, flush),

        Commands::Constants { profile } => cmd_constants(&profile),

        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn cmd_compute(
    day: &Path,
    output: &Path,
    output_format: OutputFormat,
    profile: &ProfileArgs,
) -> Result<(), BalanceCliError> {
    let processor = DayProcessor::new(profile.load()?);

    let input_data = read_input(day)?;
    let value = parse_json(&input_data)?;
    if value.is_null() {
        return Err(BalanceCliError::NoDays);
    }

    let record = RecordAdapter::new().parse_day_record(&value);
    let derived = processor.process(&record);

    write_output(output, &format_output(&derived, &output_format)?)
}

fn cmd_range(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
    profile: &ProfileArgs,
) -> Result<(), BalanceCliError> {
    let processor = DayProcessor::new(profile.load()?);

    let input_data = read_input(input)?;
    let values = split_day_documents(&input_data)?;
    if values.is_empty() {
        return Err(BalanceCliError::NoDays);
    }

    let mut adapter = RecordAdapter::new();
    let days: Vec<_> = values.iter().map(|v| adapter.parse_day_record(v)).collect();
    if !adapter.issues().is_empty() {
        tracing::info!(issues = adapter.issues().len(), "some input values were ignored");
    }

    let summary = processor.process_range(&days);

    write_output(output, &format_output(&summary, &output_format)?)
}

fn cmd_run(profile: &ProfileArgs, flush: bool) -> Result<(), BalanceCliError> {
    let processor = DayProcessor::new(profile.load()?);

    let stdin = io::stdin();
    if atty::is(atty::Stream::Stdin) {
        tracing::warn!("reading day records from an interactive terminal (end input with Ctrl-D)");
    }

    let mut stdout = io::stdout();
    let mut processed = 0usize;

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let value = parse_json(trimmed).map_err(|e| {
            BalanceCliError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;

        let record = RecordAdapter::new().parse_day_record(&value);
        let derived = processor.process(&record);

        writeln!(stdout, "{}", serde_json::to_string(&derived)?)?;
        if flush {
            stdout.flush()?;
        }
        processed += 1;
    }

    stdout.flush()?;
    tracing::info!(days = processed, "stream finished");

    Ok(())
}

fn cmd_constants(profile: &ProfileArgs) -> Result<(), BalanceCliError> {
    let processor = DayProcessor::new(profile.load()?);

    let report = ConstantsReport {
        producer: PRODUCER_NAME.to_string(),
        version: BALANCE_VERSION.to_string(),
        constants: *processor.constants(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), BalanceCliError> {
    let input_data = read_input(input)?;
    let values = split_day_documents(&input_data)?;

    let mut records: Vec<RecordIssues> = Vec::new();
    for (index, value) in values.iter().enumerate() {
        let mut adapter = RecordAdapter::new();
        let record = adapter.parse_day_record(value);
        let issues = adapter.into_issues();
        if !issues.is_empty() {
            records.push(RecordIssues {
                index,
                date: record.date.map(|d| d.format("%Y-%m-%d").to_string()),
                issues,
            });
        }
    }

    let report = ValidationReport {
        total_records: values.len(),
        clean_records: values.len() - records.len(),
        records_with_issues: records.len(),
        records,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:       {}", report.total_records);
        println!("Clean records:       {}", report.clean_records);
        println!("Records with issues: {}", report.records_with_issues);

        if !report.records.is_empty() {
            println!("\nIssues:");
            for record in &report.records {
                for issue in &record.issues {
                    println!(
                        "  - Day {} (index {}) {}: {}",
                        record.date.as_deref().unwrap_or("undated"),
                        record.index,
                        issue.path,
                        issue.message
                    );
                }
            }
        }
    }

    if report.records_with_issues > 0 {
        Err(BalanceCliError::ValidationFailed(report.records_with_issues))
    } else {
        Ok(())
    }
}

fn read_input(path: &Path) -> Result<String, BalanceCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, data: &str) -> Result<(), BalanceCliError> {
    if path.to_string_lossy() == "-" {
        print!("{}", data);
        io::stdout().flush()?;
    } else {
        fs::write(path, data)?;
    }
    Ok(())
}

fn format_output<T: Serialize>(value: &T, format: &OutputFormat) -> Result<String, BalanceCliError> {
    let mut output = match format {
        OutputFormat::Ndjson | OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
    };
    output.push('\n');
    Ok(output)
}

// Error types

#[derive(Debug)]
enum BalanceCliError {
    Io(io::Error),
    Compute(synheart_balance::ComputeError),
    Json(serde_json::Error),
    NoDays,
    ValidationFailed(usize),
    ParseError(String),
}

impl From<io::Error> for BalanceCliError {
    fn from(e: io::Error) -> Self {
        BalanceCliError::Io(e)
    }
}

impl From<synheart_balance::ComputeError> for BalanceCliError {
    fn from(e: synheart_balance::ComputeError) -> Self {
        BalanceCliError::Compute(e)
    }
}

impl From<serde_json::Error> for BalanceCliError {
    fn from(e: serde_json::Error) -> Self {
        BalanceCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BalanceCliError> for CliError {
    fn from(e: BalanceCliError) -> Self {
        match e {
            BalanceCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            BalanceCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input is a day record or a list of day records".to_string()),
            },
            BalanceCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            BalanceCliError::NoDays => CliError {
                code: "NO_DAYS".to_string(),
                message: "No day records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            BalanceCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records contain malformed values", count),
                hint: Some("Malformed values are ignored when computing; fix them and retry".to_string()),
            },
            BalanceCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Each line must be one JSON day record".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct ConstantsReport {
    producer: String,
    version: String,
    constants: synheart_balance::UnitConstants,
}

#[derive(Serialize)]
struct ValidationReport {
    total_records: usize,
    clean_records: usize,
    records_with_issues: usize,
    records: Vec<RecordIssues>,
}

#[derive(Serialize)]
struct RecordIssues {
    index: usize,
    date: Option<String>,
    issues: Vec<SchemaIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_when_unset() {
        assert_eq!(log_filter(None).unwrap().to_string(), DEFAULT_LOG_DIRECTIVE);
        assert_eq!(log_filter(Some("  ")).unwrap().to_string(), DEFAULT_LOG_DIRECTIVE);
    }

    #[test]
    fn test_rust_log_replaces_default() {
        let filter = log_filter(Some("synheart_balance=debug")).unwrap().to_string();
        assert_eq!(filter, "synheart_balance=debug");
    }

    #[test]
    fn test_invalid_rust_log_is_an_error() {
        assert!(log_filter(Some("synheart_balance=verbose")).is_err());
    }

    #[test]
    fn test_second_init_reports_error() {
        let _ = init_logging();
        assert!(init_logging().is_err());
    }
}
