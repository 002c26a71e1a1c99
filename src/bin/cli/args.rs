//! CLI Argument Structures and Configuration
//!
//! This module contains all CLI argument definitions, command structures,
//! and configuration enums used by the dagr CLI binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dagr_rs::core::config::ReportFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Calendar-Day Birth Anomaly Scoring
#[derive(Parser)]
#[command(name = "dagr")]
#[command(version = VERSION)]
#[command(about = "Dagr - Calendar-Day Birth Anomaly Scoring")]
#[command(long_about = "
Score a flat file of daily birth counts against a fixed population model:
per-day z-scores, an aggregate chi-square statistic, and its critical
threshold at the configured confidence level.

Common Usage:

  # Score a data file with the default population model
  dagr analyze data/birthdays.dat

  # Write a machine-readable report next to the terminal summary
  dagr analyze data/birthdays.dat --out reports --format json

  # Use a custom population model
  dagr analyze data/birthdays.dat --config dagr.yml

  # Generate a starter configuration file
  dagr init-config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score a daily birth-count data file
    Analyze(Box<AnalyzeArgs>),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a dagr configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments for the `analyze` subcommand
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to the `MMDD count` data file
    pub data_file: PathBuf,

    /// Configuration file (YAML); built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format used with --out
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Directory to write a report file into (no file is written when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Suppress decorated output; print only the summary lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Use calendar-accurate day-of-year bucketing regardless of the config
    #[arg(long)]
    pub calendar_accurate: bool,
}

/// Arguments for the `init-config` subcommand
#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration file
    #[arg(short, long, default_value = "dagr.yml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `validate-config` subcommand
#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config_path: PathBuf,
}

/// Report formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON report
    Json,
    /// Human-editable YAML report
    Yaml,
}

impl OutputFormat {
    /// Map the CLI enum onto the library report format
    pub fn to_report_format(self) -> ReportFormat {
        match self {
            Self::Json => ReportFormat::Json,
            Self::Yaml => ReportFormat::Yaml,
        }
    }
}
