//! Command Execution Logic
//!
//! This module contains the command implementations: the analyze pipeline
//! (ingest, score, display, report) and the configuration utilities.

use std::path::Path;

use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use tracing::info;

use dagr_rs::core::config::DagrConfig;
use dagr_rs::core::scoring::AnomalyScorer;
use dagr_rs::io::ingest;
use dagr_rs::io::reports::ReportGenerator;

use crate::cli::args::{AnalyzeArgs, InitConfigArgs, ValidateConfigArgs};
use crate::cli::output;

/// Run the full scoring pipeline on one data file.
///
/// When scoring fails, no summary or report is rendered; the error names the
/// violated precondition and the process exits nonzero.
pub fn analyze_command(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref())?;
    if args.calendar_accurate {
        config.ingest.calendar_accurate = true;
    }

    let scorer = AnomalyScorer::new(&config).context("refusing to score: invalid configuration")?;

    let counts = ingest::load_counts(&args.data_file, &config)
        .with_context(|| format!("failed to ingest {}", args.data_file.display()))?;

    let report = scorer
        .score_days(counts.as_slice())
        .context("scoring failed; no results were rendered")?;

    if args.quiet {
        output::print_summary_plain(&report);
    } else {
        output::print_header();
        output::print_run_info(&args.data_file, &config, &report);
        output::print_summary(&report);
        output::print_significant_days(&report);
    }

    if let Some(out_dir) = &args.out {
        let generator = ReportGenerator::new(config);
        let path = generator.write_report(&report, out_dir, args.format.to_report_format())?;
        info!("report written to {}", path.display());
        if !args.quiet {
            println!();
            println!("{} {}", "Report written to".dimmed(), path.display());
        }
    }

    Ok(())
}

/// Load a configuration file, or fall back to the built-in defaults
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<DagrConfig> {
    let config = match path {
        Some(path) => DagrConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DagrConfig::default(),
    };

    config.validate().context("configuration is invalid")?;
    Ok(config)
}

/// Print the default configuration as YAML
pub fn print_default_config() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&DagrConfig::default())?);
    Ok(())
}

/// Write a starter configuration file
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    DagrConfig::default().to_yaml_file(&args.output)?;
    println!(
        "{} Wrote default configuration to {}",
        "✓".green().bold(),
        args.output.display()
    );
    Ok(())
}

/// Load and validate a configuration file, reporting the outcome
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    let config = DagrConfig::from_yaml_file(&args.config_path)
        .with_context(|| format!("failed to load {}", args.config_path.display()))?;
    config.validate().context("configuration is invalid")?;

    println!(
        "{} {} is valid",
        "✓".green().bold(),
        args.config_path.display()
    );
    Ok(())
}
