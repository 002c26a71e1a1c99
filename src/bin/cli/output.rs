//! Terminal Display Functions
//!
//! This module contains the functions that display a scored run in the
//! terminal with colored output and formatting. Report files are handled
//! by the library's report generator, not here.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use dagr_rs::core::config::DagrConfig;
use dagr_rs::core::scoring::{DayKind, ScoreReport};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the tool banner
pub fn print_header() {
    println!();
    println!(
        "{}",
        format!("Dagr v{VERSION} - Calendar-Day Birth Anomaly Scoring")
            .bright_cyan()
            .bold()
    );
    println!();
}

/// Print the input and model parameters this run used
pub fn print_run_info(data_file: &Path, config: &DagrConfig, report: &ScoreReport) {
    let bucketing = if config.ingest.calendar_accurate {
        "calendar-accurate"
    } else {
        "approximate (31-day months)"
    };

    println!("{} {}", "Data file:".bold(), data_file.display());
    println!("{} {}", "Day slots:".bold(), report.days.len());
    println!("{} {}", "Bucketing:".bold(), bucketing);
    println!(
        "{} {:.0} observed / {:.0} in model",
        "Births:".bold(),
        report.total_observed,
        config.population.total_births
    );
    println!();
}

/// Print the headline statistics for a scored run
pub fn print_summary(report: &ScoreReport) {
    println!(
        "{} {:.6}",
        "Chi-square statistic:".bright_cyan().bold(),
        report.chi_square
    );
    println!(
        "{} {:.6}",
        format!(
            "Critical value at {}%:",
            report.confidence_level * 100.0
        )
        .bright_cyan()
        .bold(),
        report.critical_value
    );
}

/// Print the headline statistics without decoration (quiet mode)
pub fn print_summary_plain(report: &ScoreReport) {
    println!("Chi-square statistic: {:.6}", report.chi_square);
    println!(
        "Critical value at {}%: {:.6}",
        report.confidence_level * 100.0,
        report.critical_value
    );
}

#[derive(Tabled)]
struct SignificantDayRow {
    #[tabled(rename = "Day")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "z")]
    z_score: String,
    #[tabled(rename = "z^2")]
    z_squared: String,
}

/// Print the table of days whose squared z-score exceeds the threshold
pub fn print_significant_days(report: &ScoreReport) {
    let flagged = report.significant_days();

    println!();
    if flagged.is_empty() {
        println!("{}", "No day exceeds the critical threshold.".dimmed());
        return;
    }

    println!(
        "{}",
        format!("{} day(s) exceed the critical threshold:", flagged.len())
            .bright_red()
            .bold()
    );

    let rows: Vec<SignificantDayRow> = flagged
        .iter()
        .map(|day| SignificantDayRow {
            index: day.index,
            kind: match day.kind {
                DayKind::Ordinary => "ordinary",
                DayKind::Leap => "leap",
            },
            observed: format!("{:.1}", day.observed),
            z_score: format!("{:+.3}", day.z_score),
            z_squared: format!("{:.3}", day.z_squared),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
}
