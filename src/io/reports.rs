//! Report generation for scored runs.
//!
//! Renders a [`ScoreReport`] together with the configuration that produced it
//! as a JSON or YAML document, for downstream consumers (plotting, archival,
//! CI checks). Terminal display lives in the CLI layer, not here.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::core::config::{DagrConfig, ReportFormat};
use crate::core::errors::{DagrError, Result};
use crate::core::scoring::{DayScore, ScoreReport};

/// Serialized report envelope
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    tool_version: &'static str,
    config: &'a DagrConfig,
    summary: ReportSummary,
    days: &'a [DayScore],
}

/// Aggregate figures duplicated at the top of the document so consumers
/// do not need to re-derive them from the per-day records
#[derive(Debug, Serialize)]
struct ReportSummary {
    chi_square: f64,
    critical_value: f64,
    confidence_level: f64,
    degrees_of_freedom: usize,
    total_observed: f64,
    model_total_births: f64,
    significant_day_count: usize,
}

/// Writes scored runs to disk in the configured formats
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    config: DagrConfig,
}

impl ReportGenerator {
    /// Create a generator that echoes `config` into every document
    pub fn new(config: DagrConfig) -> Self {
        Self { config }
    }

    /// Render a scored run as a string in the requested format
    pub fn render(&self, report: &ScoreReport, format: ReportFormat) -> Result<String> {
        let document = ReportDocument {
            generated_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION"),
            config: &self.config,
            summary: ReportSummary {
                chi_square: report.chi_square,
                critical_value: report.critical_value,
                confidence_level: report.confidence_level,
                degrees_of_freedom: report.degrees_of_freedom,
                total_observed: report.total_observed,
                model_total_births: self.config.population.total_births,
                significant_day_count: report.significant_days().len(),
            },
            days: &report.days,
        };

        match format {
            ReportFormat::Json => serde_json::to_string_pretty(&document).map_err(Into::into),
            ReportFormat::Yaml => serde_yaml::to_string(&document).map_err(Into::into),
        }
    }

    /// Write a scored run into `output_dir`, returning the report path
    pub fn write_report(
        &self,
        report: &ScoreReport,
        output_dir: impl AsRef<Path>,
        format: ReportFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|e| {
            DagrError::io(
                format!("Failed to create output directory: {}", output_dir.display()),
                e,
            )
        })?;

        let path = output_dir.join(format!("dagr-report.{}", format.extension()));
        let content = self.render(report, format)?;
        fs::write(&path, content).map_err(|e| {
            DagrError::io(format!("Failed to write report: {}", path.display()), e)
        })?;

        Ok(path)
    }
}
