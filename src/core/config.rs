//! Configuration types and management for dagr-rs.
//!
//! This module provides the configuration structures for the scoring pipeline.
//! The population model is an explicit immutable value passed into the scorer;
//! there are no process-wide singletons and no mutable defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DagrError, Result};
use crate::core::scoring::DayKind;

/// Main configuration for the dagr analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagrConfig {
    /// Population model parameters
    pub population: PopulationConfig,

    /// Scoring and significance settings
    pub scoring: ScoringConfig,

    /// Flat-file ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Default for DagrConfig {
    fn default() -> Self {
        Self::new_with_defaults()
    }
}

impl DagrConfig {
    /// Construct a configuration using the canonical default values used across
    /// the CLI and library layers. Keeping this in one place prevents the two
    /// surfaces from drifting apart.
    pub(crate) fn new_with_defaults() -> Self {
        Self {
            population: PopulationConfig::default(),
            scoring: ScoringConfig::default(),
            ingest: IngestConfig::default(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DagrError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            DagrError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Set the confidence level used for the critical threshold
    #[must_use]
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.scoring.confidence_level = confidence_level;
        self
    }

    /// Enable or disable calendar-accurate day-of-year bucketing
    #[must_use]
    pub fn with_calendar_accurate(mut self, calendar_accurate: bool) -> Self {
        self.ingest.calendar_accurate = calendar_accurate;
        self
    }

    /// Validate every configuration section
    pub fn validate(&self) -> Result<()> {
        self.population.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}

/// Fixed population parameters for the expected-count model.
///
/// The defaults reproduce the reference dataset model: 366 calendar-day slots
/// (including the leap-day slot), 480040 known births, and separate
/// (mean, variance) pairs for ordinary days and for Feb 29.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of calendar-day slots, including the leap day
    pub total_days: usize,

    /// Total known births in the population
    pub total_births: f64,

    /// Index of the slot scored with the leap-day parameters
    pub leap_day_index: usize,

    /// Mean/variance pair for ordinary days
    pub ordinary: DayParams,

    /// Mean/variance pair for the leap day
    pub leap: DayParams,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            total_days: 366,
            total_births: 480_040.0,
            leap_day_index: 59,
            ordinary: DayParams {
                mean: 1314.28,
                variance: 1313.41,
            },
            leap: DayParams {
                mean: 328.57,
                variance: 329.03,
            },
        }
    }
}

impl PopulationConfig {
    /// Classify a day index. Exactly one index maps to [`DayKind::Leap`].
    pub fn kind_of(&self, index: usize) -> DayKind {
        if index == self.leap_day_index {
            DayKind::Leap
        } else {
            DayKind::Ordinary
        }
    }

    /// Look up the (mean, variance) pair for a day kind
    pub fn params_for(&self, kind: DayKind) -> DayParams {
        match kind {
            DayKind::Ordinary => self.ordinary,
            DayKind::Leap => self.leap,
        }
    }

    /// Look up the (mean, variance) pair for a day index
    pub fn params_for_day(&self, index: usize) -> DayParams {
        self.params_for(self.kind_of(index))
    }

    /// Degrees of freedom for the aggregate chi-square statistic
    pub fn degrees_of_freedom(&self) -> usize {
        self.total_days - 1
    }

    /// Validate the population model
    pub fn validate(&self) -> Result<()> {
        if self.total_days < 2 {
            return Err(DagrError::config_field(
                format!("total_days must be at least 2, got {}", self.total_days),
                "population.total_days",
            ));
        }

        if self.leap_day_index >= self.total_days {
            return Err(DagrError::config_field(
                format!(
                    "leap_day_index must be below total_days ({}), got {}",
                    self.total_days, self.leap_day_index
                ),
                "population.leap_day_index",
            ));
        }

        if self.total_births <= 0.0 || !self.total_births.is_finite() {
            return Err(DagrError::config_field(
                format!("total_births must be positive, got {}", self.total_births),
                "population.total_births",
            ));
        }

        self.ordinary.validate("population.ordinary")?;
        self.leap.validate("population.leap")?;

        Ok(())
    }
}

/// A (mean, variance) pair for one day kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayParams {
    /// Expected mean for this day kind
    pub mean: f64,

    /// Expected variance for this day kind
    pub variance: f64,
}

impl DayParams {
    /// Expected count for a single day slot
    pub fn expected_count(&self, total_days: usize) -> f64 {
        self.mean / total_days as f64
    }

    /// Standard deviation for a single day slot
    pub fn sigma(&self, total_days: usize) -> f64 {
        (self.variance / total_days as f64).sqrt()
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.mean <= 0.0 || !self.mean.is_finite() {
            return Err(DagrError::config_field(
                format!("mean must be positive, got {}", self.mean),
                format!("{field}.mean"),
            ));
        }

        // A zero variance would yield a zero sigma and an undefined z-score.
        if self.variance <= 0.0 || !self.variance.is_finite() {
            return Err(DagrError::config_field(
                format!("variance must be positive, got {}", self.variance),
                format!("{field}.variance"),
            ));
        }

        Ok(())
    }
}

/// Significance settings for the scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Confidence level for the chi-square critical threshold
    pub confidence_level: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.999,
        }
    }
}

impl ScoringConfig {
    /// Validate the scoring settings
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(DagrError::config_field(
                format!(
                    "confidence_level must be strictly between 0.0 and 1.0, got {}",
                    self.confidence_level
                ),
                "scoring.confidence_level",
            ));
        }
        Ok(())
    }
}

/// Flat-file ingestion settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Use calendar-accurate day-of-year bucketing instead of the
    /// original `(month-1)*31 + day` approximation
    #[serde(default)]
    pub calendar_accurate: bool,
}

/// Output formats for generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Machine-readable JSON report
    Json,
    /// Human-editable YAML report
    Yaml,
}

impl ReportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = DagrConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_population_constants() {
        let population = PopulationConfig::default();
        assert_eq!(population.total_days, 366);
        assert_eq!(population.leap_day_index, 59);
        assert_eq!(population.ordinary.mean, 1314.28);
        assert_eq!(population.ordinary.variance, 1313.41);
        assert_eq!(population.leap.mean, 328.57);
        assert_eq!(population.leap.variance, 329.03);
        assert_eq!(population.degrees_of_freedom(), 365);
    }

    #[test]
    fn test_day_kind_selector() {
        let population = PopulationConfig::default();

        assert_eq!(population.kind_of(59), DayKind::Leap);
        for index in (0..366).filter(|&i| i != 59) {
            assert_eq!(population.kind_of(index), DayKind::Ordinary);
        }

        let leap = population.params_for(DayKind::Leap);
        assert_eq!(leap.mean, population.leap.mean);
        assert_eq!(population.params_for_day(59), leap);
    }

    #[test]
    fn test_zero_variance_rejected() {
        let mut config = DagrConfig::default();
        config.population.ordinary.variance = 0.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DagrError::Config { .. }));
    }

    #[test]
    fn test_confidence_level_bounds() {
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let config = DagrConfig::default().with_confidence_level(bad);
            assert!(config.validate().is_err(), "accepted {bad}");
        }

        let config = DagrConfig::default().with_confidence_level(0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_leap_index_out_of_range_rejected() {
        let mut config = DagrConfig::default();
        config.population.leap_day_index = 366;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_day_params_derivations() {
        let params = DayParams {
            mean: 1314.28,
            variance: 1313.41,
        };

        assert_eq!(params.expected_count(366), 1314.28 / 366.0);
        assert_eq!(params.sigma(366), (1313.41_f64 / 366.0).sqrt());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dagr.yml");

        let config = DagrConfig::default()
            .with_confidence_level(0.99)
            .with_calendar_accurate(true);
        config.to_yaml_file(&path).unwrap();

        let loaded = DagrConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_ingest_section_defaults() {
        let yaml = r#"
population:
  total_days: 366
  total_births: 480040.0
  leap_day_index: 59
  ordinary:
    mean: 1314.28
    variance: 1313.41
  leap:
    mean: 328.57
    variance: 329.03
scoring:
  confidence_level: 0.999
"#;

        let config: DagrConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.ingest.calendar_accurate);
        assert!(config.validate().is_ok());
    }
}
