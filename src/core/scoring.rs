//! Per-day anomaly scoring against a fixed population model.
//!
//! The scorer ingests an ordered sequence of observed calendar-day counts and
//! produces, in a single pass, a z-score and squared z-score per day, a
//! per-day significance flag, and the aggregate chi-square statistic with its
//! critical threshold. The computation is pure: identical inputs and
//! parameters yield bit-for-bit identical results.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

use crate::core::config::{DagrConfig, DayParams, PopulationConfig};
use crate::core::errors::{DagrError, Result};

/// Classification of a calendar-day slot.
///
/// Exactly one index in the population model (Feb 29 in the default model)
/// is scored with the leap parameters; every other index is ordinary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    /// A regular calendar day
    Ordinary,
    /// The leap-day slot
    Leap,
}

/// Scored record for a single calendar-day slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    /// Day index in `0..total_days`
    pub index: usize,
    /// Day classification used for parameter selection
    pub kind: DayKind,
    /// Observed count for this slot
    pub observed: f64,
    /// Expected count under the population model
    pub expected: f64,
    /// Standard deviation under the population model
    pub sigma: f64,
    /// (observed - expected) / sigma
    pub z_score: f64,
    /// Squared z-score
    pub z_squared: f64,
    /// Whether the squared z-score exceeds the critical threshold
    pub significant: bool,
}

/// Complete result of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// One record per calendar-day slot, in index order
    pub days: Vec<DayScore>,
    /// Sum of all squared z-scores
    pub chi_square: f64,
    /// Chi-square quantile at the configured confidence level
    pub critical_value: f64,
    /// Confidence level the critical value was computed at
    pub confidence_level: f64,
    /// Degrees of freedom used for the critical value
    pub degrees_of_freedom: usize,
    /// Sum of all observed counts
    pub total_observed: f64,
}

impl ScoreReport {
    /// Per-day z-scores in index order
    pub fn z_scores(&self) -> Vec<f64> {
        self.days.iter().map(|day| day.z_score).collect()
    }

    /// Per-day squared z-scores in index order
    pub fn z_squared(&self) -> Vec<f64> {
        self.days.iter().map(|day| day.z_squared).collect()
    }

    /// Per-day significance flags in index order
    pub fn significance_flags(&self) -> Vec<bool> {
        self.days.iter().map(|day| day.significant).collect()
    }

    /// The flagged days, in index order
    pub fn significant_days(&self) -> Vec<&DayScore> {
        self.days.iter().filter(|day| day.significant).collect()
    }
}

/// Scorer holding an immutable population model and a precomputed
/// critical threshold.
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    population: PopulationConfig,
    confidence_level: f64,
    critical_value: f64,
}

impl AnomalyScorer {
    /// Build a scorer from a validated configuration.
    ///
    /// Fails with a configuration error when the model parameters are
    /// unusable (non-positive variance, out-of-range confidence level,
    /// leap index outside the day range).
    pub fn new(config: &DagrConfig) -> Result<Self> {
        config.validate()?;
        Self::from_parts(
            config.population.clone(),
            config.scoring.confidence_level,
        )
    }

    /// Build a scorer directly from a population model and confidence level
    pub fn from_parts(population: PopulationConfig, confidence_level: f64) -> Result<Self> {
        population.validate()?;

        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(DagrError::config_field(
                format!(
                    "confidence_level must be strictly between 0.0 and 1.0, got {confidence_level}"
                ),
                "scoring.confidence_level",
            ));
        }

        for (kind, params) in [
            (DayKind::Ordinary, population.ordinary),
            (DayKind::Leap, population.leap),
        ] {
            let sigma = params.sigma(population.total_days);
            if !(sigma > 0.0 && sigma.is_finite()) {
                return Err(DagrError::config(format!(
                    "sigma for {kind:?} days is {sigma}; variance parameters are misconfigured"
                )));
            }
        }

        let critical_value =
            chi_square_quantile(confidence_level, population.degrees_of_freedom())?;

        Ok(Self {
            population,
            confidence_level,
            critical_value,
        })
    }

    /// The critical threshold this scorer flags against
    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// The population model this scorer was built with
    pub fn population(&self) -> &PopulationConfig {
        &self.population
    }

    /// Score an ordered sequence of observed daily counts.
    ///
    /// `counts` must contain exactly `total_days` non-negative finite
    /// entries, indexed by day-of-year slot. All input validation happens
    /// before any per-day record is produced.
    pub fn score_days(&self, counts: &[f64]) -> Result<ScoreReport> {
        let total_days = self.population.total_days;

        if counts.len() != total_days {
            return Err(DagrError::validation_mismatch(
                "counts must contain exactly one entry per calendar-day slot",
                total_days.to_string(),
                counts.len().to_string(),
            ));
        }

        for (index, &count) in counts.iter().enumerate() {
            if !count.is_finite() || count < 0.0 {
                return Err(DagrError::Validation {
                    message: format!("count for day {index} must be a non-negative number"),
                    field: Some(format!("counts[{index}]")),
                    expected: Some(">= 0".to_string()),
                    actual: Some(count.to_string()),
                });
            }
        }

        let derived = |params: DayParams| {
            (
                params.expected_count(total_days),
                params.sigma(total_days),
            )
        };
        let (ordinary_expected, ordinary_sigma) = derived(self.population.ordinary);
        let (leap_expected, leap_sigma) = derived(self.population.leap);

        let mut days = Vec::with_capacity(total_days);
        for (index, &observed) in counts.iter().enumerate() {
            let kind = self.population.kind_of(index);
            let (expected, sigma) = match kind {
                DayKind::Ordinary => (ordinary_expected, ordinary_sigma),
                DayKind::Leap => (leap_expected, leap_sigma),
            };

            let z_score = (observed - expected) / sigma;
            let z_squared = z_score * z_score;

            days.push(DayScore {
                index,
                kind,
                observed,
                expected,
                sigma,
                z_score,
                z_squared,
                significant: z_squared > self.critical_value,
            });
        }

        let chi_square: f64 = days.iter().map(|day| day.z_squared).sum();
        let total_observed: f64 = counts.iter().sum();

        debug!(
            chi_square,
            critical_value = self.critical_value,
            flagged = days.iter().filter(|day| day.significant).count(),
            "scored {} calendar-day slots",
            days.len()
        );

        Ok(ScoreReport {
            days,
            chi_square,
            critical_value: self.critical_value,
            confidence_level: self.confidence_level,
            degrees_of_freedom: self.population.degrees_of_freedom(),
            total_observed,
        })
    }
}

/// Inverse chi-square CDF at the given probability and degrees of freedom
fn chi_square_quantile(probability: f64, degrees_of_freedom: usize) -> Result<f64> {
    let distribution = ChiSquared::new(degrees_of_freedom as f64).map_err(|e| {
        DagrError::math_with_context(
            format!("invalid chi-square distribution: {e}"),
            format!("degrees_of_freedom = {degrees_of_freedom}"),
        )
    })?;

    let quantile = distribution.inverse_cdf(probability);
    if !quantile.is_finite() {
        return Err(DagrError::math_with_context(
            format!("chi-square quantile at {probability} is not finite"),
            format!("degrees_of_freedom = {degrees_of_freedom}"),
        ));
    }

    Ok(quantile)
}
