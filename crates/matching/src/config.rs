use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::similarity::DEFAULT_AMOUNT_TOLERANCE;

pub const AMOUNT_WEIGHT: f64 = 0.40;
pub const DATE_WEIGHT: f64 = 0.30;
pub const TEXT_WEIGHT: f64 = 0.30;

/// A pair must score strictly above this to be reported as a match.
pub const MIN_CONFIDENCE: f64 = 0.5;
/// Dates further apart than this earn no date credit.
pub const DATE_WINDOW_DAYS: u32 = 3;
/// Amount similarity above this earns the `amount_close` factor.
pub const AMOUNT_CLOSE_THRESHOLD: f64 = 0.5;
pub const MERCHANT_HIGH_THRESHOLD: f64 = 0.7;
pub const MERCHANT_MEDIUM_THRESHOLD: f64 = 0.4;
/// Matches above this are flagged as strong in the report.
pub const HIGH_CONFIDENCE: f64 = 0.8;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("Weight '{0}' must be within [0, 1], got {1}")]
    WeightOutOfRange(&'static str, f64),
    #[error("Weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("'{0}' must be within [0, 1], got {1}")]
    OutOfRange(&'static str, f64),
}

/// How the per-term scores are combined into a confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub amount: f64,
    pub date: f64,
    pub text: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            amount: AMOUNT_WEIGHT,
            date: DATE_WEIGHT,
            text: TEXT_WEIGHT,
        }
    }
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.amount + self.date + self.text
    }
}

/// What to do when one transaction is the best candidate for several receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Every receipt independently takes its best transaction; a transaction
    /// may back more than one match.
    #[default]
    Greedy,
    /// Each transaction backs at most one match. Pairs are accepted in
    /// descending confidence order, so this is one-to-one but not a global
    /// maximum-weight assignment.
    Exclusive,
}

impl std::str::FromStr for AssignmentStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(AssignmentStrategy::Greedy),
            "exclusive" => Ok(AssignmentStrategy::Exclusive),
            other => Err(format!("Unknown assignment strategy: '{other}'")),
        }
    }
}

/// Tunable constants for one reconciliation run. Missing keys in a TOML
/// file fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub min_confidence: f64,
    pub amount_tolerance: f64,
    pub date_window_days: u32,
    pub amount_close_threshold: f64,
    pub merchant_high_threshold: f64,
    pub merchant_medium_threshold: f64,
    pub strategy: AssignmentStrategy,
    pub weights: Weights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
            date_window_days: DATE_WINDOW_DAYS,
            amount_close_threshold: AMOUNT_CLOSE_THRESHOLD,
            merchant_high_threshold: MERCHANT_HIGH_THRESHOLD,
            merchant_medium_threshold: MERCHANT_MEDIUM_THRESHOLD,
            strategy: AssignmentStrategy::default(),
            weights: Weights::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_strategy(mut self, strategy: AssignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [("amount", w.amount), ("date", w.date), ("text", w.text)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightOutOfRange(name, value));
            }
        }
        if (w.total() - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum(w.total()));
        }

        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("amount_tolerance", self.amount_tolerance),
            ("amount_close_threshold", self.amount_close_threshold),
            ("merchant_high_threshold", self.merchant_high_threshold),
            ("merchant_medium_threshold", self.merchant_medium_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange(name, value));
            }
        }
        Ok(())
    }
}
