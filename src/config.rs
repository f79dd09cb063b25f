// ⚙️ Match Configuration - Field weights and threshold
//
// Defaults are the canonical scheme (0.5 / 0.4 / 0.1, threshold 0.6). A JSON
// file may override any subset of them.

use crate::matching::{AREA_WEIGHT, DESCRIPTION_WEIGHT, MATCH_THRESHOLD, NAME_WEIGHT};
use crate::similarity::Weights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight for {field} must be non-negative, got {value}")]
    NegativeWeight { field: &'static str, value: f64 },

    #[error("weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    #[error("threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,

    #[serde(default = "default_description_weight")]
    pub description_weight: f64,

    #[serde(default = "default_area_weight")]
    pub area_weight: f64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_name_weight() -> f64 {
    NAME_WEIGHT
}

fn default_description_weight() -> f64 {
    DESCRIPTION_WEIGHT
}

fn default_area_weight() -> f64 {
    AREA_WEIGHT
}

fn default_threshold() -> f64 {
    MATCH_THRESHOLD
}

impl MatchConfig {
    pub fn new() -> Self {
        MatchConfig {
            name_weight: NAME_WEIGHT,
            description_weight: DESCRIPTION_WEIGHT,
            area_weight: AREA_WEIGHT,
            threshold: MATCH_THRESHOLD,
        }
    }

    /// Load a config from a JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (field, value) in [
            ("name", self.name_weight),
            ("description", self.description_weight),
            ("area", self.area_weight),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::NegativeWeight { field, value });
            }
        }

        let sum = self.weights().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }

        Ok(())
    }

    pub fn weights(&self) -> Weights {
        Weights::new(self.name_weight, self.description_weight, self.area_weight)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
