//! Configuration for perplexity scoring and classification

use crate::nll::DEFAULT_PROBABILITY_FLOOR;
use isgpt_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Window length in tokens (GPT-2's n_positions)
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Distance between consecutive window starts
    #[serde(default = "default_stride")]
    pub stride: usize,

    /// Minimum number of alphanumeric characters before any scoring happens
    #[serde(default = "default_min_alnum_chars")]
    pub min_alnum_chars: usize,

    /// Lower bound on a target probability before taking its log
    #[serde(default = "default_probability_floor")]
    pub probability_floor: f64,

    /// Perplexity thresholds for labeling
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Perplexity cut-offs.
///
/// Scores below `ai_below` are AI, scores from `human_from` up are Human, and
/// the band in between is AI with a flat 50% confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_ai_below")]
    pub ai_below: f64,

    #[serde(default = "default_human_from")]
    pub human_from: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ai_below: default_ai_below(),
            human_from: default_human_from(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            stride: default_stride(),
            min_alnum_chars: default_min_alnum_chars(),
            probability_floor: default_probability_floor(),
            thresholds: Thresholds::default(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse detector config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set window length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set stride
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Set the minimum alphanumeric character count
    pub fn with_min_alnum_chars(mut self, min_alnum_chars: usize) -> Self {
        self.min_alnum_chars = min_alnum_chars;
        self
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(Error::config("max_length must be at least 1"));
        }
        if self.stride == 0 || self.stride > self.max_length {
            return Err(Error::config(format!(
                "stride must be between 1 and max_length ({}), got {}",
                self.max_length, self.stride
            )));
        }
        if !(self.probability_floor > 0.0 && self.probability_floor < 1.0) {
            return Err(Error::config(format!(
                "probability_floor must lie in (0, 1), got {}",
                self.probability_floor
            )));
        }
        if self.thresholds.ai_below <= 0.0 {
            return Err(Error::config("thresholds.ai_below must be positive"));
        }
        if self.thresholds.ai_below > self.thresholds.human_from {
            return Err(Error::config(format!(
                "thresholds.ai_below ({}) must not exceed thresholds.human_from ({})",
                self.thresholds.ai_below, self.thresholds.human_from
            )));
        }
        Ok(())
    }
}

fn default_max_length() -> usize {
    1024
}

fn default_stride() -> usize {
    512
}

fn default_min_alnum_chars() -> usize {
    100
}

fn default_probability_floor() -> f64 {
    DEFAULT_PROBABILITY_FLOOR
}

fn default_ai_below() -> f64 {
    60.0
}

fn default_human_from() -> f64 {
    80.0
}
