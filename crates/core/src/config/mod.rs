//! Configuration module for the moulinette grader
//!
//! This module provides the limits a submission is validated against and the
//! parameters recall@k is computed with. Configuration can be loaded from a
//! TOML file and/or environment variables; every field has a default matching
//! the reference grading setup.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.moulinette/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".moulinette").join("config.toml"))
}

/// How spans longer than the configured limit are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpanLengthPolicy {
    /// Report the span but keep the submission valid (default)
    #[default]
    Warn,
    /// Report the span and fail validation
    Reject,
}

/// Limits a submission must respect before it is scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum rank depth, both declared and per question
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum number of characters in a retrieved span
    #[serde(default = "default_max_span_length")]
    pub max_span_length: usize,

    /// Whether over-long spans only warn or fail validation
    #[serde(default = "default_span_length_policy")]
    pub span_length_policy: SpanLengthPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_k: default_max_k(),
            max_span_length: default_max_span_length(),
            span_length_policy: default_span_length_policy(),
        }
    }
}

/// Parameters of the recall@k computation and the pass/fail gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Overlap (IoU) a predicted span must strictly exceed to match
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,

    /// Cutoffs recall is reported at, in report order
    #[serde(default = "default_k_values")]
    pub k_values: Vec<usize>,

    /// Cutoff whose recall decides pass/fail
    #[serde(default = "default_gate_k")]
    pub gate_k: usize,

    /// Minimum recall at `gate_k` for a passing run
    #[serde(default = "default_min_recall")]
    pub min_recall: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: default_iou_threshold(),
            k_values: default_k_values(),
            gate_k: default_gate_k(),
            min_recall: default_min_recall(),
        }
    }
}

/// Main configuration structure for the grader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Submission limits
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Recall computation and gate
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// Checks that the configured values describe a usable grading run
    pub fn validate(&self) -> Result<()> {
        if self.validation.max_k == 0 {
            return Err(Error::config(
                "validation.max_k must be greater than 0".to_string(),
            ));
        }

        if self.validation.max_span_length == 0 {
            return Err(Error::config(
                "validation.max_span_length must be greater than 0".to_string(),
            ));
        }

        let threshold = self.evaluation.iou_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(Error::config(format!(
                "evaluation.iou_threshold must be in [0, 1), got {threshold}"
            )));
        }

        if self.evaluation.k_values.is_empty() {
            return Err(Error::config(
                "evaluation.k_values must not be empty".to_string(),
            ));
        }

        if self.evaluation.k_values.contains(&0) {
            return Err(Error::config(format!(
                "evaluation.k_values must all be greater than 0, got {:?}",
                self.evaluation.k_values
            )));
        }

        if !self.evaluation.k_values.contains(&self.evaluation.gate_k) {
            return Err(Error::config(format!(
                "evaluation.gate_k ({}) must be one of evaluation.k_values {:?}",
                self.evaluation.gate_k, self.evaluation.k_values
            )));
        }

        let min_recall = self.evaluation.min_recall;
        if !(0.0..=1.0).contains(&min_recall) {
            return Err(Error::config(format!(
                "evaluation.min_recall must be in [0, 1], got {min_recall}"
            )));
        }

        Ok(())
    }
}
