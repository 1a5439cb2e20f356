//! Estimator configuration: the slots the engine assembles into pipelines
//! and the boosted-trees hyperparameters a sweep varies.

use serde::{Deserialize, Serialize};

use crate::errors::{SweepError, SweepResult};
use crate::params::{ParamCombination, ParamValue};
use crate::pipeline::ArtificialType;
use crate::config_error;

/// The estimator slots the CV engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    Lasso,
    #[serde(rename = "alasso")]
    ALasso,
    ElasticNet,
    BoostedTrees,
}

/// Hyperparameters for the boosted-trees regressor slot.
///
/// Field names match the estimator's own keyword arguments so a sweep
/// dimension merges by name. Defaults are the estimator library's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedTreesConfig {
    pub n_estimators: i64,
    pub max_depth: i64,
    pub learning_rate: f64,
    pub subsample: f64,
    pub colsample_bytree: f64,
    pub gamma: f64,
    pub reg_alpha: f64,
    pub reg_lambda: f64,
}

impl Default for BoostedTreesConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.3,
            subsample: 1.0,
            colsample_bytree: 1.0,
            gamma: 0.0,
            reg_alpha: 0.0,
            reg_lambda: 1.0,
        }
    }
}

impl BoostedTreesConfig {
    /// Apply one grid point on top of this configuration.
    ///
    /// An unknown dimension name or a float where an integer field is
    /// expected is rejected here, before any engine run. Integer values
    /// merging into float fields widen.
    pub fn with_combination(&self, combo: &ParamCombination) -> SweepResult<Self> {
        let mut merged = self.clone();
        for (name, value) in &combo.pairs {
            match name.as_str() {
                "n_estimators" => merged.n_estimators = int_value(name, *value)?,
                "max_depth" => merged.max_depth = int_value(name, *value)?,
                "learning_rate" => merged.learning_rate = value.as_float(),
                "subsample" => merged.subsample = value.as_float(),
                "colsample_bytree" => merged.colsample_bytree = value.as_float(),
                "gamma" => merged.gamma = value.as_float(),
                "reg_alpha" => merged.reg_alpha = value.as_float(),
                "reg_lambda" => merged.reg_lambda = value.as_float(),
                other => {
                    return Err(config_error!(
                        "unknown sweep dimension '{}' for the boosted-trees estimator",
                        other
                    ))
                }
            }
        }
        Ok(merged)
    }
}

fn int_value(name: &str, value: ParamValue) -> SweepResult<i64> {
    value
        .as_int()
        .ok_or_else(|| config_error!("dimension '{}' expects an integer value, got {}", name, value))
}

/// Per-trial estimator settings handed to the engine.
///
/// The selection estimators are fixed by pipeline identity; only the
/// boosted-trees slot varies across a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorFamily {
    pub artificial_type: ArtificialType,
    pub boosted_trees: BoostedTreesConfig,
}

impl EstimatorFamily {
    pub fn new(artificial_type: ArtificialType) -> Self {
        Self {
            artificial_type,
            boosted_trees: BoostedTreesConfig::default(),
        }
    }

    pub fn with_boosted_trees(mut self, config: BoostedTreesConfig) -> Self {
        self.boosted_trees = config;
        self
    }
}
