use std::collections::HashMap;

use tg_types::{DataError, SweepResult};

use crate::features::FeatureTable;
use crate::outcome::OutcomeTable;

/// Group key of a sample id: the prefix before the first `_`, or the whole
/// id when there is none. Samples from the same subject share a key, which
/// keeps a subject's samples on one side of every outer split.
pub fn group_key(sample_id: &str) -> &str {
    sample_id.split('_').next().unwrap_or(sample_id)
}

/// Features inner-joined with outcomes, ready for a CV run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Feature rows for exactly the samples that have an outcome.
    pub features: FeatureTable,
    /// Outcomes aligned with `features.sample_ids`.
    pub outcomes: Vec<f64>,
}

impl Dataset {
    /// Inner-join a feature table with an outcome table on sample id.
    ///
    /// Samples without an outcome are dropped; sample order otherwise
    /// follows the feature table. An empty join is an error.
    pub fn assemble(features: FeatureTable, outcomes: &OutcomeTable) -> SweepResult<Self> {
        let mut kept_ids: Vec<String> = Vec::new();
        let mut kept_values: Vec<Vec<f64>> = Vec::new();
        let mut kept_outcomes: Vec<f64> = Vec::new();
        let mut dropped = 0usize;

        for (sample_id, row) in features.sample_ids.iter().zip(features.values.iter()) {
            match outcomes.get(sample_id) {
                Some(outcome) => {
                    kept_ids.push(sample_id.clone());
                    kept_values.push(row.clone());
                    kept_outcomes.push(outcome);
                }
                None => {
                    tracing::debug!("Sample {} has no outcome, dropping", sample_id);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} samples with no matching outcome",
                dropped,
                features.sample_ids.len()
            );
        }

        if kept_ids.is_empty() {
            return Err(DataError::EmptyJoin.into());
        }

        tracing::info!("Assembled dataset with {} samples", kept_ids.len());

        Ok(Self {
            features: FeatureTable {
                sample_ids: kept_ids,
                columns: features.columns,
                values: kept_values,
            },
            outcomes: kept_outcomes,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.sample_ids.len()
    }

    /// Ground truth keyed by sample id, for prediction scoring.
    pub fn outcome_map(&self) -> HashMap<String, f64> {
        self.features
            .sample_ids
            .iter()
            .cloned()
            .zip(self.outcomes.iter().copied())
            .collect()
    }

    /// Group keys aligned with `features.sample_ids`.
    pub fn group_keys(&self) -> Vec<String> {
        self.features
            .sample_ids
            .iter()
            .map(|id| group_key(id).to_string())
            .collect()
    }
}
