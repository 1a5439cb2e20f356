//! The contract between the sweep driver and the external CV engine.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tg_data::StimPartition;
use tg_types::{
    EstimatorFamily, FusionConfig, GroupShuffleConfig, PipelineId, SamplePrediction, SweepResult,
    TaskKind,
};

/// Everything about a CV run that does not change across trials.
///
/// Built once at startup and threaded through every request, so nothing
/// about the run hides in process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvContext {
    /// Wide-format features CSV the engine reads.
    pub features_path: PathBuf,
    /// Outcome CSV the engine reads.
    pub outcome_path: PathBuf,
    /// Per-fold pre-selected features, when the engine reuses an earlier
    /// selection run.
    pub fold_feats_path: Option<PathBuf>,
    /// Feature columns grouped by stim.
    pub partitions: Vec<StimPartition>,
    /// Samples in scope, aligned with `group_keys`.
    pub sample_ids: Vec<String>,
    /// Outer-split group key per sample.
    pub group_keys: Vec<String>,
    pub splitter: GroupShuffleConfig,
    pub task: TaskKind,
    /// Engine-side model selector, passed through untouched.
    pub model_chosen: String,
    pub fusion: FusionConfig,
    /// Pipelines to score, in evaluation order.
    pub pipelines: Vec<PipelineId>,
}

/// One trial's worth of work for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRequest {
    /// Trial sequence number (0-indexed, grid order).
    pub trial_index: usize,
    /// Scratch directory the engine writes its artifacts into.
    pub workspace: PathBuf,
    /// This trial's estimator settings.
    pub estimators: EstimatorFamily,
    pub context: CvContext,
}

/// Per-pipeline predictions aggregated across the outer splits.
#[derive(Debug, Clone, PartialEq)]
pub struct CvOutcome {
    pub predictions: HashMap<PipelineId, Vec<SamplePrediction>>,
}

impl CvOutcome {
    pub fn predictions_for(&self, pipeline: PipelineId) -> Option<&[SamplePrediction]> {
        self.predictions.get(&pipeline).map(Vec::as_slice)
    }
}

/// A blocking bridge to the cross-validation engine.
///
/// One call scores every requested pipeline under identical outer splits
/// and leaves diagnostic artifacts in the trial workspace. Errors abort
/// the sweep; there is no retry.
pub trait CvRunner {
    fn run_trial(&mut self, request: &CvRequest) -> SweepResult<CvOutcome>;

    /// Human-readable runner name.
    fn name(&self) -> &str;
}
