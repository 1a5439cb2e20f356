//! The persisted summary of a completed sweep.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tg_types::{ParamCombination, PipelineId, SweepResult};

use crate::driver::TrialRecord;
use crate::scoreboard::ScoreBoard;

/// File name of the persisted summary under the results root.
pub const SWEEP_SUMMARY_FILE: &str = "sweep_summary.json";

/// The best configuration found for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineBest {
    pub pipeline: PipelineId,
    /// Best RMSE; absent when no trial produced a finite metric.
    pub rmse: Option<f64>,
    pub combination: Option<ParamCombination>,
    pub workspace: Option<PathBuf>,
}

/// Summary of a completed sweep, serialized to `sweep_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Per-pipeline bests, in evaluation order.
    pub bests: Vec<PipelineBest>,
    /// Every trial, in grid order.
    pub trials: Vec<TrialRecord>,
}

impl SweepReport {
    pub fn new(trials: Vec<TrialRecord>, scoreboard: &ScoreBoard) -> Self {
        let bests = scoreboard
            .snapshot()
            .into_iter()
            .map(|(pipeline, entry)| PipelineBest {
                pipeline,
                rmse: entry.is_improved().then_some(entry.metric),
                combination: entry.combination,
                workspace: entry.workspace,
            })
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            bests,
            trials,
        }
    }

    pub fn best_for(&self, pipeline: PipelineId) -> Option<&PipelineBest> {
        self.bests.iter().find(|best| best.pipeline == pipeline)
    }

    /// Write the summary under the results root, returning its path.
    pub fn write<P: AsRef<Path>>(&self, results_root: P) -> SweepResult<PathBuf> {
        let path = results_root.as_ref().join(SWEEP_SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!("Wrote sweep summary to {}", path.display());
        Ok(path)
    }
}
