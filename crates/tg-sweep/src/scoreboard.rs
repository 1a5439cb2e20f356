//! Per-pipeline best tracking with strict-improvement replacement.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use tg_types::{internal_error, ParamCombination, PipelineId, SweepError, SweepResult};

/// The best observation so far for one pipeline.
///
/// `metric` starts at +inf, so the first finite observation always wins;
/// a NaN metric compares false against everything and never replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoardEntry {
    pub metric: f64,
    pub combination: Option<ParamCombination>,
    pub workspace: Option<PathBuf>,
}

impl ScoreBoardEntry {
    fn new() -> Self {
        Self {
            metric: f64::INFINITY,
            combination: None,
            workspace: None,
        }
    }

    /// Whether any observation has beaten the initial +inf.
    pub fn is_improved(&self) -> bool {
        self.metric.is_finite()
    }
}

/// Tracks the best (metric, combination, workspace) triple per pipeline.
///
/// The pipeline set is fixed at construction; observing an unknown
/// pipeline is a caller bug and returns an error.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    pipelines: Vec<PipelineId>,
    entries: HashMap<PipelineId, ScoreBoardEntry>,
}

impl ScoreBoard {
    pub fn new(pipelines: &[PipelineId]) -> Self {
        let mut ordered = Vec::with_capacity(pipelines.len());
        let mut entries = HashMap::new();
        for &pipeline in pipelines {
            if entries.insert(pipeline, ScoreBoardEntry::new()).is_none() {
                ordered.push(pipeline);
            }
        }
        Self {
            pipelines: ordered,
            entries,
        }
    }

    /// Record one trial's metric for one pipeline.
    ///
    /// Replaces the pipeline's best triple and returns `true` only on
    /// strict improvement; ties keep the earlier trial.
    pub fn observe(
        &mut self,
        pipeline: PipelineId,
        metric: f64,
        combination: &ParamCombination,
        workspace: &Path,
    ) -> SweepResult<bool> {
        let entry = self
            .entries
            .get_mut(&pipeline)
            .ok_or_else(|| internal_error!("pipeline {} is not on this scoreboard", pipeline))?;

        if metric < entry.metric {
            debug!(
                "{} improved: {} -> {} ({})",
                pipeline, entry.metric, metric, combination
            );
            entry.metric = metric;
            entry.combination = Some(combination.clone());
            entry.workspace = Some(workspace.to_path_buf());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn best(&self, pipeline: PipelineId) -> Option<&ScoreBoardEntry> {
        self.entries.get(&pipeline)
    }

    /// The tracked pipelines, in construction order.
    pub fn pipelines(&self) -> &[PipelineId] {
        &self.pipelines
    }

    /// Final per-pipeline bests, in construction order.
    pub fn snapshot(&self) -> Vec<(PipelineId, ScoreBoardEntry)> {
        self.pipelines
            .iter()
            .filter_map(|pipeline| {
                self.entries
                    .get(pipeline)
                    .map(|entry| (*pipeline, entry.clone()))
            })
            .collect()
    }
}
