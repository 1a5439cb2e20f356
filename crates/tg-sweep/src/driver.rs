//! The sweep loop: one engine trial per grid point, strictly in order.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tg_types::{
    internal_error, EstimatorFamily, ParamCombination, PipelineId, SweepError, SweepResult,
};

use crate::grid::ParamGrid;
use crate::metrics::{mae_by_id, rmse_by_id};
use crate::report::SweepReport;
use crate::runner::{CvContext, CvRequest, CvRunner};
use crate::scoreboard::ScoreBoard;
use crate::workspace::TrialWorkspace;

/// One pipeline's selection metric on one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineScore {
    pub pipeline: PipelineId,
    pub rmse: f64,
}

/// What happened in one trial, as persisted in the sweep summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_index: usize,
    pub combination: ParamCombination,
    /// Trial directory path; already deleted unless `kept`.
    pub workspace: PathBuf,
    /// Per-pipeline RMSE, in evaluation order.
    pub scores: Vec<PipelineScore>,
    /// True when at least one pipeline improved, so the workspace survives.
    pub kept: bool,
}

/// Runs every grid point through the engine and tracks per-pipeline bests.
///
/// Trials run strictly sequentially in grid order. A failed trial aborts
/// the whole sweep; its workspace is left on disk for inspection.
pub struct SweepDriver {
    grid: ParamGrid,
    family: EstimatorFamily,
    context: CvContext,
    truth: HashMap<String, f64>,
    runner: Box<dyn CvRunner>,
    sweep_root: PathBuf,
}

impl SweepDriver {
    pub fn new(
        grid: ParamGrid,
        family: EstimatorFamily,
        context: CvContext,
        truth: HashMap<String, f64>,
        runner: Box<dyn CvRunner>,
        sweep_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            grid,
            family,
            context,
            truth,
            runner,
            sweep_root: sweep_root.into(),
        }
    }

    pub fn run(mut self) -> SweepResult<SweepReport> {
        let total = self.grid.len();
        info!(
            "Starting sweep over {} combinations with runner '{}'",
            total,
            self.runner.name()
        );

        let mut scoreboard = ScoreBoard::new(&self.context.pipelines);
        let mut records = Vec::with_capacity(total);

        for (trial_index, combination) in self.grid.combinations().iter().enumerate() {
            info!("Grid search trial {}/{}", trial_index + 1, total);
            info!("Trying parameters: {}", combination);

            let estimators = EstimatorFamily {
                artificial_type: self.family.artificial_type,
                boosted_trees: self.family.boosted_trees.with_combination(combination)?,
            };

            let workspace = TrialWorkspace::acquire(&self.sweep_root, trial_index)?;
            let request = CvRequest {
                trial_index,
                workspace: workspace.path.clone(),
                estimators,
                context: self.context.clone(),
            };
            let outcome = self.runner.run_trial(&request)?;

            let mut keep = false;
            let mut scores = Vec::with_capacity(self.context.pipelines.len());
            for &pipeline in &self.context.pipelines {
                let predictions = outcome.predictions_for(pipeline).ok_or_else(|| {
                    internal_error!("runner returned no predictions for {}", pipeline)
                })?;

                let mae = mae_by_id(pipeline, predictions, &self.truth)?;
                info!("{} MAE: {:.4}", pipeline, mae);
                let rmse = rmse_by_id(pipeline, predictions, &self.truth)?;
                info!("{} RMSE: {:.4}", pipeline, rmse);

                let improved = scoreboard.observe(pipeline, rmse, combination, &workspace.path)?;
                keep |= improved;
                scores.push(PipelineScore { pipeline, rmse });
            }

            let path = workspace.path.clone();
            workspace.release(keep)?;
            records.push(TrialRecord {
                trial_index,
                combination: combination.clone(),
                workspace: path,
                scores,
                kept: keep,
            });
        }

        for (pipeline, entry) in scoreboard.snapshot() {
            if entry.is_improved() {
                info!("Best RMSE for {}: {:.4}", pipeline, entry.metric);
                if let Some(combination) = entry.combination {
                    info!("Best parameters for {}: {}", pipeline, combination);
                }
            } else {
                warn!("No trial improved {}", pipeline);
            }
        }

        Ok(SweepReport::new(records, &scoreboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tg_types::{
        ArtificialType, EngineError, FusionConfig, GroupShuffleConfig, SamplePrediction,
        SweepDimension, TaskKind,
    };

    use crate::runner::CvOutcome;
    use crate::workspace::trial_dir_name;

    fn test_context(pipelines: Vec<PipelineId>) -> CvContext {
        CvContext {
            features_path: PathBuf::from("features.csv"),
            outcome_path: PathBuf::from("outcomes.csv"),
            fold_feats_path: None,
            partitions: Vec::new(),
            sample_ids: vec!["s1".to_string()],
            group_keys: vec!["s1".to_string()],
            splitter: GroupShuffleConfig::default(),
            task: TaskKind::Regression,
            model_chosen: "linear".to_string(),
            fusion: FusionConfig::default(),
            pipelines,
        }
    }

    fn six_trial_grid() -> ParamGrid {
        // 3 x 2 grid, last dimension fastest: trial 3 is (4, 0.05).
        ParamGrid::new(vec![
            SweepDimension::ints("max_depth", &[2, 4, 10]),
            SweepDimension::floats("learning_rate", &[0.01, 0.05]),
        ])
        .unwrap()
    }

    fn truth() -> HashMap<String, f64> {
        HashMap::from([("s1".to_string(), 0.0)])
    }

    /// Emits one prediction per pipeline whose value equals the scripted
    /// RMSE against truth s1 = 0.0, and drops artifacts in the workspace
    /// so retention can be checked from disk.
    struct ScriptedRunner {
        script: Vec<HashMap<PipelineId, f64>>,
    }

    impl CvRunner for ScriptedRunner {
        fn run_trial(&mut self, request: &CvRequest) -> SweepResult<CvOutcome> {
            fs::write(request.workspace.join("marker.txt"), "artifact")?;
            fs::write(
                request.workspace.join("params.txt"),
                format!(
                    "{} {} {}",
                    request.estimators.boosted_trees.n_estimators,
                    request.estimators.boosted_trees.max_depth,
                    request.estimators.boosted_trees.learning_rate
                ),
            )?;

            let scripted = &self.script[request.trial_index];
            let predictions = request
                .context
                .pipelines
                .iter()
                .map(|&pipeline| {
                    (pipeline, vec![SamplePrediction::new("s1", scripted[&pipeline])])
                })
                .collect();
            Ok(CvOutcome { predictions })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn scripted(alasso: f64, lasso: f64) -> HashMap<PipelineId, f64> {
        HashMap::from([
            (PipelineId::StablALasso, alasso),
            (PipelineId::StablLasso, lasso),
        ])
    }

    fn driver_with_script(
        root: &Path,
        script: Vec<HashMap<PipelineId, f64>>,
    ) -> SweepDriver {
        SweepDriver::new(
            six_trial_grid(),
            EstimatorFamily::new(ArtificialType::Knockoff),
            test_context(vec![PipelineId::StablALasso, PipelineId::StablLasso]),
            truth(),
            Box::new(ScriptedRunner { script }),
            root,
        )
    }

    #[test]
    fn sweep_keeps_improving_workspaces_and_deletes_the_rest() {
        let root = TempDir::new().unwrap();
        // ALasso improves on trials 0 and 3; Lasso only on trial 0.
        // Trial 4 ties Lasso's best (5.0), which must not count.
        let script = vec![
            scripted(6.0, 5.0),
            scripted(7.0, 6.0),
            scripted(6.5, 5.5),
            scripted(4.0, 5.5),
            scripted(4.5, 5.0),
            scripted(9.0, 9.0),
        ];

        let report = driver_with_script(root.path(), script).run().unwrap();

        for (trial, expect_kept) in [true, false, false, true, false, false]
            .into_iter()
            .enumerate()
        {
            let dir = root.path().join(trial_dir_name(trial));
            assert_eq!(dir.exists(), expect_kept, "trial {trial}");
            assert_eq!(report.trials[trial].kept, expect_kept);
            if expect_kept {
                assert!(dir.join("marker.txt").is_file());
            }
        }

        let alasso = report.best_for(PipelineId::StablALasso).unwrap();
        assert_eq!(alasso.rmse, Some(4.0));
        assert_eq!(
            alasso.combination.as_ref().unwrap().to_string(),
            "max_depth=4, learning_rate=0.05"
        );
        assert_eq!(
            alasso.workspace.as_deref(),
            Some(root.path().join(trial_dir_name(3)).as_path())
        );

        let lasso = report.best_for(PipelineId::StablLasso).unwrap();
        assert_eq!(lasso.rmse, Some(5.0));
        assert_eq!(
            lasso.workspace.as_deref(),
            Some(root.path().join(trial_dir_name(0)).as_path())
        );
    }

    #[test]
    fn driver_threads_merged_parameters_into_each_request() {
        let root = TempDir::new().unwrap();
        let script = vec![
            scripted(6.0, 5.0),
            scripted(7.0, 6.0),
            scripted(6.5, 5.5),
            scripted(4.0, 5.5),
            scripted(4.5, 5.0),
            scripted(9.0, 9.0),
        ];

        driver_with_script(root.path(), script).run().unwrap();

        // Trial 3 of the 3x2 grid is max_depth=4, learning_rate=0.05;
        // n_estimators keeps its default.
        let recorded =
            fs::read_to_string(root.path().join(trial_dir_name(3)).join("params.txt")).unwrap();
        assert_eq!(recorded, "100 4 0.05");
    }

    #[test]
    fn trial_records_cover_every_combination_in_grid_order() {
        let root = TempDir::new().unwrap();
        let script = vec![
            scripted(6.0, 5.0),
            scripted(7.0, 6.0),
            scripted(6.5, 5.5),
            scripted(4.0, 5.5),
            scripted(4.5, 5.0),
            scripted(9.0, 9.0),
        ];

        let report = driver_with_script(root.path(), script).run().unwrap();

        assert_eq!(report.trials.len(), 6);
        for (trial, record) in report.trials.iter().enumerate() {
            assert_eq!(record.trial_index, trial);
            assert_eq!(record.scores.len(), 2);
            assert_eq!(record.scores[0].pipeline, PipelineId::StablALasso);
        }
        assert_eq!(report.trials[0].combination.to_string(), "max_depth=2, learning_rate=0.01");
        assert_eq!(report.trials[5].combination.to_string(), "max_depth=10, learning_rate=0.05");
    }

    #[test]
    fn end_to_end_sweep_publishes_the_single_best_workspace() {
        let root = TempDir::new().unwrap();
        // 2 x 3 grid: trials run (300,2),(300,4),(300,10),(500,2),(500,4),(500,10).
        let grid = ParamGrid::new(vec![
            SweepDimension::ints("n_estimators", &[300, 500]),
            SweepDimension::ints("max_depth", &[2, 4, 10]),
        ])
        .unwrap();
        // The only improvements happen on trials 0 and 2.
        let script: Vec<HashMap<PipelineId, f64>> = [5.0, 5.0, 3.0, 5.0, 6.0, 7.0]
            .into_iter()
            .map(|rmse| HashMap::from([(PipelineId::StablLasso, rmse)]))
            .collect();

        let driver = SweepDriver::new(
            grid,
            EstimatorFamily::new(ArtificialType::Knockoff),
            test_context(vec![PipelineId::StablLasso]),
            truth(),
            Box::new(ScriptedRunner { script }),
            root.path(),
        );
        let report = driver.run().unwrap();

        let kept: Vec<bool> = report.trials.iter().map(|t| t.kept).collect();
        assert_eq!(kept, vec![true, false, true, false, false, false]);

        let best = report.best_for(PipelineId::StablLasso).unwrap();
        assert_eq!(best.rmse, Some(3.0));
        assert_eq!(
            best.combination.as_ref().unwrap().to_string(),
            "n_estimators=300, max_depth=10"
        );

        let published = crate::finalizer::Finalizer::publish(root.path(), &report.bests).unwrap();
        assert_eq!(published, vec![root.path().join("STABL_Lasso")]);
        // The published directory is trial 2's workspace, byte for byte.
        let copied =
            fs::read_to_string(root.path().join("STABL_Lasso").join("params.txt")).unwrap();
        assert_eq!(copied, "300 10 0.3");
        // Retained-but-unpublished workspaces stay on disk as audit trail.
        assert!(root.path().join(trial_dir_name(0)).is_dir());
        assert!(root.path().join(trial_dir_name(2)).is_dir());
    }

    struct FailingRunner {
        fail_at: usize,
    }

    impl CvRunner for FailingRunner {
        fn run_trial(&mut self, request: &CvRequest) -> SweepResult<CvOutcome> {
            if request.trial_index == self.fail_at {
                return Err(EngineError::Failed {
                    status: "exit code: 1".to_string(),
                    trial: request.trial_index,
                }
                .into());
            }
            let predictions = request
                .context
                .pipelines
                .iter()
                .map(|&pipeline| (pipeline, vec![SamplePrediction::new("s1", 1.0)]))
                .collect();
            Ok(CvOutcome { predictions })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn engine_failure_aborts_and_leaves_the_workspace_behind() {
        let root = TempDir::new().unwrap();
        let driver = SweepDriver::new(
            six_trial_grid(),
            EstimatorFamily::new(ArtificialType::RandomPermutation),
            test_context(vec![PipelineId::StablALasso, PipelineId::StablLasso]),
            truth(),
            Box::new(FailingRunner { fail_at: 2 }),
            root.path(),
        );

        let err = driver.run().unwrap_err();
        assert!(matches!(err, SweepError::Engine(EngineError::Failed { .. })));
        // The failed trial's directory survives for inspection.
        assert!(root.path().join(trial_dir_name(2)).is_dir());
    }

    struct SilentRunner;

    impl CvRunner for SilentRunner {
        fn run_trial(&mut self, _request: &CvRequest) -> SweepResult<CvOutcome> {
            Ok(CvOutcome {
                predictions: HashMap::new(),
            })
        }

        fn name(&self) -> &str {
            "silent"
        }
    }

    #[test]
    fn missing_pipeline_predictions_is_an_internal_error() {
        let root = TempDir::new().unwrap();
        let driver = SweepDriver::new(
            six_trial_grid(),
            EstimatorFamily::new(ArtificialType::Knockoff),
            test_context(vec![PipelineId::StablLasso]),
            truth(),
            Box::new(SilentRunner),
            root.path(),
        );

        let err = driver.run().unwrap_err();
        assert!(matches!(err, SweepError::Internal(_)));
    }
}
