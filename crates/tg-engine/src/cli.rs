//! Shared command-line surface for the TrialGrid entrypoints.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tg_data::{split_by_stim, stims_for_input, Dataset, FeatureTable, OutcomeTable};
use tg_sweep::CvContext;
use tg_types::{
    ArtificialType, FusionConfig, GroupShuffleConfig, PipelineId, SweepResult, TaskKind,
};

/// Environment variable overriding the engine command.
pub const ENGINE_CMD_ENV: &str = "TRIALGRID_ENGINE_CMD";

/// Engine command used when neither the flag nor the environment sets one.
pub const DEFAULT_ENGINE_CMD: &str = "stabl-cv";

/// Arguments shared by both entrypoints. The flag spellings are part of
/// the operational surface and keep their historical underscore form.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Wide-format features CSV, one row per sample.
    #[arg(long = "features_path")]
    pub features_path: PathBuf,

    /// Outcome CSV mapping sample id to response value.
    #[arg(
        long = "outcome_path",
        default_value = "../Data/outcome_table_all_pre.csv"
    )]
    pub outcome_path: PathBuf,

    /// Engine-side model selector; pass none for classification.
    #[arg(long = "model_chosen")]
    pub model_chosen: String,

    /// Directory finalized results are published into.
    #[arg(long = "results_dir")]
    pub results_dir: PathBuf,

    /// Artificial feature scheme for stability selection
    /// (random_permutation or knockoff).
    #[arg(long = "artificial_type")]
    pub artificial_type: ArtificialType,

    /// Engine executable, invoked once per trial with the request file path.
    #[arg(long = "engine_cmd")]
    pub engine_cmd: Option<String>,
}

impl CommonArgs {
    /// Engine command: the flag, then the environment, then the default.
    pub fn engine_command(&self) -> String {
        self.engine_cmd
            .clone()
            .or_else(|| env::var(ENGINE_CMD_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENGINE_CMD.to_string())
    }
}

/// Installs the global stderr subscriber. `RUST_LOG` overrides the
/// default info level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

/// Loads and joins the input tables, then assembles the run context and
/// the ground-truth map predictions are scored against.
pub fn build_context(
    args: &CommonArgs,
    fold_feats_path: Option<PathBuf>,
    pipelines: Vec<PipelineId>,
) -> SweepResult<(CvContext, HashMap<String, f64>)> {
    let features = FeatureTable::from_csv(&args.features_path)?;
    let outcomes = OutcomeTable::from_csv(&args.outcome_path)?;
    let dataset = Dataset::assemble(features, &outcomes)?;
    info!(
        "Assembled {} samples with {} features",
        dataset.n_samples(),
        dataset.features.n_features()
    );

    let stem = args
        .features_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let stims = stims_for_input(stem);
    let partitions = split_by_stim(&dataset.features, &stims)?;

    let truth = dataset.outcome_map();
    let context = CvContext {
        features_path: args.features_path.clone(),
        outcome_path: args.outcome_path.clone(),
        fold_feats_path,
        partitions,
        sample_ids: dataset.features.sample_ids.clone(),
        group_keys: dataset.group_keys(),
        splitter: GroupShuffleConfig::default(),
        task: TaskKind::Regression,
        model_chosen: args.model_chosen.clone(),
        fusion: FusionConfig::default(),
        pipelines,
    };
    Ok((context, truth))
}
