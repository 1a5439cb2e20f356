//! Boosted-trees hyperparameter grid search over the STABL pipelines,
//! scored by an external cross-validation engine.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use tg_engine::{build_context, init_tracing, CommonArgs, ProcessRunner};
use tg_sweep::{Finalizer, ParamGrid, SweepDriver};
use tg_types::{EstimatorFamily, PipelineId, SweepDimension, SweepResult};

/// Pipelines the sweep scores, in evaluation order.
const SWEEP_PIPELINES: [PipelineId; 3] = [
    PipelineId::StablALasso,
    PipelineId::StablLasso,
    PipelineId::StablElasticNet,
];

#[derive(Debug, Parser)]
#[command(
    name = "tg-gridsearch",
    about = "Sweep boosted-trees hyperparameters and keep each pipeline's best run"
)]
struct GridSearchCli {
    #[command(flatten)]
    common: CommonArgs,

    /// Per-fold pre-selected feature lists from an earlier selection run.
    #[arg(long = "fold_feats_path")]
    fold_feats_path: PathBuf,
}

/// The swept boosted-trees grid. Later dimensions vary fastest.
fn param_grid() -> SweepResult<ParamGrid> {
    ParamGrid::new(vec![
        SweepDimension::ints("n_estimators", &[300, 500]),
        SweepDimension::ints("max_depth", &[2, 4, 10]),
        SweepDimension::floats("learning_rate", &[0.01, 0.05]),
        SweepDimension::floats("subsample", &[0.5, 0.7]),
        SweepDimension::floats("colsample_bytree", &[0.5, 0.8]),
        SweepDimension::ints("gamma", &[0, 1]),
        SweepDimension::ints("reg_alpha", &[0]),
        SweepDimension::ints("reg_lambda", &[1]),
    ])
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = GridSearchCli::parse();

    let (context, truth) = build_context(
        &cli.common,
        Some(cli.fold_feats_path.clone()),
        SWEEP_PIPELINES.to_vec(),
    )?;
    fs::create_dir_all(&cli.common.results_dir)?;

    let driver = SweepDriver::new(
        param_grid()?,
        EstimatorFamily::new(cli.common.artificial_type),
        context,
        truth,
        Box::new(ProcessRunner::new(cli.common.engine_command())),
        &cli.common.results_dir,
    );
    let report = driver.run()?;
    report.write(&cli.common.results_dir)?;

    let published = Finalizer::publish(&cli.common.results_dir, &report.bests)?;
    info!("Finalized {} pipeline result directories", published.len());
    Ok(())
}
