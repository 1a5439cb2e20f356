//! One cross-validation run of the STABL pipelines with fixed estimator
//! settings, writing its artifacts straight into the results directory.

use std::fs;

use clap::Parser;
use tracing::info;

use tg_engine::{build_context, init_tracing, CommonArgs, ProcessRunner};
use tg_sweep::{mae_by_id, rmse_by_id, CvRequest, CvRunner};
use tg_types::{internal_error, EstimatorFamily, PipelineId, SweepError};

/// Pipelines scored by a plain CV run, in evaluation order.
const CV_PIPELINES: [PipelineId; 3] = [
    PipelineId::StablLasso,
    PipelineId::StablALasso,
    PipelineId::StablElasticNet,
];

#[derive(Debug, Parser)]
#[command(
    name = "tg-cv",
    about = "Score the STABL pipelines once under grouped cross-validation"
)]
struct CvCli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = CvCli::parse();

    let (context, truth) = build_context(&cli.common, None, CV_PIPELINES.to_vec())?;
    fs::create_dir_all(&cli.common.results_dir)?;

    let request = CvRequest {
        trial_index: 0,
        workspace: cli.common.results_dir.clone(),
        estimators: EstimatorFamily::new(cli.common.artificial_type),
        context,
    };
    let mut runner = ProcessRunner::new(cli.common.engine_command());
    let outcome = runner.run_trial(&request)?;

    for &pipeline in &request.context.pipelines {
        let predictions = outcome
            .predictions_for(pipeline)
            .ok_or_else(|| internal_error!("runner returned no predictions for {}", pipeline))?;
        let mae = mae_by_id(pipeline, predictions, &truth)?;
        info!("{} MAE: {:.4}", pipeline, mae);
        let rmse = rmse_by_id(pipeline, predictions, &truth)?;
        info!("{} RMSE: {:.4}", pipeline, rmse);
    }

    info!(
        "Cross-validation artifacts written to {}",
        cli.common.results_dir.display()
    );
    Ok(())
}
