//! Regression scoring over sample-matched predictions.
//!
//! Predictions and ground truth are matched by sample id, never by
//! position, so the engine is free to emit predictions in any order and
//! for any subset of the cohort.

use std::collections::HashMap;

use tg_types::{DataError, PipelineId, SamplePrediction, SweepResult};

/// Root-mean-squared error over the matched predictions.
pub fn rmse_by_id(
    pipeline: PipelineId,
    predictions: &[SamplePrediction],
    truth: &HashMap<String, f64>,
) -> SweepResult<f64> {
    let residuals = matched_residuals(pipeline, predictions, truth)?;
    let mse = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
    Ok(mse.sqrt())
}

/// Mean absolute error over the matched predictions.
pub fn mae_by_id(
    pipeline: PipelineId,
    predictions: &[SamplePrediction],
    truth: &HashMap<String, f64>,
) -> SweepResult<f64> {
    let residuals = matched_residuals(pipeline, predictions, truth)?;
    Ok(residuals.iter().map(|r| r.abs()).sum::<f64>() / residuals.len() as f64)
}

/// Pairs every prediction with its ground-truth outcome.
///
/// A predicted sample the ground truth does not know is a data error, as
/// is an empty prediction set: both mean the engine and the controller
/// disagree about the cohort.
fn matched_residuals(
    pipeline: PipelineId,
    predictions: &[SamplePrediction],
    truth: &HashMap<String, f64>,
) -> SweepResult<Vec<f64>> {
    if predictions.is_empty() {
        return Err(DataError::EmptyOverlap {
            pipeline: pipeline.label().to_string(),
        }
        .into());
    }

    let mut residuals = Vec::with_capacity(predictions.len());
    for prediction in predictions {
        let actual = truth.get(&prediction.sample_id).copied().ok_or_else(|| {
            DataError::UnknownSampleId {
                sample_id: prediction.sample_id.clone(),
            }
        })?;
        residuals.push(prediction.value - actual);
    }
    Ok(residuals)
}
