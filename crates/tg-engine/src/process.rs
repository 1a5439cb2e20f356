//! Blocking subprocess bridge to the cross-validation engine.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use tg_sweep::{CvOutcome, CvRequest, CvRunner};
use tg_types::{EngineError, PipelineId, SamplePrediction, SweepResult};

/// Request file the engine reads from the trial workspace.
pub const CV_REQUEST_FILE: &str = "cv_request.json";

/// Subdirectory the engine writes per-pipeline prediction files into.
pub const PREDICTIONS_DIR: &str = "predictions";

/// Invokes the engine command once per trial and collects its predictions.
///
/// The engine gets one argument, the path to the serialized request, and
/// must leave `predictions/<Pipeline_Dir>.csv` in the workspace for every
/// requested pipeline before exiting zero. Stdout and stderr pass through,
/// so engine progress shows up in the orchestrator's own output.
pub struct ProcessRunner {
    command: String,
}

impl ProcessRunner {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CvRunner for ProcessRunner {
    fn run_trial(&mut self, request: &CvRequest) -> SweepResult<CvOutcome> {
        let request_path = request.workspace.join(CV_REQUEST_FILE);
        fs::write(&request_path, serde_json::to_string_pretty(request)?)?;
        debug!("Wrote engine request to {}", request_path.display());

        info!(
            "Invoking engine '{}' for trial {}",
            self.command, request.trial_index
        );
        let status = Command::new(&self.command)
            .arg(&request_path)
            .status()
            .map_err(|e| EngineError::SpawnFailed {
                command: self.command.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(EngineError::Failed {
                status: status.to_string(),
                trial: request.trial_index,
            }
            .into());
        }

        let mut predictions = HashMap::new();
        for &pipeline in &request.context.pipelines {
            let path = request
                .workspace
                .join(PREDICTIONS_DIR)
                .join(format!("{}.csv", pipeline.dir_name()));
            predictions.insert(pipeline, read_predictions(pipeline, &path)?);
        }
        Ok(CvOutcome { predictions })
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Reads one pipeline's `sample_id,prediction` file.
fn read_predictions(pipeline: PipelineId, path: &Path) -> SweepResult<Vec<SamplePrediction>> {
    if !path.is_file() {
        return Err(EngineError::MissingPredictions {
            pipeline: pipeline.label().to_string(),
            path: path.display().to_string(),
        }
        .into());
    }

    let malformed = |message: String| EngineError::MalformedPredictions {
        path: path.display().to_string(),
        message,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| malformed(e.to_string()))?;

    let headers = rdr.headers().map_err(|e| malformed(e.to_string()))?;
    if headers.get(0) != Some("sample_id") || headers.get(1) != Some("prediction") {
        let found = headers.iter().collect::<Vec<_>>().join(",");
        return Err(malformed(format!(
            "expected header 'sample_id,prediction', got '{found}'"
        ))
        .into());
    }

    let mut predictions = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        let sample_id = record
            .get(0)
            .ok_or_else(|| malformed("missing sample_id field".to_string()))?;
        let raw = record
            .get(1)
            .ok_or_else(|| malformed(format!("missing prediction for {sample_id}")))?;
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bad prediction '{raw}' for {sample_id}")))?;
        predictions.push(SamplePrediction::new(sample_id, value));
    }
    Ok(predictions)
}
